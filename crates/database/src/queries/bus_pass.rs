use bus_pass::database::Result;
use model::{bus_pass::BusPass, WithId};
use sqlx::{Executor, Postgres};
use utility::id::Id;

use crate::data_model::{bus_pass::BusPassRow, with_id};

use super::convert_error;

pub async fn get<'c, E>(executor: E, id: Id<BusPass>) -> Result<WithId<BusPass>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, name, email, valid_till, photo, pass_type, route,
            college_name, source, destination, price
        FROM bus_passes
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: BusPassRow| with_id(row))
    .map_err(convert_error)
}

pub async fn insert<'c, E>(executor: E, bus_pass: BusPass) -> Result<WithId<BusPass>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO bus_passes(
            name,
            email,
            valid_till,
            photo,
            pass_type,
            route,
            college_name,
            source,
            destination,
            price
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING
            id, name, email, valid_till, photo, pass_type, route,
            college_name, source, destination, price;
        ",
    )
    .bind(bus_pass.name)
    .bind(bus_pass.email)
    .bind(bus_pass.valid_till)
    .bind(bus_pass.photo)
    .bind(bus_pass.pass_type)
    .bind(bus_pass.route)
    .bind(bus_pass.college_name)
    .bind(bus_pass.source)
    .bind(bus_pass.destination)
    .bind(bus_pass.price)
    .fetch_one(executor)
    .await
    .map(|row: BusPassRow| with_id(row))
    .map_err(convert_error)
}
