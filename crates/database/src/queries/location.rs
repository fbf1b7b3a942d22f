use bus_pass::database::Result;
use model::{location::LocationEdge, WithId};
use sqlx::{Executor, Postgres};
use utility::let_also::LetAlso;

use crate::data_model::{location::LocationRow, with_ids};

use super::{convert_error, insert_all_returning};

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<WithId<LocationEdge>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, source, destination, distance
        FROM locations
        ORDER BY id ASC;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows: Vec<LocationRow>| Ok(with_ids(rows)))
}

pub async fn get_by_source<'c, E>(
    executor: E,
    source: &str,
) -> Result<Vec<WithId<LocationEdge>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, source, destination, distance
        FROM locations
        WHERE source = $1
        ORDER BY id ASC;
        ",
    )
    .bind(source)
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows: Vec<LocationRow>| Ok(with_ids(rows)))
}

pub async fn delete_all<'c, E>(executor: E) -> Result<u64>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("DELETE FROM locations;")
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
        .map_err(convert_error)
}

pub async fn insert_all<'c, E>(
    executor: E,
    edges: &[LocationEdge],
) -> Result<Vec<WithId<LocationEdge>>>
where
    E: Executor<'c, Database = Postgres>,
{
    insert_all_returning(
        executor,
        "locations",
        &["source", "destination", "distance"],
        &["id", "source", "destination", "distance"],
        edges,
        |query, edge| {
            query
                .bind(edge.source.clone())
                .bind(edge.destination.clone())
                .bind(edge.distance)
        },
    )
    .await
    .map_err(convert_error)?
    .let_owned(|rows: Vec<LocationRow>| Ok(with_ids(rows)))
}
