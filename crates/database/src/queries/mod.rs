use std::fmt::Write as _;

use ::bus_pass::database::DatabaseError;
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    Executor, FromRow, Postgres,
};

pub mod bus_pass;
pub mod location;

pub(crate) fn convert_error(why: sqlx::Error) -> DatabaseError {
    match why {
        sqlx::Error::RowNotFound => DatabaseError::NotFound,
        _ => DatabaseError::Other(Box::new(why)),
    }
}

// bulk insert

/// Inserts all `values` with a single multi-row `INSERT` and returns the
/// inserted rows. `bind` has to bind exactly one parameter per column.
pub async fn insert_all_returning<'c, E, T, B, O>(
    executor: E,
    table: &str,
    columns: &[&str],
    returning: &[&str],
    values: &[T],
    bind: B,
) -> Result<Vec<O>, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
    for<'a> B: Fn(
        QueryAs<'a, Postgres, O, PgArguments>,
        &T,
    ) -> QueryAs<'a, Postgres, O, PgArguments>,
    for<'r> O: FromRow<'r, PgRow> + Send + Unpin,
{
    if values.is_empty() {
        return Ok(vec![]);
    }

    // build query string
    let mut query_str =
        format!("INSERT INTO {} ({}) VALUES ", table, columns.join(", "));
    let mut placeholder_index = 1;
    for i in 0..values.len() {
        if i > 0 {
            query_str.push_str(", ");
        }
        query_str.push('(');
        for j in 0..columns.len() {
            if j > 0 {
                query_str.push_str(", ");
            }
            let _ = write!(&mut query_str, "${}", placeholder_index);
            placeholder_index += 1;
        }
        query_str.push(')');
    }
    let _ = write!(&mut query_str, " RETURNING {}", returning.join(", "));
    query_str.push(';');

    // query
    let mut query = sqlx::query_as::<Postgres, O>(&query_str);
    for value in values {
        query = bind(query, value);
    }
    query.fetch_all(executor).await
}
