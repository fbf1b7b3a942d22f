use std::{env, error::Error};

use async_trait::async_trait;
use bus_pass::database::{
    BusPassRepo, Database, DatabaseAutocommit, DatabaseTransaction, LocationRepo,
};
use model::{bus_pass::BusPass, location::LocationEdge, WithId};
use queries::convert_error;
use sqlx::Transaction;
use utility::id::Id;

pub mod data_model;
pub mod queries;

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn postgres_url(self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

#[derive(Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

pub struct PgDatabaseTransaction<'a> {
    tx: Transaction<'a, sqlx::Postgres>,
}

#[async_trait]
impl<'a> DatabaseTransaction for PgDatabaseTransaction<'a> {
    async fn commit(self) -> bus_pass::database::Result<()> {
        self.tx.commit().await.map_err(convert_error)
    }
}

pub struct PgDatabaseAutocommit {
    pool: sqlx::PgPool,
}

impl DatabaseAutocommit for PgDatabaseAutocommit {}

impl PgDatabase {
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let hostname = database_connection_info.hostname.clone();
        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("connected to database at {}, migrations applied.", hostname);

        Ok(Self { connection: pool })
    }
}

#[async_trait]
impl Database for PgDatabase {
    type Transaction = PgDatabaseTransaction<'static>;
    type Autocommit = PgDatabaseAutocommit;

    // postgres allows at most 65535 bind parameters per statement
    const BULK_INSERT_MAX: usize = 999;

    fn auto(&self) -> Self::Autocommit {
        PgDatabaseAutocommit {
            pool: self.connection.clone(),
        }
    }

    async fn transaction(&self) -> bus_pass::database::Result<Self::Transaction> {
        let tx: Transaction<'_, sqlx::Postgres> =
            self.connection.begin().await.map_err(convert_error)?;

        Ok(PgDatabaseTransaction { tx })
    }
}

#[async_trait]
impl LocationRepo for PgDatabaseAutocommit {
    async fn locations(
        &mut self,
    ) -> bus_pass::database::Result<Vec<WithId<LocationEdge>>> {
        queries::location::get_all(&self.pool).await
    }

    async fn locations_by_source(
        &mut self,
        source: &str,
    ) -> bus_pass::database::Result<Vec<WithId<LocationEdge>>> {
        queries::location::get_by_source(&self.pool, source).await
    }

    async fn delete_locations(&mut self) -> bus_pass::database::Result<u64> {
        queries::location::delete_all(&self.pool).await
    }

    async fn insert_locations(
        &mut self,
        edges: &[LocationEdge],
    ) -> bus_pass::database::Result<Vec<WithId<LocationEdge>>> {
        queries::location::insert_all(&self.pool, edges).await
    }
}

#[async_trait]
impl<'a> LocationRepo for PgDatabaseTransaction<'a> {
    async fn locations(
        &mut self,
    ) -> bus_pass::database::Result<Vec<WithId<LocationEdge>>> {
        queries::location::get_all(&mut *self.tx).await
    }

    async fn locations_by_source(
        &mut self,
        source: &str,
    ) -> bus_pass::database::Result<Vec<WithId<LocationEdge>>> {
        queries::location::get_by_source(&mut *self.tx, source).await
    }

    async fn delete_locations(&mut self) -> bus_pass::database::Result<u64> {
        queries::location::delete_all(&mut *self.tx).await
    }

    async fn insert_locations(
        &mut self,
        edges: &[LocationEdge],
    ) -> bus_pass::database::Result<Vec<WithId<LocationEdge>>> {
        queries::location::insert_all(&mut *self.tx, edges).await
    }
}

#[async_trait]
impl BusPassRepo for PgDatabaseAutocommit {
    async fn insert_bus_pass(
        &mut self,
        bus_pass: BusPass,
    ) -> bus_pass::database::Result<WithId<BusPass>> {
        queries::bus_pass::insert(&self.pool, bus_pass).await
    }

    async fn bus_pass(
        &mut self,
        id: Id<BusPass>,
    ) -> bus_pass::database::Result<WithId<BusPass>> {
        queries::bus_pass::get(&self.pool, id).await
    }
}

#[async_trait]
impl<'a> BusPassRepo for PgDatabaseTransaction<'a> {
    async fn insert_bus_pass(
        &mut self,
        bus_pass: BusPass,
    ) -> bus_pass::database::Result<WithId<BusPass>> {
        queries::bus_pass::insert(&mut *self.tx, bus_pass).await
    }

    async fn bus_pass(
        &mut self,
        id: Id<BusPass>,
    ) -> bus_pass::database::Result<WithId<BusPass>> {
        queries::bus_pass::get(&mut *self.tx, id).await
    }
}
