use std::{error, fmt, result};

use async_trait::async_trait;
use model::{bus_pass::BusPass, location::LocationEdge, WithId};
use utility::id::Id;

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    Other(Box<dyn error::Error + Send + Sync>),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no matching row"),
            Self::Other(why) => write!(f, "{}", why),
        }
    }
}

impl error::Error for DatabaseError {}

pub type Result<T> = result::Result<T, DatabaseError>;

#[async_trait]
pub trait LocationRepo {
    /// Returns the whole location table in insertion order.
    async fn locations(&mut self) -> Result<Vec<WithId<LocationEdge>>>;

    /// Returns all edges starting at `source` (exact match) in insertion order.
    async fn locations_by_source(
        &mut self,
        source: &str,
    ) -> Result<Vec<WithId<LocationEdge>>>;

    /// Removes every edge, returns how many were removed.
    async fn delete_locations(&mut self) -> Result<u64>;

    /// Inserts all edges.
    ///
    /// ## Warning
    ///
    /// Push at most `Database::BULK_INSERT_MAX` edges at once.
    async fn insert_locations(
        &mut self,
        edges: &[LocationEdge],
    ) -> Result<Vec<WithId<LocationEdge>>>;
}

#[async_trait]
pub trait BusPassRepo {
    /// Stores a new pass under a freshly assigned id.
    async fn insert_bus_pass(&mut self, bus_pass: BusPass) -> Result<WithId<BusPass>>;

    async fn bus_pass(&mut self, id: Id<BusPass>) -> Result<WithId<BusPass>>;
}

pub trait DatabaseOperations: LocationRepo + BusPassRepo {}

impl<T> DatabaseOperations for T where T: LocationRepo + BusPassRepo {}

#[async_trait]
pub trait DatabaseTransaction: DatabaseOperations {
    async fn commit(self) -> Result<()>;
}

pub trait DatabaseAutocommit: DatabaseOperations {}

/// trait to implement a bus pass database.
/// multiple concurrent accesses should be possible by e.g. cloning the database object.
#[async_trait]
pub trait Database: Clone + Send + Sync + Sized + 'static {
    type Transaction: DatabaseTransaction + Send;
    type Autocommit: DatabaseAutocommit + Send;

    const BULK_INSERT_MAX: usize;

    async fn transaction(&self) -> Result<Self::Transaction>;

    fn auto(&self) -> Self::Autocommit;
}
