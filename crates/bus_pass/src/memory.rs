//! A database kept entirely in process memory. Used when no PostgreSQL
//! connection is configured and as the backend of the tests.

use std::sync::Arc;

use async_trait::async_trait;
use model::{bus_pass::BusPass, location::LocationEdge, WithId};
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use utility::id::Id;

use crate::database::{
    BusPassRepo, Database, DatabaseAutocommit, DatabaseError, DatabaseTransaction,
    LocationRepo, Result,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    locations: Vec<WithId<LocationEdge>>,
    bus_passes: Vec<WithId<BusPass>>,
    last_location_id: i64,
    last_bus_pass_id: i64,
}

impl MemoryState {
    fn locations_by_source(&self, source: &str) -> Vec<WithId<LocationEdge>> {
        self.locations
            .iter()
            .filter(|edge| edge.content.source == source)
            .cloned()
            .collect()
    }

    fn delete_locations(&mut self) -> u64 {
        let removed = self.locations.len() as u64;
        self.locations.clear();
        removed
    }

    fn insert_locations(&mut self, edges: &[LocationEdge]) -> Vec<WithId<LocationEdge>> {
        let inserted = edges
            .iter()
            .map(|edge| {
                self.last_location_id += 1;
                WithId::new(Id::new(self.last_location_id), edge.clone())
            })
            .collect::<Vec<_>>();
        self.locations.extend(inserted.iter().cloned());
        inserted
    }

    fn insert_bus_pass(&mut self, bus_pass: BusPass) -> WithId<BusPass> {
        self.last_bus_pass_id += 1;
        let stored = WithId::new(Id::new(self.last_bus_pass_id), bus_pass);
        self.bus_passes.push(stored.clone());
        stored
    }

    fn bus_pass(&self, id: &Id<BusPass>) -> Result<WithId<BusPass>> {
        self.bus_passes
            .iter()
            .find(|bus_pass| bus_pass.id == *id)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MemoryAutocommit {
    state: Arc<RwLock<MemoryState>>,
}

impl DatabaseAutocommit for MemoryAutocommit {}

/// Holds the write lock until it is committed or dropped. Changes are made to
/// a working copy, so dropping without commit discards them.
pub struct MemoryTransaction {
    guard: OwnedRwLockWriteGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl DatabaseTransaction for MemoryTransaction {
    async fn commit(mut self) -> Result<()> {
        *self.guard = self.working;
        Ok(())
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    type Transaction = MemoryTransaction;
    type Autocommit = MemoryAutocommit;

    const BULK_INSERT_MAX: usize = 999;

    async fn transaction(&self) -> Result<Self::Transaction> {
        let guard = self.state.clone().write_owned().await;
        let working = guard.clone();
        Ok(MemoryTransaction { guard, working })
    }

    fn auto(&self) -> Self::Autocommit {
        MemoryAutocommit {
            state: self.state.clone(),
        }
    }
}

#[async_trait]
impl LocationRepo for MemoryAutocommit {
    async fn locations(&mut self) -> Result<Vec<WithId<LocationEdge>>> {
        Ok(self.state.read().await.locations.clone())
    }

    async fn locations_by_source(
        &mut self,
        source: &str,
    ) -> Result<Vec<WithId<LocationEdge>>> {
        Ok(self.state.read().await.locations_by_source(source))
    }

    async fn delete_locations(&mut self) -> Result<u64> {
        Ok(self.state.write().await.delete_locations())
    }

    async fn insert_locations(
        &mut self,
        edges: &[LocationEdge],
    ) -> Result<Vec<WithId<LocationEdge>>> {
        Ok(self.state.write().await.insert_locations(edges))
    }
}

#[async_trait]
impl LocationRepo for MemoryTransaction {
    async fn locations(&mut self) -> Result<Vec<WithId<LocationEdge>>> {
        Ok(self.working.locations.clone())
    }

    async fn locations_by_source(
        &mut self,
        source: &str,
    ) -> Result<Vec<WithId<LocationEdge>>> {
        Ok(self.working.locations_by_source(source))
    }

    async fn delete_locations(&mut self) -> Result<u64> {
        Ok(self.working.delete_locations())
    }

    async fn insert_locations(
        &mut self,
        edges: &[LocationEdge],
    ) -> Result<Vec<WithId<LocationEdge>>> {
        Ok(self.working.insert_locations(edges))
    }
}

#[async_trait]
impl BusPassRepo for MemoryAutocommit {
    async fn insert_bus_pass(&mut self, bus_pass: BusPass) -> Result<WithId<BusPass>> {
        Ok(self.state.write().await.insert_bus_pass(bus_pass))
    }

    async fn bus_pass(&mut self, id: Id<BusPass>) -> Result<WithId<BusPass>> {
        self.state.read().await.bus_pass(&id)
    }
}

#[async_trait]
impl BusPassRepo for MemoryTransaction {
    async fn insert_bus_pass(&mut self, bus_pass: BusPass) -> Result<WithId<BusPass>> {
        Ok(self.working.insert_bus_pass(bus_pass))
    }

    async fn bus_pass(&mut self, id: Id<BusPass>) -> Result<WithId<BusPass>> {
        self.working.bus_pass(&id)
    }
}
