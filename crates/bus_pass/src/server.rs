use model::location::LocationEdge;

use crate::{
    client::Client,
    database::{Database, DatabaseTransaction, LocationRepo},
    RequestResult,
};

pub struct Server<D>
where
    D: Database + Send + Sync + Sized + 'static,
{
    database: D,
    verify_prices: bool,
}

impl<D> Server<D>
where
    D: Database,
{
    pub fn new(database: D) -> Self {
        Self {
            database,
            verify_prices: false,
        }
    }

    /// Makes clients recompute the fare of every submitted pass and reject
    /// passes whose price does not match.
    pub fn verify_submitted_prices(mut self, verify: bool) -> Self {
        self.verify_prices = verify;
        self
    }

    pub fn client(&self) -> Client<D> {
        Client::new(self.database.clone(), self.verify_prices)
    }

    /// Replaces the whole location table with `edges` in one transaction.
    ///
    /// Running this any number of times leaves exactly `edges` in the table.
    pub async fn seed_locations(&self, edges: &[LocationEdge]) -> RequestResult<usize> {
        let mut tx = self.database.transaction().await?;

        let removed = tx.delete_locations().await?;
        let mut inserted = 0;
        for chunk in edges.chunks(D::BULK_INSERT_MAX) {
            inserted += tx.insert_locations(chunk).await?.len();
        }

        tx.commit().await?;
        log::info!(
            "seeded {} locations (replaced {}).",
            inserted,
            removed
        );
        Ok(inserted)
    }
}
