use model::{bus_pass::BusPass, location::LocationEdge, price::Price, WithId};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    database::{BusPassRepo, Database, LocationRepo},
    RequestError, RequestResult,
};

// submitted prices are parsed from form text
const PRICE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database + Send + Sync + Sized + 'static,
{
    pub database: D,
    verify_prices: bool,
}

impl<D> Client<D>
where
    D: Database,
{
    pub(crate) fn new(database: D, verify_prices: bool) -> Self {
        Self {
            database,
            verify_prices,
        }
    }
}

impl<D> Client<D>
where
    D: Database,
{
    /// The whole location table, unfiltered.
    pub async fn get_locations(&self) -> RequestResult<Vec<LocationEdge>> {
        self.database
            .auto()
            .locations()
            .await?
            .into_iter()
            .map(|edge| edge.content)
            .collect::<Vec<_>>()
            .let_owned(Ok)
    }

    /// Resolves the fare of the directed edge `source -> destination`.
    ///
    /// Fails with `RequestError::InvalidRoute` if there is no such edge. Should
    /// the table contain a pair twice, the first inserted edge wins.
    pub async fn get_price(&self, source: &str, destination: &str) -> RequestResult<Price> {
        self.database
            .auto()
            .locations_by_source(source)
            .await?
            .into_iter()
            .find(|edge| edge.content.connects(source, destination))
            .map(|edge| edge.content.price())
            .ok_or(RequestError::InvalidRoute)
    }
}

impl<D> Client<D>
where
    D: Database,
{
    /// Checks a submission without storing anything. Passes everything unless
    /// price verification is enabled.
    pub async fn check_bus_pass(&self, bus_pass: &BusPass) -> RequestResult<()> {
        if self.verify_prices {
            self.verify_price(bus_pass).await?;
        }
        Ok(())
    }

    /// Stores a new pass as submitted.
    ///
    /// The photo, if any, has to be stored beforehand; only its reference is
    /// recorded. The submitted price is trusted unless price verification is
    /// enabled.
    pub async fn create_bus_pass(&self, bus_pass: BusPass) -> RequestResult<WithId<BusPass>> {
        self.check_bus_pass(&bus_pass).await?;
        Ok(self.database.auto().insert_bus_pass(bus_pass).await?)
    }

    pub async fn get_bus_pass(&self, id: Id<BusPass>) -> RequestResult<WithId<BusPass>> {
        Ok(self.database.auto().bus_pass(id).await?)
    }

    async fn verify_price(&self, bus_pass: &BusPass) -> RequestResult<()> {
        let (source, destination) = bus_pass.route_pair().ok_or(RequestError::InvalidRoute)?;
        let expected = self.get_price(source, destination).await?.price;
        match bus_pass.price {
            Some(submitted) if (submitted - expected).abs() < PRICE_TOLERANCE => Ok(()),
            submitted => Err(RequestError::PriceMismatch {
                submitted,
                expected,
            }),
        }
    }
}
