use model::location::LocationEdge;
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;

/// A directed edge of the location table.
/// Table: locations
#[derive(Debug, Clone, FromRow)]
pub struct LocationRow {
    pub id: i64,
    pub source: String,
    pub destination: String,
    pub distance: f64,
}

impl DatabaseRow for LocationRow {
    type Model = LocationEdge;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id)
    }

    fn to_model(self) -> Self::Model {
        LocationEdge {
            source: self.source,
            destination: self.destination,
            distance: self.distance,
        }
    }
}
