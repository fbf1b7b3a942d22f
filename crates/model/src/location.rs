use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{id::HasId, serde::number};

use crate::{price::Price, ExampleData};

/// A directed edge of the location table. `(a, b)` and `(b, a)` are
/// independent entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationEdge {
    pub source: String,
    pub destination: String,
    #[serde(serialize_with = "number::serialize_compact")]
    pub distance: f64,
}

impl LocationEdge {
    pub fn new<S, D>(source: S, destination: D, distance: f64) -> Self
    where
        S: Into<String>,
        D: Into<String>,
    {
        Self {
            source: source.into(),
            destination: destination.into(),
            distance,
        }
    }

    /// Exact, case sensitive match on both ends.
    pub fn connects(&self, source: &str, destination: &str) -> bool {
        self.source == source && self.destination == destination
    }

    pub fn price(&self) -> Price {
        Price::for_distance(self.distance)
    }
}

impl HasId for LocationEdge {
    type IdType = i64;
}

impl ExampleData for LocationEdge {
    fn example_data() -> Self {
        Self::new("Uppal", "Warangal", 100.0)
    }
}
