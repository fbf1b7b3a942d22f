use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::serde::number;

/// Price per unit of distance.
pub const TARIFF: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Price {
    #[serde(serialize_with = "number::serialize_compact")]
    pub price: f64,
}

impl Price {
    pub fn for_distance(distance: f64) -> Self {
        Self {
            price: distance * TARIFF,
        }
    }
}
