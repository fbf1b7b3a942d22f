use chrono::NaiveDate;
use model::bus_pass::BusPass;
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;

/// Table: bus_passes
#[derive(Debug, Clone, FromRow)]
pub struct BusPassRow {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub valid_till: Option<NaiveDate>,
    pub photo: Option<String>,
    pub pass_type: Option<String>,
    pub route: Option<String>,
    pub college_name: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub price: Option<f64>,
}

impl DatabaseRow for BusPassRow {
    type Model = BusPass;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id)
    }

    fn to_model(self) -> Self::Model {
        BusPass {
            name: self.name,
            email: self.email,
            valid_till: self.valid_till,
            photo: self.photo,
            pass_type: self.pass_type,
            route: self.route,
            college_name: self.college_name,
            source: self.source,
            destination: self.destination,
            price: self.price,
        }
    }
}
