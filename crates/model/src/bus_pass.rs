use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    id::HasId,
    serde::{date, number},
};

use crate::ExampleData;

/// A submitted bus pass application.
///
/// Every field is optional: whatever the form left out is stored as null.
/// `price` is taken as submitted and is not checked against the location
/// table here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusPass {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "date::deserialize_option")]
    pub valid_till: Option<NaiveDate>,
    /// Reference handed out by the photo store.
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub pass_type: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub college_name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(
        default,
        serialize_with = "number::serialize_compact_option",
        deserialize_with = "number::deserialize_lenient_option"
    )]
    pub price: Option<f64>,
}

impl BusPass {
    pub fn route_pair(&self) -> Option<(&str, &str)> {
        match (&self.source, &self.destination) {
            (Some(source), Some(destination)) => {
                Some((source.as_str(), destination.as_str()))
            }
            _ => None,
        }
    }
}

impl HasId for BusPass {
    type IdType = i64;
}

impl ExampleData for BusPass {
    fn example_data() -> Self {
        Self {
            name: Some("Lakshmi Rao".to_owned()),
            email: Some("lakshmi@example.com".to_owned()),
            valid_till: NaiveDate::from_ymd_opt(2025, 6, 30),
            photo: Some("1718000000000.jpg".to_owned()),
            pass_type: Some("monthly".to_owned()),
            route: Some("Uppal - Warangal".to_owned()),
            college_name: Some("Osmania University".to_owned()),
            source: Some("Uppal".to_owned()),
            destination: Some("Warangal".to_owned()),
            price: Some(1000.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::BusPass;
    use crate::ExampleData;

    #[test]
    fn absent_fields_serialize_as_null() {
        let pass = BusPass {
            name: Some("Ravi".to_owned()),
            ..Default::default()
        };
        let json = serde_json::to_value(&pass).unwrap();
        assert_eq!(json["name"], "Ravi");
        assert!(json["photo"].is_null());
        assert!(json["validTill"].is_null());
        assert!(json["price"].is_null());
    }

    #[test]
    fn uses_form_field_names() {
        let json = serde_json::to_value(BusPass::example_data()).unwrap();
        assert_eq!(json["validTill"], "2025-06-30");
        assert_eq!(json["passType"], "monthly");
        assert_eq!(json["collegeName"], "Osmania University");
        assert_eq!(json["price"], 1000);
    }

    #[test]
    fn accepts_timestamps_for_valid_till() {
        let pass: BusPass = serde_json::from_value(json!({
            "validTill": "2025-06-30T00:00:00.000Z",
            "price": 250
        }))
        .unwrap();
        assert_eq!(pass.valid_till, BusPass::example_data().valid_till);
        assert_eq!(pass.price, Some(250.0));
        assert_eq!(pass.name, None);
    }

    #[test]
    fn accepts_the_web_client_submission() {
        let pass: BusPass = serde_json::from_value(json!({
            "name": "Priya",
            "email": "priya@example.com",
            "phoneNumber": "9876543210",
            "passDuration": "monthly",
            "source": "Uppal",
            "destination": "Warangal",
            "price": 1000
        }))
        .unwrap();
        assert_eq!(pass.route_pair(), Some(("Uppal", "Warangal")));
        assert_eq!(pass.price, Some(1000.0));
        assert_eq!(pass.valid_till, None);

        let pass: BusPass =
            serde_json::from_value(json!({"price": null, "validTill": ""})).unwrap();
        assert_eq!(pass, BusPass::default());

        let pass: BusPass = serde_json::from_value(json!({"price": "250"})).unwrap();
        assert_eq!(pass.price, Some(250.0));
    }
}
