/// Numbers which are integral are written without a fractional part, so a
/// price of `1000.0` is rendered as `1000`.
pub mod number {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    // f64 represents every integer up to 2^53 exactly.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    pub fn serialize_compact<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn serialize_compact_option<S>(
        value: &Option<f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serialize_compact(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    /// Accepts a number, a numeric string or null. A blank string is null.
    pub fn deserialize_lenient_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrText>::deserialize(deserializer)? {
            Some(NumberOrText::Number(number)) => Ok(Some(number)),
            Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(NumberOrText::Text(text)) => match text.trim().parse::<f64>() {
                Ok(number) if number.is_finite() => Ok(Some(number)),
                _ => Err(Error::custom(format!("invalid number {:?}", text))),
            },
            None => Ok(None),
        }
    }
}

pub mod date {
    use chrono::{DateTime, NaiveDate, ParseError, Utc};
    use serde::{de::Error, Deserialize as _, Deserializer};

    /// Parses `YYYY-MM-DD` (what a html date input submits) or a full RFC 3339
    /// timestamp, of which only the UTC date is kept.
    pub fn parse(value: &str) -> Result<NaiveDate, ParseError> {
        let value = value.trim();
        NaiveDate::parse_from_str(value, "%Y-%m-%d").or_else(|why| {
            DateTime::parse_from_rfc3339(value)
                .map(|date_time| date_time.with_timezone(&Utc).date_naive())
                .map_err(|_| why)
        })
    }

    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse(&s).map(Some).map_err(Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde::{Deserialize, Serialize};

    use super::{date, number};

    #[derive(Serialize)]
    struct Amount {
        #[serde(serialize_with = "number::serialize_compact")]
        value: f64,
        #[serde(serialize_with = "number::serialize_compact_option")]
        optional: Option<f64>,
    }

    #[test]
    fn integral_numbers_drop_the_fraction() {
        let json = serde_json::to_string(&Amount {
            value: 1000.0,
            optional: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"value":1000,"optional":null}"#);
    }

    #[test]
    fn fractional_numbers_are_kept() {
        let json = serde_json::to_string(&Amount {
            value: 12.5,
            optional: Some(3.0),
        })
        .unwrap();
        assert_eq!(json, r#"{"value":12.5,"optional":3}"#);
    }

    #[test]
    fn parses_html_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert_eq!(date::parse("2025-03-31").unwrap(), expected);
        assert_eq!(date::parse("2025-03-31T00:00:00.000Z").unwrap(), expected);
        assert!(date::parse("next tuesday").is_err());
    }

    #[test]
    fn timestamps_keep_the_utc_date() {
        assert_eq!(
            date::parse("2025-03-31T01:00:00+05:30").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 30).unwrap()
        );
        assert_eq!(
            date::parse("2025-03-30T20:00:00-05:00").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
        );
    }

    #[derive(Debug, Deserialize)]
    struct Submitted {
        #[serde(default, deserialize_with = "number::deserialize_lenient_option")]
        price: Option<f64>,
        #[serde(default, deserialize_with = "date::deserialize_option")]
        valid_till: Option<NaiveDate>,
    }

    #[test]
    fn lenient_fields_take_numbers_text_and_blanks() {
        let parse = |json: &str| serde_json::from_str::<Submitted>(json);

        let submitted = parse(r#"{"price": 1000, "valid_till": ""}"#).unwrap();
        assert_eq!(submitted.price, Some(1000.0));
        assert_eq!(submitted.valid_till, None);

        assert_eq!(parse(r#"{"price": " 7.5 "}"#).unwrap().price, Some(7.5));
        assert_eq!(parse(r#"{"price": ""}"#).unwrap().price, None);
        assert_eq!(parse(r#"{"price": null}"#).unwrap().price, None);
        assert!(parse(r#"{"price": "a lot"}"#).is_err());
        assert!(parse(r#"{"valid_till": "soon"}"#).is_err());
    }
}
