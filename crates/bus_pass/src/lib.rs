use std::{error::Error, fmt};

pub mod client;
pub mod database;
pub mod memory;
pub mod photo;
pub mod seed;
pub mod server;

#[derive(Debug)]
pub enum RequestError {
    NotFound,
    /// No location edge connects the requested source and destination.
    InvalidRoute,
    /// The submitted price differs from the tariff for the submitted route.
    PriceMismatch { submitted: Option<f64>, expected: f64 },
    Other(Box<dyn Error + Send + Sync>),
}

impl RequestError {
    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "The requested item does not exist."),
            Self::InvalidRoute => write!(f, "Invalid source or destination"),
            Self::PriceMismatch {
                submitted: Some(submitted),
                expected,
            } => write!(
                f,
                "Submitted price {} does not match the fare {} for this route",
                submitted, expected
            ),
            Self::PriceMismatch {
                submitted: None,
                expected,
            } => write!(f, "Missing price, the fare for this route is {}", expected),
            Self::Other(why) => write!(f, "{}", why),
        }
    }
}

impl Error for RequestError {}

impl From<Box<dyn Error + Send + Sync>> for RequestError {
    fn from(value: Box<dyn Error + Send + Sync>) -> Self {
        RequestError::Other(value)
    }
}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::NotFound => Self::NotFound,
            database::DatabaseError::Other(why) => Self::Other(why),
        }
    }
}

impl From<photo::PhotoError> for RequestError {
    fn from(value: photo::PhotoError) -> Self {
        match value {
            photo::PhotoError::NotFound => Self::NotFound,
            other => Self::other(other),
        }
    }
}

pub type RequestResult<O> = Result<O, RequestError>;
