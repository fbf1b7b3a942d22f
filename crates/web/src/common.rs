use axum::{
    extract::{OriginalUri, Query, Request},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use bus_pass::RequestError;
use model::ExampleData;
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

// - Services returning commonly used responses -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

// - Commonly used responses -

/// Error body of every route: `{message, error}` plus, for unknown routes, the
/// method and uri that were requested.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            http_method: None,
            requested_uri: None,
            message: None,
            error: None,
        }
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_method(method)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the message only for backend faults, client errors keep their
    /// plain `{error}` body.
    pub fn with_failure_message(self, message: impl Into<String>) -> Self {
        if self.status_code.is_server_error() {
            self.with_message(message)
        } else {
            self
        }
    }

    pub fn with_default_message(self) -> Self {
        let message = self
            .status_code
            .canonical_reason()
            .unwrap_or("i dunno what happened here :/");
        self.with_message(message)
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

impl From<RequestError> for RouteErrorResponse {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::NotFound => {
                Self::new(StatusCode::NOT_FOUND).with_error(value.to_string())
            }
            RequestError::InvalidRoute | RequestError::PriceMismatch { .. } => {
                Self::new(StatusCode::BAD_REQUEST).with_error(value.to_string())
            }
            RequestError::Other(other) => Self::new(StatusCode::INTERNAL_SERVER_ERROR)
                .with_error(format!("{}", other)),
        }
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        if self.status_code.is_server_error() {
            log::error!(
                "{}: {}",
                self.message.as_deref().unwrap_or("request failed"),
                self.error.as_deref().unwrap_or("unknown error")
            );
        }
        (self.status_code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use bus_pass::RequestError;
    use serde_json::json;

    use super::RouteErrorResponse;

    #[test]
    fn invalid_route_is_a_plain_client_error() {
        let response = RouteErrorResponse::from(RequestError::InvalidRoute)
            .with_failure_message("Failed to calculate price");
        assert_eq!(response.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"error": "Invalid source or destination"})
        );
    }

    #[test]
    fn backend_faults_carry_message_and_error() {
        let why: Box<dyn std::error::Error + Send + Sync> = "connection reset".into();
        let response = RouteErrorResponse::from(RequestError::Other(why))
            .with_failure_message("Failed to fetch locations");
        assert_eq!(response.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"message": "Failed to fetch locations", "error": "connection reset"})
        );
    }
}
