use std::path::Path as FilePath;

use axum::{
    extract::{OriginalUri, Path, State},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, on},
    Router,
};
use bus_pass::{database::Database, photo::PhotoError, RequestError};

use crate::{
    common::{route_not_found, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/:reference", get(get_photo::<D>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_photo<D: Database>(
    Path(reference): Path<String>,
    OriginalUri(original_uri): OriginalUri,
    State(WebState { photo_store, .. }): State<WebState<D>>,
) -> RouteResult<impl IntoResponse> {
    let bytes = photo_store
        .retrieve(&reference)
        .await
        .map_err(|why| match why {
            PhotoError::NotFound | PhotoError::InvalidReference(_) => {
                RouteErrorResponse::not_found(&Method::GET, original_uri.path())
            }
            other => RouteErrorResponse::from(RequestError::other(other))
                .with_message("Failed to read photo"),
        })?;

    Ok(([(header::CONTENT_TYPE, content_type(&reference))], bytes))
}

fn content_type(reference: &str) -> &'static str {
    let extension = FilePath::new(reference)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::content_type;
    use crate::test_support::{get, TestApp};

    #[test]
    fn guesses_content_type_from_extension() {
        assert_eq!(content_type("1717171717171.JPG"), "image/jpeg");
        assert_eq!(content_type("1717171717171-1.webp"), "image/webp");
        assert_eq!(content_type("1717171717171"), "application/octet-stream");
    }

    #[tokio::test]
    async fn unknown_photos_are_404s() {
        let app = TestApp::seeded().await;
        let (status, body) = app.send(get("/uploads/1717171717171.png")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["requestedUri"], "/uploads/1717171717171.png");
    }

    #[tokio::test]
    async fn path_like_references_are_404s() {
        let app = TestApp::seeded().await;
        let (status, _) = app.send(get("/uploads/..%2Fsecret")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
