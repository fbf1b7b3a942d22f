use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bus_pass::{
    database::{
        BusPassRepo, Database, DatabaseAutocommit, DatabaseError, DatabaseTransaction,
        LocationRepo, Result,
    },
    memory::MemoryDatabase,
    photo::{MemoryPhotoStore, PhotoStore},
    seed::seed_locations,
    server::Server,
};
use model::{bus_pass::BusPass, location::LocationEdge, WithId};
use serde_json::Value;
use tower::ServiceExt;
use utility::id::Id;

use crate::{app, config::WebConfig, WebState};

const BOUNDARY: &str = "bus-pass-test-boundary";

/// The whole router on top of an in-memory database and photo store.
pub(crate) struct TestApp {
    router: Router,
}

impl TestApp {
    pub(crate) async fn empty() -> Self {
        Self::build(false, false).await
    }

    pub(crate) async fn seeded() -> Self {
        Self::build(true, false).await
    }

    pub(crate) async fn seeded_verifying_prices() -> Self {
        Self::build(true, true).await
    }

    /// Every database call fails.
    pub(crate) fn failing() -> Self {
        Self::new(&Server::new(FailingDatabase), Arc::new(MemoryPhotoStore::new()))
    }

    async fn build(seed: bool, verify_prices: bool) -> Self {
        let server = Server::new(MemoryDatabase::new()).verify_submitted_prices(verify_prices);
        if seed {
            server.seed_locations(&seed_locations()).await.unwrap();
        }
        Self::new(&server, Arc::new(MemoryPhotoStore::new()))
    }

    pub(crate) fn new<D: Database>(server: &Server<D>, photo_store: Arc<dyn PhotoStore>) -> Self {
        let state = WebState {
            bus_pass_client: server.client(),
            photo_store,
        };
        Self {
            router: app(state, &WebConfig::default()),
        }
    }

    /// Sends `request` and parses the response body as json, `Value::Null`
    /// when it is not.
    pub(crate) async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, _, bytes) = self.send_raw(request).await;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub(crate) async fn send_raw(
        &self,
        request: Request<Body>,
    ) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, bytes.to_vec())
    }
}

pub(crate) fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub(crate) fn post_json(uri: &str, json: &str) -> Request<Body> {
    post_body(uri, "application/json", json)
}

pub(crate) fn post_body(uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_owned()))
        .unwrap()
}

/// A `multipart/form-data` post of text `fields` and an optional `photo` part
/// given as file name and content.
pub(crate) fn multipart_post(
    uri: &str,
    fields: &[(&str, &str)],
    photo: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = photo {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

// - A database that is never reachable -

pub(crate) const DATABASE_OFFLINE: &str = "database offline";

fn offline() -> DatabaseError {
    DatabaseError::Other(DATABASE_OFFLINE.into())
}

#[derive(Debug, Clone)]
pub(crate) struct FailingDatabase;

pub(crate) struct FailingHandle;

impl DatabaseAutocommit for FailingHandle {}

#[async_trait]
impl DatabaseTransaction for FailingHandle {
    async fn commit(self) -> Result<()> {
        Err(offline())
    }
}

#[async_trait]
impl LocationRepo for FailingHandle {
    async fn locations(&mut self) -> Result<Vec<WithId<LocationEdge>>> {
        Err(offline())
    }

    async fn locations_by_source(&mut self, _: &str) -> Result<Vec<WithId<LocationEdge>>> {
        Err(offline())
    }

    async fn delete_locations(&mut self) -> Result<u64> {
        Err(offline())
    }

    async fn insert_locations(
        &mut self,
        _: &[LocationEdge],
    ) -> Result<Vec<WithId<LocationEdge>>> {
        Err(offline())
    }
}

#[async_trait]
impl BusPassRepo for FailingHandle {
    async fn insert_bus_pass(&mut self, _: BusPass) -> Result<WithId<BusPass>> {
        Err(offline())
    }

    async fn bus_pass(&mut self, _: Id<BusPass>) -> Result<WithId<BusPass>> {
        Err(offline())
    }
}

#[async_trait]
impl Database for FailingDatabase {
    type Transaction = FailingHandle;
    type Autocommit = FailingHandle;

    const BULK_INSERT_MAX: usize = 999;

    async fn transaction(&self) -> Result<Self::Transaction> {
        Err(offline())
    }

    fn auto(&self) -> Self::Autocommit {
        FailingHandle
    }
}
