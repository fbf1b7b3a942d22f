use axum::{
    response::IntoResponse,
    routing::{get, on},
    Json, Router,
};
use bus_pass::database::Database;
use serde_json::json;

mod locations;
mod price;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    WebState,
};

pub fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .nest_service("/locations", locations::routes(state.clone()))
        .nest_service("/price", price::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn ping() -> impl IntoResponse {
    Json(json!({
        "message": "pong!"
    }))
}
