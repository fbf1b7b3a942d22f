use axum::{
    extract::{Query, State},
    routing::{get, on},
    Json, Router,
};
use bus_pass::{database::Database, RequestError};
use model::price::Price;
use serde::Deserialize;

use crate::{
    common::{route_not_found, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/", get(get_price::<D>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
struct PriceQuery {
    source: Option<String>,
    destination: Option<String>,
}

async fn get_price<D: Database>(
    State(WebState {
        bus_pass_client, ..
    }): State<WebState<D>>,
    Query(params): Query<PriceQuery>,
) -> RouteResult<Json<Price>> {
    // a missing parameter can not match any edge
    let (Some(source), Some(destination)) = (params.source, params.destination) else {
        return Err(RequestError::InvalidRoute.into());
    };
    bus_pass_client
        .get_price(&source, &destination)
        .await
        .map(Json)
        .map_err(|why| {
            RouteErrorResponse::from(why).with_failure_message("Failed to calculate price")
        })
}
