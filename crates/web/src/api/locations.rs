use axum::{
    extract::State,
    routing::{get, on},
    Json, Router,
};
use bus_pass::database::Database;
use model::location::LocationEdge;

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/schema", get(schema::<LocationEdge>))
        .route("/", get(get_locations::<D>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_locations<D: Database>(
    State(WebState {
        bus_pass_client, ..
    }): State<WebState<D>>,
) -> RouteResult<Json<Vec<LocationEdge>>> {
    bus_pass_client
        .get_locations()
        .await
        .map(Json)
        .map_err(|why| {
            RouteErrorResponse::from(why).with_failure_message("Failed to fetch locations")
        })
}
