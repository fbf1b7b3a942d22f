pub use crate::common::RouteResult;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::on, Router};
use bus_pass::{client::Client, database::Database, photo::PhotoStore};
use common::{route_not_found, METHOD_FILTER_ALL};
use config::WebConfig;
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod api;
pub mod bus_passes;
pub mod common;
pub mod config;
pub mod uploads;

#[cfg(test)]
pub(crate) mod test_support;

#[derive(Clone)]
pub struct WebState<D>
where
    D: Database,
{
    pub bus_pass_client: Client<D>,
    pub photo_store: Arc<dyn PhotoStore>,
}

/// All routes of the service.
pub fn app<D: Database>(state: WebState<D>, config: &WebConfig) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state.clone()))
        .nest_service(
            "/bus-pass",
            bus_passes::routes(state.clone())
                .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        .nest_service("/uploads", uploads::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

pub async fn start_web_server<D: Database>(
    state: WebState<D>,
    config: WebConfig,
) -> std::io::Result<()> {
    let routes = app(state, &config);

    let listener = TcpListener::bind(config.bind_address).await?;
    log::info!("Server is running on http://{}", config.bind_address);
    axum::serve(listener, routes.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server shut down.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(why) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", why);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(why) => {
                log::error!("Failed to install terminate handler: {}", why);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received Ctrl+C, shutting down"),
        _ = terminate => log::info!("Received terminate signal, shutting down"),
    }
}
