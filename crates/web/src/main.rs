use std::sync::Arc;

use bus_pass::{
    database::Database, memory::MemoryDatabase, photo::DiskPhotoStore, seed::seed_locations,
    server::Server,
};
use database::{DatabaseConnectionInfo, PgDatabase};
use web::{config::WebConfig, start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = WebConfig::from_env();

    // database
    match DatabaseConnectionInfo::from_env() {
        Some(database_connection_info) => {
            let database = PgDatabase::connect(database_connection_info)
                .await
                .expect("could not connect to database.");
            run(database, config).await;
        }
        None => {
            log::warn!("no database configured, keeping everything in memory.");
            run(MemoryDatabase::new(), config).await;
        }
    }
}

async fn run<D: Database>(database: D, config: WebConfig) {
    // server
    let server = Server::new(database).verify_submitted_prices(config.verify_submitted_price);
    if let Err(why) = server.seed_locations(&seed_locations()).await {
        log::error!("Failed to seed locations: {}", why);
    }

    // web server
    let state = WebState {
        bus_pass_client: server.client(),
        photo_store: Arc::new(DiskPhotoStore::new(config.upload_directory.clone())),
    };
    if let Err(why) = start_web_server(state, config).await {
        log::error!("web server stopped: {}", why);
    }
}
