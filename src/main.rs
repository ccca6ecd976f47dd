use std::net::SocketAddr;
use std::sync::Arc;

use foodbot::config::Config;
use foodbot::db::PgStore;
use foodbot::engine::{DeliveryLog, Engine};
use foodbot::error::Error;
use foodbot::external::{GooglePlacesClient, MessengerClient};
use foodbot::server::{router, serve};

#[tokio::main]
async fn main() -> Result<(), Error> {
    if let Err(err) = dotenv::dotenv() {
        eprintln!("no .env loaded: {}", err);
    }

    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let store = PgStore::new(
        &config.database_url,
        config.database_max_connections,
        config.timeout,
    )
    .await?;
    let places = GooglePlacesClient::new(&config.places, config.timeout)?;
    let sender = MessengerClient::new(&config.messenger, config.timeout)?;

    let engine = Engine::new(
        Arc::new(store),
        Arc::new(places),
        Arc::new(sender),
        DeliveryLog::new(config.dedup_ttl),
    )
    .with_page_id(config.messenger.page_id.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    serve(router(engine, config.messenger.verify_token), addr).await
}
