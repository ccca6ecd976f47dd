mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};

use crate::engine::Engine;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::messenger;

pub type DynEngine = Arc<Engine>;

/// The secret Messenger must present during the verification handshake.
#[derive(Clone)]
pub struct VerifyToken(pub Arc<String>);

pub fn router(engine: Engine, verify_token: impl Into<String>) -> Router {
    let engine = Arc::new(engine) as DynEngine;

    Router::new()
        .route("/messenger", get(messenger::receive).post(messenger::receive))
        .layer(Extension(engine))
        .layer(Extension(VerifyToken(Arc::new(verify_token.into()))))
}

pub async fn serve(app: Router, addr: SocketAddr) -> Result<(), Error> {
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(unexpected_error)
}
