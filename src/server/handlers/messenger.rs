use axum::{
    body::Bytes,
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::entities::InboundEvent;
use crate::error::Error;
use crate::server::{DynEngine, VerifyToken};

#[derive(Debug, Default, Deserialize)]
pub struct HubParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

/// Single webhook entry point: a verification handshake when the request
/// carries a verify token, an event delivery otherwise.
pub async fn receive(
    Extension(engine): Extension<DynEngine>,
    Extension(expected): Extension<VerifyToken>,
    Query(hub): Query<HubParams>,
    body: Bytes,
) -> Result<Response, Error> {
    tracing::info!("message received");

    if let Some(token) = hub.verify_token.filter(|token| !token.is_empty()) {
        return Ok(verify(&expected, &token, hub.mode, hub.challenge));
    }

    let events = InboundEvent::parse_all(&body).map_err(|err| {
        tracing::warn!(%err, "error getting messenger user details");
        err
    })?;

    for event in events {
        engine.handle_event(event).await;
    }

    Ok((StatusCode::OK, "EVENT_RECEIVED").into_response())
}

fn verify(
    expected: &VerifyToken,
    token: &str,
    mode: Option<String>,
    challenge: Option<String>,
) -> Response {
    if token != expected.0.as_str() {
        tracing::warn!(?mode, "incorrect verification token");
        return (StatusCode::FORBIDDEN, "incorrect verification token").into_response();
    }

    tracing::info!(?mode, "webhook verified");

    (StatusCode::OK, challenge.unwrap_or_default()).into_response()
}
