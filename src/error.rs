use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug, Display};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Config,
    Validation,
    Parse,
    Store,
    Provider,
    Send,
    InvalidState,
    Unexpected,
}

#[derive(Debug)]
pub struct Error {
    pub kind: Kind,
    pub message: String,
}

impl Error {
    pub fn is(&self, kind: Kind) -> bool {
        self.kind == kind
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} error: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        config_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        parse_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.kind {
            Kind::Parse | Kind::Validation => (StatusCode::BAD_REQUEST, self.message.as_str()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn config_error<T: Display>(err: T) -> Error {
    Error {
        kind: Kind::Config,
        message: format!("configuration error: {}", err),
    }
}

pub fn validation_error<T: Display>(err: T) -> Error {
    Error {
        kind: Kind::Validation,
        message: err.to_string(),
    }
}

pub fn parse_error<T: Display>(err: T) -> Error {
    Error {
        kind: Kind::Parse,
        message: format!("malformed payload: {}", err),
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    Error {
        kind: Kind::Store,
        message: format!("database error: {:?}", err),
    }
}

pub fn provider_error<T: Display>(err: T) -> Error {
    Error {
        kind: Kind::Provider,
        message: format!("places provider error: {}", err),
    }
}

pub fn send_error<T: Display>(err: T) -> Error {
    Error {
        kind: Kind::Send,
        message: format!("error response from messenger: {}", err),
    }
}

pub fn invalid_state_error<T: Display>(err: T) -> Error {
    Error {
        kind: Kind::InvalidState,
        message: err.to_string(),
    }
}

pub fn unexpected_error<T: Display>(err: T) -> Error {
    Error {
        kind: Kind::Unexpected,
        message: err.to_string(),
    }
}

#[test]
fn parse_errors_are_client_errors() {
    let response = parse_error("missing field `sender`").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = validation_error("latitude out of range").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn downstream_errors_are_server_errors() {
    let response = database_error("connection refused").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = provider_error("REQUEST_DENIED").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn env_var_errors_become_config_errors() {
    let err: Error = env::VarError::NotPresent.into();
    assert!(err.is(Kind::Config));
}
