//! Process configuration, sourced from the environment (and `.env` via dotenv).

use std::env;
use std::time::Duration;

use crate::error::{config_error, Error};

pub const DEFAULT_PLACES_API_BASE: &str = "https://maps.googleapis.com/maps/api/place";
pub const DEFAULT_MESSENGER_API_BASE: &str = "https://graph.facebook.com/v2.8";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub messenger: MessengerConfig,
    pub places: PlacesConfig,
    /// Applied to every outbound call: store queries, places lookups and sends.
    pub timeout: Duration,
    pub dedup_ttl: chrono::Duration,
}

#[derive(Clone, Debug)]
pub struct MessengerConfig {
    pub verify_token: String,
    pub page_token: String,
    pub page_id: Option<String>,
    pub api_base: String,
}

#[derive(Clone, Debug)]
pub struct PlacesConfig {
    pub api_key: String,
    pub api_base: String,
    pub open_now: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| config_error(format!("{} is not set", key)))
        };
        let parsed = |key: &str, default: u64| -> Result<u64, Error> {
            match lookup(key) {
                Some(value) => value
                    .parse()
                    .map_err(|_| config_error(format!("{} must be a number, got {:?}", key, value))),
                None => Ok(default),
            }
        };

        let port = parsed("PORT", 8080)?;
        let port = u16::try_from(port).map_err(|_| config_error("PORT is out of range"))?;

        let open_now = match lookup("PLACES_OPEN_NOW").as_deref() {
            None | Some("1") | Some("true") => true,
            Some("0") | Some("false") => false,
            Some(other) => {
                return Err(config_error(format!(
                    "PLACES_OPEN_NOW must be true or false, got {:?}",
                    other
                )))
            }
        };

        let dedup_ttl = i64::try_from(parsed("DEDUP_TTL_SECS", 600)?)
            .map_err(|_| config_error("DEDUP_TTL_SECS is out of range"))?;

        let database_max_connections = u32::try_from(parsed("DATABASE_MAX_CONNECTIONS", 5)?)
            .map_err(|_| config_error("DATABASE_MAX_CONNECTIONS is out of range"))?;

        let timeout = match parsed("HTTP_TIMEOUT_SECS", 10)? {
            0 => return Err(config_error("HTTP_TIMEOUT_SECS must be at least 1")),
            secs => Duration::from_secs(secs),
        };

        Ok(Self {
            port,
            database_url: required("DATABASE_URL")?,
            database_max_connections,
            messenger: MessengerConfig {
                verify_token: required("FB_VERIFICATION_TOKEN")?,
                page_token: required("FB_PAGE_TOKEN")?,
                page_id: lookup("FB_PAGE_ID").filter(|id| !id.is_empty()),
                api_base: lookup("MESSENGER_API_BASE")
                    .unwrap_or_else(|| DEFAULT_MESSENGER_API_BASE.into()),
            },
            places: PlacesConfig {
                api_key: required("GOOGLE_API_KEY")?,
                api_base: lookup("GOOGLE_PLACES_API_BASE")
                    .unwrap_or_else(|| DEFAULT_PLACES_API_BASE.into()),
                open_now,
            },
            timeout,
            dedup_ttl: chrono::Duration::seconds(dedup_ttl),
        })
    }
}
