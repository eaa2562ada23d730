use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub geocode_base_url: String,
    pub rides_base_url: String,
    /// Server token used for price estimate lookups.
    pub rides_server_token: String,
    /// Bearer token used for creating and finalizing ride requests.
    pub rides_access_token: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 8080)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            geocode_base_url: env::var("GEOCODE_BASE_URL")
                .unwrap_or_else(|_| "http://maps.google.com/maps/api/geocode".to_string()),
            rides_base_url: env::var("RIDES_BASE_URL")
                .unwrap_or_else(|_| "https://sandbox-api.uber.com/v1".to_string()),
            rides_server_token: env::var("RIDES_SERVER_TOKEN").unwrap_or_default(),
            rides_access_token: env::var("RIDES_ACCESS_TOKEN").unwrap_or_default(),
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
