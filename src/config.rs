use crate::utils::AppError;
use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE: &str = "next_auth_app";
const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub signing_secret: String,
    /// Checked when the database is first needed, not at startup.
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    pub webhook_tolerance_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let signing_secret = non_empty("SIGNING_SECRET").ok_or_else(|| {
            AppError::ConfigurationMissing(
                "Please add SIGNING_SECRET from Clerk Dashboard to .env or .env.local".to_string(),
            )
        })?;

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::ConfigurationMissing(format!("PORT is not a valid port: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        let webhook_tolerance_secs = match non_empty("WEBHOOK_TOLERANCE_SECS") {
            Some(raw) => raw.parse::<i64>().ok().filter(|v| *v > 0).ok_or_else(|| {
                AppError::ConfigurationMissing(format!(
                    "WEBHOOK_TOLERANCE_SECS must be a positive number of seconds: {}",
                    raw
                ))
            })?,
            None => DEFAULT_TOLERANCE_SECS,
        };

        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            signing_secret,
            mongodb_uri: non_empty("MONGODB_URI"),
            mongodb_database: non_empty("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            webhook_tolerance_secs,
        })
    }
}
