// secrets
use std::collections::HashMap;
use std::env;
use tracing::info;

use crate::error::ConfigError;

pub const MONGODB_SERVICE: &str = "MONGODB_SERVICE";
pub const MONGODB_USERNAME: &str = "MONGODB_USERNAME";
pub const MONGODB_PASSWORD: &str = "MONGODB_PASSWORD";
pub const MONGODB_PORT: &str = "MONGODB_PORT";
pub const PORT: &str = "PORT";

const DEFAULT_PORT: u16 = 8000;

/// Settings read once at startup.
pub struct SecretManager {
    secrets: HashMap<&'static str, String>,
    port: u16,
}

impl SecretManager {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut secrets: HashMap<&'static str, String> = HashMap::new();
        for key in [
            MONGODB_SERVICE,
            MONGODB_USERNAME,
            MONGODB_PASSWORD,
            MONGODB_PORT,
            PORT,
        ] {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                secrets.insert(key, value);
            }
        }

        if !secrets.contains_key(MONGODB_SERVICE) {
            return Err(ConfigError::Missing(MONGODB_SERVICE));
        }

        let port = match secrets.get(PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: PORT,
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        // Log which secrets are configured (NOT their values!)
        let mut configured: Vec<&str> = secrets.keys().copied().collect();
        configured.sort_unstable();
        info!("Secrets configured: {:?}", configured);

        Ok(SecretManager { secrets, port })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.secrets.get(key).map(String::as_str)
    }

    pub fn mongodb_service(&self) -> &str {
        self.get(MONGODB_SERVICE).unwrap_or_default()
    }

    /// `MONGODB_PORT` is accepted but not part of the connection target.
    pub fn mongodb_port(&self) -> Option<&str> {
        self.get(MONGODB_PORT)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        match (self.get(MONGODB_USERNAME), self.get(MONGODB_PASSWORD)) {
            (Some(user), Some(password)) => Some((user, password)),
            _ => None,
        }
    }

    /// Connection string for the driver. Credentials are only used when both are set.
    pub fn mongodb_url(&self) -> String {
        match self.credentials() {
            Some((user, password)) => {
                format!("mongodb://{}:{}@{}", user, password, self.mongodb_service())
            }
            None => format!("mongodb://{}", self.mongodb_service()),
        }
    }

    /// Same as [`Self::mongodb_url`] with the password masked, for logs.
    pub fn redacted_mongodb_url(&self) -> String {
        match self.credentials() {
            Some((user, _)) => format!("mongodb://{}:****@{}", user, self.mongodb_service()),
            None => format!("mongodb://{}", self.mongodb_service()),
        }
    }
}
