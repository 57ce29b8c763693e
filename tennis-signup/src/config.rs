use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::hash_password;
use crate::error::AppError;
use crate::schedule::slot_utils::{DEFAULT_FIRST_SESSION, DEFAULT_SESSION_MINUTES};
use crate::schedule::{ScheduleGenerator, SessionClock, MAX_ATTEMPTS};

/// Used when neither the config file nor the environment sets a password
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub store_path: PathBuf,
    /// Hex SHA-256 of the admin password
    pub admin_password_hash: Option<String>,
    pub max_login_attempts: u32,
    /// Retry budget per session
    pub max_attempts: u32,
    pub first_session: String,
    pub session_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            store_path: PathBuf::from("data/events.json"),
            admin_password_hash: None,
            max_login_attempts: 3,
            max_attempts: MAX_ATTEMPTS,
            first_session: DEFAULT_FIRST_SESSION.to_string(),
            session_minutes: DEFAULT_SESSION_MINUTES,
        }
    }
}

impl Config {
    /// Reads the TOML file if given, then applies `ADMIN_PASSWORD_HASH` / `ADMIN_PASSWORD`
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match path {
            Some(path) => Config::from_toml(&fs::read_to_string(path)?)?,
            None => Config::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(content)?)
    }

    /// A hash wins over a plain password when both are present
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(hash) = lookup("ADMIN_PASSWORD_HASH").filter(|h| !h.trim().is_empty()) {
            self.admin_password_hash = Some(hash.trim().to_lowercase());
        } else if let Some(password) = lookup("ADMIN_PASSWORD").filter(|p| !p.is_empty()) {
            self.admin_password_hash = Some(hash_password(&password));
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.session_minutes == 0 {
            return Err(AppError::config_error("session_minutes must be positive"));
        }
        if self.max_login_attempts == 0 {
            return Err(AppError::config_error("max_login_attempts must be positive"));
        }
        if let Some(hash) = &self.admin_password_hash {
            if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(AppError::config_error(
                    "admin_password_hash must be a hex SHA-256 digest",
                ));
            }
        }
        self.session_clock()?;
        Ok(())
    }

    pub fn session_clock(&self) -> Result<SessionClock, AppError> {
        SessionClock::parse(&self.first_session, self.session_minutes).ok_or_else(|| {
            AppError::config_error(format!(
                "first_session must be HH:MM, got {:?}",
                self.first_session
            ))
        })
    }

    pub fn generator(&self) -> ScheduleGenerator {
        ScheduleGenerator::new(self.max_attempts)
    }

    pub fn admin_hash(&self) -> String {
        match &self.admin_password_hash {
            Some(hash) => hash.clone(),
            None => {
                warn!("No admin password configured, falling back to the default. Set ADMIN_PASSWORD!");
                hash_password(DEFAULT_ADMIN_PASSWORD)
            }
        }
    }
}
