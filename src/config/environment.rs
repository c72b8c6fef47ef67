// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Loads .env, parses environment variables and reports a startup summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use super::database::{DatabaseConfig, DatabaseUrl};
use crate::constants::{defaults, env_vars, usda};
use crate::external::UsdaClientConfig;
use macro_tracker_core::errors::{AppError, AppResult};
use macro_tracker_core::models::UserId;
use macro_tracker_core::profile::RecomputePolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use tracing::{info, warn};

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// USDA `FoodData` Central settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodApiConfig {
    /// API key; food lookups are disabled without one
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Cache TTL in seconds
    pub cache_ttl_secs: u64,
    /// Outbound request budget per minute
    pub rate_limit_per_minute: u32,
}

impl FoodApiConfig {
    /// Client configuration, or `None` when no API key is configured
    #[must_use]
    pub fn client_config(&self) -> Option<UsdaClientConfig> {
        self.api_key.as_ref().map(|api_key| UsdaClientConfig {
            api_key: api_key.clone(),
            base_url: self.base_url.clone(),
            cache_ttl_secs: self.cache_ttl_secs,
            rate_limit_per_minute: self.rate_limit_per_minute,
        })
    }
}

impl Default for FoodApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: usda::BASE_URL.to_owned(),
            cache_ttl_secs: usda::CACHE_TTL_SECS,
            rate_limit_per_minute: usda::RATE_LIMIT_PER_MINUTE,
        }
    }
}

/// Cross-origin settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated origins, or `*` for any
    pub allowed_origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: defaults::CORS_ALLOWED_ORIGINS.to_owned(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Food-composition API configuration
    pub food_api: FoodApiConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Identity used when a request does not name a user
    pub default_user_id: UserId,
    /// How profile updates feed derived-metric recomputation
    pub recompute_policy: RecomputePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            environment: Environment::default(),
            database: DatabaseConfig::default(),
            food_api: FoodApiConfig::default(),
            cors: CorsConfig::default(),
            default_user_id: UserId(defaults::DEFAULT_USER_ID),
            recompute_policy: RecomputePolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables (and `.env` if present)
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if a variable is set but cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        Self::from_current_env()
    }

    /// Build configuration from the process environment without touching `.env`
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if a variable is set but cannot be parsed
    pub fn from_current_env() -> AppResult<Self> {
        let config = Self {
            http_port: parse_env(env_vars::HTTP_PORT, defaults::HTTP_PORT)?,
            environment: Environment::from_str_or_default(&env_var_or(
                env_vars::ENVIRONMENT,
                "development",
            )),
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or(
                    env_vars::DATABASE_URL,
                    defaults::DATABASE_URL,
                ))?,
                max_connections: parse_env(
                    env_vars::DATABASE_MAX_CONNECTIONS,
                    defaults::DATABASE_MAX_CONNECTIONS,
                )?,
            },
            food_api: FoodApiConfig {
                api_key: env::var(env_vars::USDA_API_KEY)
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                base_url: env_var_or(env_vars::USDA_BASE_URL, usda::BASE_URL),
                cache_ttl_secs: parse_env(env_vars::USDA_CACHE_TTL_SECS, usda::CACHE_TTL_SECS)?,
                rate_limit_per_minute: parse_env(
                    env_vars::USDA_RATE_LIMIT_PER_MINUTE,
                    usda::RATE_LIMIT_PER_MINUTE,
                )?,
            },
            cors: CorsConfig {
                allowed_origins: env_var_or(
                    env_vars::CORS_ALLOWED_ORIGINS,
                    defaults::CORS_ALLOWED_ORIGINS,
                ),
            },
            default_user_id: UserId(parse_env(
                env_vars::DEFAULT_USER_ID,
                defaults::DEFAULT_USER_ID,
            )?),
            recompute_policy: env::var(env_vars::PROFILE_RECOMPUTE_POLICY)
                .ok()
                .map(|raw| raw.parse::<RecomputePolicy>())
                .transpose()?
                .unwrap_or_default(),
        };

        if config.food_api.api_key.is_none() {
            warn!(
                "{} is not set; food search and lookup endpoints will be unavailable",
                env_vars::USDA_API_KEY
            );
        }

        Ok(config)
    }

    /// Human-readable configuration summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Macro Tracker Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Database: {} (max {} connections)\n\
             - USDA Food API: {}\n\
             - CORS Origins: {}\n\
             - Default User: {}\n\
             - Profile Recompute Policy: {}",
            self.http_port,
            self.environment,
            self.database.url,
            self.database.max_connections,
            if self.food_api.api_key.is_some() {
                "Enabled"
            } else {
                "Disabled"
            },
            self.cors.allowed_origins,
            self.default_user_id,
            self.recompute_policy,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config_invalid(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}
