use std::env;

use crate::error::ApiError;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const TOKEN_TTL_HOURS: i64 = 24;
const WIZARD_TTL_MINUTES: u64 = 30;
const DEV_JWT_SECRET: &str = "development_secret";

/// Runtime settings read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Idle minutes before an open back-office wizard is discarded.
    pub wizard_ttl_minutes: u64,
    pub bcrypt_cost: u32,
    pub seed_demo_data: bool,
    pub environment: String,
}

impl AppConfig {
    /// Loads `.env` in debug builds, then reads every setting with its default.
    ///
    /// `JWT_SECRET` is mandatory in release builds.
    pub fn from_env() -> Result<Self, ApiError> {
        if cfg!(debug_assertions) {
            dotenv::dotenv().ok();
        }

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if cfg!(debug_assertions) => {
                log::warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
            _ => return Err(ApiError::Internal("JWT_SECRET must be set".to_string())),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            port: parse_var("PORT", PORT),
            jwt_secret,
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS", TOKEN_TTL_HOURS),
            wizard_ttl_minutes: parse_var("WIZARD_TTL_MINUTES", WIZARD_TTL_MINUTES),
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST),
            seed_demo_data: parse_var("SEED_DEMO_DATA", true),
            environment: env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Settings for tests: fixed secret and the cheapest bcrypt cost.
    pub fn for_tests() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            jwt_secret: "test_secret".to_string(),
            token_ttl_hours: TOKEN_TTL_HOURS,
            wizard_ttl_minutes: WIZARD_TTL_MINUTES,
            bcrypt_cost: 4,
            seed_demo_data: true,
            environment: "test".to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring invalid {}={:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_when_unset() {
        env::remove_var("PORT");
        env::remove_var("TOKEN_TTL_HOURS");
        env::remove_var("SEED_DEMO_DATA");
        env::remove_var("WIZARD_TTL_MINUTES");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, PORT);
        assert_eq!(config.token_ttl_hours, TOKEN_TTL_HOURS);
        assert_eq!(config.wizard_ttl_minutes, WIZARD_TTL_MINUTES);
        assert!(config.seed_demo_data);
    }

    #[test]
    #[serial]
    fn test_overrides_and_invalid_values() {
        env::set_var("PORT", "9090");
        env::set_var("SEED_DEMO_DATA", "false");
        env::set_var("TOKEN_TTL_HOURS", "soon");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 9090);
        assert!(!config.seed_demo_data);
        assert_eq!(config.token_ttl_hours, TOKEN_TTL_HOURS);

        env::remove_var("PORT");
        env::remove_var("SEED_DEMO_DATA");
        env::remove_var("TOKEN_TTL_HOURS");
    }
}
