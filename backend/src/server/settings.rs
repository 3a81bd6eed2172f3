//! Application settings loaded via OrthoConfig.
//!
//! Every field reads from `ACADEMY_*` environment variables (or the matching
//! CLI flag). Numeric fields carry defaults and the accessors fill in the
//! rest, so an empty environment starts an in-memory development server.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use academy::domain::EnrollmentPolicy;
use academy::outbound::payments::DEFAULT_STRIPE_BASE_URL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid Stripe base URL '{value}': {source}")]
    StripeBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACADEMY")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    #[ortho_config(default = 10)]
    pub db_pool_max_size: u32,
    /// Stripe secret key. Without one the fixture gateway is used.
    pub stripe_secret_key: Option<String>,
    /// Stripe API root, overridable for test doubles.
    pub stripe_base_url: Option<String>,
    /// Payment provider request timeout.
    #[ortho_config(default = 10)]
    pub payment_timeout_secs: u64,
    /// Seats at or below this count are never handed out.
    #[ortho_config(default = 0)]
    pub enrollment_full_threshold: u32,
}

impl AppSettings {
    /// Parsed bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_deref())
    }

    pub fn db_pool_max_size(&self) -> u32 {
        self.db_pool_max_size
    }

    /// Configured Stripe key, ignoring blank values.
    pub fn stripe_secret_key(&self) -> Option<&str> {
        non_blank(self.stripe_secret_key.as_deref())
    }

    pub fn stripe_base_url(&self) -> Result<url::Url, SettingsError> {
        let value = self
            .stripe_base_url
            .as_deref()
            .unwrap_or(DEFAULT_STRIPE_BASE_URL);
        url::Url::parse(value).map_err(|source| SettingsError::StripeBaseUrl {
            value: value.to_owned(),
            source,
        })
    }

    pub fn payment_timeout(&self) -> Duration {
        Duration::from_secs(self.payment_timeout_secs)
    }

    pub fn enrollment_policy(&self) -> EnrollmentPolicy {
        EnrollmentPolicy::with_full_threshold(self.enrollment_full_threshold)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "ACADEMY_BIND_ADDR",
        "ACADEMY_DATABASE_URL",
        "ACADEMY_DB_POOL_MAX_SIZE",
        "ACADEMY_STRIPE_SECRET_KEY",
        "ACADEMY_STRIPE_BASE_URL",
        "ACADEMY_PAYMENT_TIMEOUT_SECS",
        "ACADEMY_ENROLLMENT_FULL_THRESHOLD",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("academy")]).expect("config should load")
    }

    fn cleared_except(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_start_an_in_memory_server() {
        let _guard = lock_env(cleared_except(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url().is_none());
        assert!(settings.stripe_secret_key().is_none());
        assert_eq!(settings.db_pool_max_size(), 10);
        assert_eq!(settings.payment_timeout(), Duration::from_secs(10));
        assert_eq!(settings.enrollment_policy(), EnrollmentPolicy::default());
        assert_eq!(
            settings.stripe_base_url().expect("default parses").as_str(),
            DEFAULT_STRIPE_BASE_URL
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_except(&[
            ("ACADEMY_BIND_ADDR", "127.0.0.1:9000"),
            ("ACADEMY_DATABASE_URL", "postgres://localhost/academy"),
            ("ACADEMY_DB_POOL_MAX_SIZE", "4"),
            ("ACADEMY_STRIPE_SECRET_KEY", "sk_test_123"),
            ("ACADEMY_PAYMENT_TIMEOUT_SECS", "3"),
            ("ACADEMY_ENROLLMENT_FULL_THRESHOLD", "2"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("override parses").port(),
            9000
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/academy"));
        assert_eq!(settings.db_pool_max_size(), 4);
        assert_eq!(settings.stripe_secret_key(), Some("sk_test_123"));
        assert_eq!(settings.payment_timeout(), Duration::from_secs(3));
        assert_eq!(settings.enrollment_policy().full_threshold(), 2);
    }

    #[rstest]
    fn blank_optional_values_are_ignored() {
        let _guard = lock_env(cleared_except(&[
            ("ACADEMY_DATABASE_URL", "   "),
            ("ACADEMY_STRIPE_SECRET_KEY", ""),
        ]));

        let settings = load_from_empty_args();
        assert!(settings.database_url().is_none());
        assert!(settings.stripe_secret_key().is_none());
    }

    #[rstest]
    fn malformed_bind_addresses_are_reported() {
        let _guard = lock_env(cleared_except(&[("ACADEMY_BIND_ADDR", "not an address")]));

        let err = load_from_empty_args()
            .bind_addr()
            .expect_err("invalid address");
        assert!(matches!(err, SettingsError::BindAddr { .. }));
    }
}
