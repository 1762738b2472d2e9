//! Startup validation.
//!
//! Every check runs and all failures are reported together; any failure
//! aborts startup.

use crate::AppConfig;
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// JWT secret is missing.
    MissingJwtSecret,
    /// JWT secret is too short.
    JwtSecretTooShort { actual: usize, minimum: usize },
    /// JWT algorithm is not a supported HMAC algorithm.
    UnsupportedJwtAlgorithm { value: String },
    /// Port number is invalid.
    InvalidPort { name: String, value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout or lifetime must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// Password hash cost is out of range.
    InvalidHashCost { value: u32, minimum: u32, maximum: u32 },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// Log format is invalid.
    InvalidLogFormat { value: String },
    /// A required mail setting is missing.
    MissingMailSetting { name: String },
    /// A limit must be positive.
    NonPositiveLimit { name: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingJwtSecret => write!(f, "JWT secret is not set"),
            Self::JwtSecretTooShort { actual, minimum } => {
                write!(
                    f,
                    "JWT secret too short: {} characters (minimum {})",
                    actual, minimum
                )
            }
            Self::UnsupportedJwtAlgorithm { value } => {
                write!(
                    f,
                    "Unsupported JWT algorithm: '{}' (valid: HS256, HS384, HS512)",
                    value
                )
            }
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({}) cannot be greater than max ({})",
                    min, max
                )
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "'{}' must be positive, got {}", name, value)
            }
            Self::InvalidHashCost {
                value,
                minimum,
                maximum,
            } => {
                write!(
                    f,
                    "Invalid password hash cost: {} (must be between {} and {})",
                    value, minimum, maximum
                )
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                    value
                )
            }
            Self::InvalidLogFormat { value } => {
                write!(f, "Invalid log format: '{}' (valid: pretty, json)", value)
            }
            Self::MissingMailSetting { name } => {
                write!(f, "mail.{} is required when mail is enabled", name)
            }
            Self::NonPositiveLimit { name } => write!(f, "'{}' must be positive", name),
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Minimum JWT secret length in bytes.
    const MIN_JWT_SECRET_LENGTH: usize = 32;
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Minimum Argon2 cost.
    const MIN_HASH_COST: u32 = 4;
    /// Maximum Argon2 cost.
    const MAX_HASH_COST: u32 = 256;
    /// Supported signing algorithms.
    const SUPPORTED_ALGORITHMS: &'static [&'static str] = &["HS256", "HS384", "HS512"];
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_security(&config.security, &mut errors);
        Self::validate_server(&config.server, &mut errors);
        Self::validate_database(&config.database, &mut errors);
        Self::validate_redis(&config.redis, &mut errors);
        Self::validate_mail(&config.mail, &mut errors);
        Self::validate_rate_limit(&config.rate_limit, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_security(config: &crate::SecurityConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.jwt_secret.is_empty() {
            errors.push(ConfigValidationError::MissingJwtSecret);
        } else if config.jwt_secret.len() < Self::MIN_JWT_SECRET_LENGTH {
            errors.push(ConfigValidationError::JwtSecretTooShort {
                actual: config.jwt_secret.len(),
                minimum: Self::MIN_JWT_SECRET_LENGTH,
            });
        }

        if !Self::SUPPORTED_ALGORITHMS.contains(&config.jwt_algorithm.as_str()) {
            errors.push(ConfigValidationError::UnsupportedJwtAlgorithm {
                value: config.jwt_algorithm.clone(),
            });
        }

        if config.access_token_expiration_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "security.access_token_expiration_secs".to_string(),
                value: 0,
            });
        }

        if !(Self::MIN_HASH_COST..=Self::MAX_HASH_COST).contains(&config.password_hash_cost) {
            errors.push(ConfigValidationError::InvalidHashCost {
                value: config.password_hash_cost,
                minimum: Self::MIN_HASH_COST,
                maximum: Self::MAX_HASH_COST,
            });
        }
    }

    fn validate_server(config: &crate::ServerConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.port == 0 {
            errors.push(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: config.port,
            });
        }

        if config.request_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "server.request_timeout_secs".to_string(),
                value: 0,
            });
        }

        if let Err(e) = Url::parse(&config.public_url) {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "public".to_string(),
                message: e.to_string(),
            });
        }
    }

    fn validate_database(config: &crate::DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.url.is_empty() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else if !config.url.starts_with("mysql://") {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL must start with mysql://".to_string(),
            });
        }

        if config.min_connections > config.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.connect_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    fn validate_redis(config: &crate::RedisConfig, errors: &mut Vec<ConfigValidationError>) {
        if !config.enabled {
            return;
        }

        if !config.url.starts_with("redis://") && !config.url.starts_with("rediss://") {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            });
        }

        if config.pool_size > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
    }

    fn validate_mail(config: &crate::MailConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.queue_capacity == 0 {
            errors.push(ConfigValidationError::NonPositiveLimit {
                name: "mail.queue_capacity".to_string(),
            });
        }

        if !config.enabled {
            return;
        }

        if config.smtp_host.trim().is_empty() {
            errors.push(ConfigValidationError::MissingMailSetting {
                name: "smtp_host".to_string(),
            });
        }
        if config.from_address.trim().is_empty() {
            errors.push(ConfigValidationError::MissingMailSetting {
                name: "from_address".to_string(),
            });
        }
    }

    fn validate_rate_limit(config: &crate::RateLimitConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.enabled && config.me_requests_per_minute == 0 {
            errors.push(ConfigValidationError::NonPositiveLimit {
                name: "rate_limit.me_requests_per_minute".to_string(),
            });
        }
    }

    fn validate_observability(
        config: &crate::ObservabilityConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }

        let format = config.log_format.to_lowercase();
        if format != "pretty" && format != "json" {
            errors.push(ConfigValidationError::InvalidLogFormat {
                value: config.log_format.clone(),
            });
        }
    }
}

/// Formats validation errors for display.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.security.jwt_secret = "s".repeat(32);
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(ConfigValidator::validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_jwt_secret_is_fatal() {
        let config = AppConfig::default();
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigValidationError::MissingJwtSecret));
    }

    #[test]
    fn test_jwt_secret_too_short() {
        let mut config = valid_config();
        config.security.jwt_secret = "short".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::JwtSecretTooShort { actual: 5, .. })));
    }

    #[test]
    fn test_unsupported_algorithm() {
        let mut config = valid_config();
        config.security.jwt_algorithm = "RS256".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::UnsupportedJwtAlgorithm { .. })));
    }

    #[test]
    fn test_database_url_must_be_mysql() {
        let mut config = valid_config();
        config.database.url = "postgres://localhost/rolodex".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidUrl { url_type, .. } if url_type == "database")));
    }

    #[test]
    fn test_invalid_pool_size() {
        let mut config = valid_config();
        config.database.min_connections = 50;
        config.database.max_connections = 10;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigValidationError::InvalidPoolSize { min: 50, max: 10 }));
    }

    #[test]
    fn test_redis_url_ignored_when_disabled() {
        let mut config = valid_config();
        config.redis.enabled = false;
        config.redis.url = "not-a-url".to_string();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_mail_requires_host_when_enabled() {
        let mut config = valid_config();
        config.mail.enabled = true;
        config.mail.smtp_host = String::new();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigValidationError::MissingMailSetting {
            name: "smtp_host".to_string()
        }));
    }

    #[test]
    fn test_multiple_errors_are_collected() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        config.observability.log_format = "xml".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.len() >= 3);

        let report = format_validation_errors(&errors);
        assert!(report.starts_with("Configuration validation failed:"));
        assert!(report.contains("JWT secret is not set"));
    }
}
