use crate::application::{CachePolicy, CallDeadlines};
use crate::domain::errors::{DomainError, DomainResult};
use std::str::FromStr;
use std::time::Duration;

/// 支付引擎配置
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub database_url: String,
    pub redis_url: String,
    pub redis_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    pub cache: CachePolicy,
    pub deadlines: CallDeadlines,
}

impl EngineConfig {
    pub fn from_env() -> DomainResult<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| DomainError::ConfigurationError("DATABASE_URL must be set".to_string()))?;

        let defaults = CachePolicy::default();
        let cache = CachePolicy {
            prefix: env_or("CACHE_PREFIX", &defaults.prefix),
            trade_lite_ttl_secs: parse_env("CACHE_TRADE_LITE_TTL_SECS", defaults.trade_lite_ttl_secs)?,
            status_success_ttl_secs: parse_env(
                "CACHE_STATUS_SUCCESS_TTL_SECS",
                defaults.status_success_ttl_secs,
            )?,
            status_fail_ttl_secs: parse_env(
                "CACHE_STATUS_FAIL_TTL_SECS",
                defaults.status_fail_ttl_secs,
            )?,
            negative_ttl_secs: parse_env("CACHE_NEGATIVE_TTL_SECS", defaults.negative_ttl_secs)?,
        };

        let deadlines = CallDeadlines {
            channel: Duration::from_millis(parse_env("CHANNEL_TIMEOUT_MS", 10_000)?),
            ledger: Duration::from_millis(parse_env("LEDGER_TIMEOUT_MS", 5_000)?),
        };

        Ok(Self {
            database_url,
            redis_url: env_or("REDIS_URL", "redis://127.0.0.1:6379"),
            redis_max_connections: parse_env("REDIS_MAX_CONNECTIONS", 20)?,
            server_host: env_or("SERVER_HOST", "0.0.0.0"),
            server_port: parse_env("SERVER_PORT", 3000)?,
            cache,
            deadlines,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

pub(crate) fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// 未设置时取默认值，设置了但无法解析时报配置错误
pub(crate) fn parse_env<T: FromStr>(key: &str, default: T) -> DomainResult<T> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            DomainError::ConfigurationError(format!("{} has invalid value: {}", key, raw))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_and_invalid() {
        assert_eq!(parse_env("PAYMENT_ENGINE_TEST_UNSET_KEY", 42u64).unwrap(), 42);

        // SAFETY: 测试独占该变量名
        unsafe { std::env::set_var("PAYMENT_ENGINE_TEST_BAD_KEY", "abc") };
        let result = parse_env("PAYMENT_ENGINE_TEST_BAD_KEY", 1u64);
        assert!(matches!(result, Err(DomainError::ConfigurationError(_))));
    }

    #[test]
    fn test_listen_addr() {
        let config = EngineConfig {
            database_url: "mysql://localhost/payment".to_string(),
            redis_url: "redis://localhost".to_string(),
            redis_max_connections: 4,
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            cache: CachePolicy::default(),
            deadlines: CallDeadlines::default(),
        };
        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
    }
}
