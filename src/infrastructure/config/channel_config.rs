use crate::domain::errors::{DomainError, DomainResult};
use crate::infrastructure::config::engine_config::{env_or, parse_env};
use std::sync::Arc;
use std::time::Duration;

/// 渠道网关配置
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// 渠道网关基础URL
    pub base_url: String,

    /// 商户号
    pub merchant_id: String,

    /// 请求签名密钥
    pub secret: String,

    /// 支持的支付方式，支付方式编码即渠道编码
    pub methods: Vec<String>,

    /// 单次HTTP请求超时
    pub request_timeout: Duration,
}

impl ChannelConfig {
    /// 未设置 `CHANNEL_BASE_URL` 时返回 `None`，使用模拟渠道
    pub fn from_env() -> DomainResult<Option<Arc<Self>>> {
        let Ok(base_url) = std::env::var("CHANNEL_BASE_URL") else {
            return Ok(None);
        };

        let merchant_id = std::env::var("CHANNEL_MERCHANT_ID").map_err(|_| {
            DomainError::ConfigurationError("CHANNEL_MERCHANT_ID must be set".to_string())
        })?;
        let secret = std::env::var("CHANNEL_SECRET").map_err(|_| {
            DomainError::ConfigurationError("CHANNEL_SECRET must be set".to_string())
        })?;

        Ok(Some(Arc::new(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            merchant_id,
            secret,
            methods: configured_methods(),
            request_timeout: Duration::from_millis(parse_env("CHANNEL_HTTP_TIMEOUT_MS", 8000)?),
        })))
    }
}

/// `CHANNEL_METHODS` 逗号分隔，默认 WECHAT,ALIPAY,UNIONPAY
pub fn configured_methods() -> Vec<String> {
    env_or("CHANNEL_METHODS", "WECHAT,ALIPAY,UNIONPAY")
        .split(',')
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect()
}
