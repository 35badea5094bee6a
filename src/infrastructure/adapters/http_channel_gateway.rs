use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::Money;
use crate::infrastructure::config::channel_config::ChannelConfig;
use crate::ports::channel_port::{ChannelGateway, ChannelResult};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Serialize;
use sha2::Sha256;
use std::sync::Arc;
use tracing::{debug, error};

type HmacSha256 = Hmac<Sha256>;

/// 渠道网关支付请求体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelPayRequest<'a> {
    channel_code: &'a str,
    payment_detail_no: &'a str,
    amount: i64,
    currency: &'a str,
}

/// 通过 HTTP 调用渠道网关服务
#[derive(Clone)]
pub struct HttpChannelGateway {
    config: Arc<ChannelConfig>,
    client: Client,
}

impl HttpChannelGateway {
    pub fn new(config: Arc<ChannelConfig>) -> DomainResult<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { config, client })
    }

    /// 签名串：时间戳\n随机串\n请求体\n
    fn build_signature(&self, timestamp: &str, nonce: &str, body: &str) -> DomainResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .map_err(|e| DomainError::ConfigurationError(format!("Invalid channel secret: {}", e)))?;
        mac.update(format!("{}\n{}\n{}\n", timestamp, nonce, body).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn generate_nonce_str() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl ChannelGateway for HttpChannelGateway {
    async fn pay(
        &self,
        channel_code: &str,
        payment_detail_no: &str,
        amount: Money,
        currency: &str,
    ) -> DomainResult<ChannelResult> {
        let url = format!("{}/api/channel/pay", self.config.base_url);
        let body = serde_json::to_string(&ChannelPayRequest {
            channel_code,
            payment_detail_no,
            amount: amount.to_cents(),
            currency,
        })?;

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let nonce = Self::generate_nonce_str();
        let signature = self.build_signature(&timestamp, &nonce, &body)?;
        debug!("Channel pay request body: {}", body);

        let response = self
            .client
            .post(&url)
            .header("X-Merchant-Id", &self.config.merchant_id)
            .header("X-Timestamp", timestamp)
            .header("X-Nonce", nonce)
            .header("X-Signature", signature)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Channel API error: {} - {}", status, error_text);
            return Err(DomainError::ChannelError(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let result: ChannelResult = response.json().await?;
        debug!("Channel pay response for {}: {:?}", payment_detail_no, result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn gateway(secret: &str) -> HttpChannelGateway {
        HttpChannelGateway::new(Arc::new(ChannelConfig {
            base_url: "http://localhost:9000".to_string(),
            merchant_id: "M1".to_string(),
            secret: secret.to_string(),
            methods: vec![],
            request_timeout: Duration::from_secs(1),
        }))
        .unwrap()
    }

    #[test]
    fn test_signature_is_deterministic() {
        let gw = gateway("secret");
        let a = gw.build_signature("1700000000", "abc", "{}").unwrap();
        let b = gw.build_signature("1700000000", "abc", "{}").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, gw.build_signature("1700000001", "abc", "{}").unwrap());
        assert_ne!(a, gateway("other").build_signature("1700000000", "abc", "{}").unwrap());
    }

    #[test]
    fn test_nonce_has_no_dashes() {
        let nonce = HttpChannelGateway::generate_nonce_str();
        assert_eq!(nonce.len(), 32);
        assert!(!nonce.contains('-'));
    }

    #[test]
    fn test_channel_result_wire_format() {
        let json = r#"{"success":false,"channelOrderNo":null,"errorCode":"E1","errorMessage":"no"}"#;
        let result: ChannelResult = serde_json::from_str(json).unwrap();
        assert_eq!(result, ChannelResult::failed("E1", "no"));
    }
}
