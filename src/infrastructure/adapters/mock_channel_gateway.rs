use crate::domain::errors::DomainResult;
use crate::domain::Money;
use crate::ports::channel_port::{ChannelGateway, ChannelResult};
use async_trait::async_trait;
use tracing::info;

/// 模拟渠道：直接返回成功，用于未配置渠道网关的本地环境
#[derive(Clone, Default)]
pub struct MockChannelGateway;

impl MockChannelGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChannelGateway for MockChannelGateway {
    async fn pay(
        &self,
        channel_code: &str,
        payment_detail_no: &str,
        amount: Money,
        currency: &str,
    ) -> DomainResult<ChannelResult> {
        info!(
            "Mock channel {} paying {} {} for {}",
            channel_code, amount, currency, payment_detail_no
        );
        Ok(ChannelResult::succeeded(uuid::Uuid::new_v4().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_channel_succeeds() {
        let result = MockChannelGateway::new()
            .pay("WECHAT", "D1", Money::from_yuan(1), "CNY")
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.channel_order_no.is_some());
        assert!(result.error_code.is_none());
    }
}
