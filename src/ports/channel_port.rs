use crate::domain::errors::DomainResult;
use crate::domain::Money;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 系统错误码，渠道异常或超时时使用
pub const SYSTEM_ERROR_CODE: &str = "5000";

/// 渠道支付结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResult {
    pub success: bool,
    pub channel_order_no: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl ChannelResult {
    pub fn succeeded(channel_order_no: impl Into<String>) -> Self {
        Self {
            success: true,
            channel_order_no: Some(channel_order_no.into()),
            error_code: None,
            error_message: None,
        }
    }

    pub fn failed(error_code: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            channel_order_no: None,
            error_code: Some(error_code.into()),
            error_message: Some(error_message.into()),
        }
    }

    pub fn system_error(error_message: impl Into<String>) -> Self {
        Self::failed(SYSTEM_ERROR_CODE, error_message)
    }
}

/// 渠道网关端口接口
#[async_trait]
pub trait ChannelGateway: Send + Sync {
    /// 执行资金划转
    async fn pay(
        &self,
        channel_code: &str,
        payment_detail_no: &str,
        amount: Money,
        currency: &str,
    ) -> DomainResult<ChannelResult>;
}
