use serde::{Deserialize, Serialize};
use std::fmt;

/// 驱动支付状态流转的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentEvent {
    /// 发起支付
    StartPay,
    /// 渠道成功
    ChannelSuccess,
    /// 渠道失败
    ChannelFail,
    /// 记账成功
    AccountSuccess,
    /// 记账失败
    AccountFail,
}

impl PaymentEvent {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentEvent::StartPay => "START_PAY",
            PaymentEvent::ChannelSuccess => "CHANNEL_SUCCESS",
            PaymentEvent::ChannelFail => "CHANNEL_FAIL",
            PaymentEvent::AccountSuccess => "ACCOUNT_SUCCESS",
            PaymentEvent::AccountFail => "ACCOUNT_FAIL",
        }
    }
}

impl fmt::Display for PaymentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
