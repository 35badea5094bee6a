use crate::domain::{PaymentDetail, PaymentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 受理支付请求（查询参数）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptPaymentQuery {
    /// 交易单号
    pub trade_order_no: String,

    /// 支付方式
    pub payment_method: String,
}

/// 受理支付响应
#[derive(Debug, Serialize)]
pub struct AcceptPaymentResponse {
    /// 支付主单号
    pub payment_main_no: String,
}

/// 支付结果查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResultQuery {
    pub trade_order_no: String,
}

/// 支付结果响应
#[derive(Debug, Serialize)]
pub struct PaymentResultResponse {
    pub trade_order_no: String,
    pub status: PaymentStatus,
}

/// 卡单查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StuckPaymentsQuery {
    /// 支付中超过该秒数视为卡单
    #[serde(default = "default_stuck_age_secs")]
    pub older_than_secs: u64,

    #[serde(default = "default_stuck_limit")]
    pub limit: u32,
}

fn default_stuck_age_secs() -> u64 {
    600
}

fn default_stuck_limit() -> u32 {
    100
}

/// 卡单明细
#[derive(Debug, Serialize)]
pub struct StuckPaymentResponse {
    pub payment_detail_no: String,
    pub payment_main_no: String,
    pub payment_method: String,
    pub amount: i64,
    pub currency: String,
    pub channel_code: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<PaymentDetail> for StuckPaymentResponse {
    fn from(detail: PaymentDetail) -> Self {
        Self {
            payment_detail_no: detail.payment_detail_no,
            payment_main_no: detail.payment_main_no,
            payment_method: detail.payment_method.to_string(),
            amount: detail.amount.to_cents(),
            currency: detail.currency,
            channel_code: detail.channel_code,
            updated_at: detail.updated_at,
        }
    }
}

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: String, message: String) -> Self {
        Self { error, message }
    }
}
