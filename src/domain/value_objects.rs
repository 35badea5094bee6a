use crate::domain::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 支付状态（主单与明细共用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// 初始化
    Init,
    /// 支付中
    Paying,
    /// 支付成功
    Paid,
    /// 支付失败
    Failed,
}

impl PaymentStatus {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentStatus::Init => "INIT",
            PaymentStatus::Paying => "PAYING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Failed => "FAILED",
        }
    }

    /// 是否占用幂等锚点（支付中或已成功）
    pub fn is_active(&self) -> bool {
        matches!(self, PaymentStatus::Paying | PaymentStatus::Paid)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INIT" => Ok(PaymentStatus::Init),
            "PAYING" => Ok(PaymentStatus::Paying),
            "PAID" => Ok(PaymentStatus::Paid),
            "FAILED" => Ok(PaymentStatus::Failed),
            other => Err(DomainError::ValidationError(format!(
                "Unknown payment status: {}",
                other
            ))),
        }
    }
}

/// 交易订单状态（由收单侧维护）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeOrderStatus {
    Init,
    Paying,
    Success,
    Failed,
    Closed,
}

impl TradeOrderStatus {
    pub fn code(&self) -> &'static str {
        match self {
            TradeOrderStatus::Init => "INIT",
            TradeOrderStatus::Paying => "PAYING",
            TradeOrderStatus::Success => "SUCCESS",
            TradeOrderStatus::Failed => "FAILED",
            TradeOrderStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for TradeOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TradeOrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INIT" => Ok(TradeOrderStatus::Init),
            "PAYING" => Ok(TradeOrderStatus::Paying),
            "SUCCESS" => Ok(TradeOrderStatus::Success),
            "FAILED" => Ok(TradeOrderStatus::Failed),
            "CLOSED" => Ok(TradeOrderStatus::Closed),
            other => Err(DomainError::ValidationError(format!(
                "Unknown trade order status: {}",
                other
            ))),
        }
    }
}

/// 支付方式编码，如 WECHAT、ALIPAY
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethod(String);

impl PaymentMethod {
    /// 编码统一转为大写，空编码视为非法
    pub fn new(code: impl AsRef<str>) -> Result<Self, DomainError> {
        let code = code.as_ref().trim();
        if code.is_empty() || code.len() > 32 {
            return Err(DomainError::ValidationError(
                "Payment method must be 1-32 characters".to_string(),
            ));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 货币金额（分为单位，避免浮点数精度问题）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// 金额（分）
    pub amount_cents: i64,
}

impl Money {
    /// 创建新的金额对象（单位：元）
    pub fn from_yuan(amount: i64) -> Self {
        Self {
            amount_cents: amount * 100,
        }
    }

    /// 创建新的金额对象（单位：分）
    pub fn from_cents(cents: i64) -> Self {
        Self { amount_cents: cents }
    }

    /// 转换为分
    pub fn to_cents(&self) -> i64 {
        self.amount_cents
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_yuan() {
        let money = Money::from_yuan(100);
        assert_eq!(money.to_cents(), 10000);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_yuan(100).to_string(), "100.00");
        assert_eq!(Money::from_cents(1005).to_string(), "10.05");
        assert_eq!(Money::from_cents(-7).to_string(), "-0.07");
    }

    #[test]
    fn test_payment_status_codes() {
        for status in [
            PaymentStatus::Init,
            PaymentStatus::Paying,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
        ] {
            assert_eq!(status.code().parse::<PaymentStatus>().unwrap(), status);
        }
        assert!("SUCCESS".parse::<PaymentStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Paid).unwrap(),
            "\"PAID\""
        );
    }

    #[test]
    fn test_payment_method_normalized() {
        let method = PaymentMethod::new(" wechat ").unwrap();
        assert_eq!(method.as_str(), "WECHAT");
        assert!(PaymentMethod::new("   ").is_err());
    }
}
