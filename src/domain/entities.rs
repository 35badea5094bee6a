use crate::domain::errors::DomainResult;
use crate::domain::events::PaymentEvent;
use crate::domain::state_machine::PaymentStateMachine;
use crate::domain::value_objects::{Money, PaymentMethod, PaymentStatus, TradeOrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 交易订单投影（只读，由订单侧维护）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOrderLite {
    /// 交易单号
    pub trade_order_no: String,

    /// 订单金额
    pub amount: Money,

    /// 币种
    pub currency: String,

    /// 订单状态
    pub status: TradeOrderStatus,
}

/// 支付主单，每个交易订单一条
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMain {
    /// 支付主单号
    pub payment_main_no: String,

    /// 交易单号（唯一）
    pub trade_order_no: String,

    pub amount: Money,

    pub currency: String,

    pub status: PaymentStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl PaymentMain {
    /// 以订单金额币种创建初始化主单
    pub fn new(payment_main_no: String, order: &TradeOrderLite) -> Self {
        let now = Utc::now();

        Self {
            payment_main_no,
            trade_order_no: order.trade_order_no.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            status: PaymentStatus::Init,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    /// 首次尝试时进入支付中，返回状态是否发生变化
    ///
    /// 已失败的主单在重试期间保持失败，只由本次结果覆盖。
    pub fn mark_paying(&mut self) -> bool {
        self.status == PaymentStatus::Init && self.follow(PaymentStatus::Paying)
    }

    /// 主单状态跟随明细，返回状态是否发生变化
    pub fn follow(&mut self, status: PaymentStatus) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.updated_at = Utc::now();
        true
    }
}

/// 支付明细：主单在某一支付方式下的一次尝试
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetail {
    /// 支付明细号
    pub payment_detail_no: String,

    /// 支付主单号
    pub payment_main_no: String,

    pub payment_method: PaymentMethod,

    pub amount: Money,

    pub currency: String,

    pub status: PaymentStatus,

    /// 渠道编码
    pub channel_code: Option<String>,

    /// 渠道订单号
    pub channel_order_no: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl PaymentDetail {
    /// 创建初始化明细，金额币种取自主单
    pub fn new(payment_detail_no: String, main: &PaymentMain, method: PaymentMethod) -> Self {
        let now = Utc::now();

        Self {
            payment_detail_no,
            payment_main_no: main.payment_main_no.clone(),
            payment_method: method,
            amount: main.amount,
            currency: main.currency.clone(),
            status: PaymentStatus::Init,
            channel_code: None,
            channel_order_no: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 按状态机触发事件，未注册的转换返回错误且状态不变
    pub fn fire(&mut self, machine: &PaymentStateMachine, event: PaymentEvent) -> DomainResult<()> {
        self.status = machine.fire(self.status, event)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 记录渠道受理信息
    pub fn record_channel(&mut self, channel_code: &str, channel_order_no: Option<String>) {
        self.channel_code = Some(channel_code.to_string());
        self.channel_order_no = channel_order_no;
        self.updated_at = Utc::now();
    }
}
