use crate::domain::errors::DomainResult;
use crate::domain::{TradeOrderLite, TradeOrderStatus};
use async_trait::async_trait;

/// 交易订单端口：只读查询与带外状态同步
#[async_trait]
pub trait TradeOrderPort: Send + Sync + 'static {
    async fn get_order_lite(&self, trade_order_no: &str) -> DomainResult<Option<TradeOrderLite>>;

    async fn update_status(
        &self,
        trade_order_no: &str,
        status: TradeOrderStatus,
    ) -> DomainResult<()>;
}
