use crate::domain::errors::DomainResult;
use crate::domain::{PaymentDetail, PaymentMain, PaymentMethod, PaymentStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 支付主单/明细仓储端口接口
///
/// 插入时违反唯一约束必须返回 `DomainError::DuplicateRecord`，
/// 由编排层按"并发请求已创建"处理。
#[async_trait]
pub trait PaymentRepositoryPort: Send + Sync + 'static {
    /// 根据交易单号查找主单
    async fn find_main_by_trade_order_no(
        &self,
        trade_order_no: &str,
    ) -> DomainResult<Option<PaymentMain>>;

    /// 保存主单（交易单号唯一）
    async fn insert_main(&self, main: &PaymentMain) -> DomainResult<()>;

    /// 更新主单状态
    async fn update_main_status(
        &self,
        payment_main_no: &str,
        status: PaymentStatus,
    ) -> DomainResult<()>;

    /// 查找同一支付方式下支付中或已成功的明细
    async fn find_active_detail(
        &self,
        payment_main_no: &str,
        method: &PaymentMethod,
    ) -> DomainResult<Option<PaymentDetail>>;

    /// 保存明细（同一主单同一方式至多一条活跃明细）
    async fn insert_detail(&self, detail: &PaymentDetail) -> DomainResult<()>;

    /// 更新明细的渠道信息与状态
    async fn update_detail(&self, detail: &PaymentDetail) -> DomainResult<()>;

    /// 查找更新时间早于 `before` 仍处于支付中的明细
    async fn find_stale_paying_details(
        &self,
        before: DateTime<Utc>,
        limit: u32,
    ) -> DomainResult<Vec<PaymentDetail>>;
}
