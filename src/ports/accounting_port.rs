use crate::domain::errors::DomainResult;
use crate::domain::Money;
use async_trait::async_trait;

/// 记账端口接口，渠道成功后调用
#[async_trait]
pub trait AccountingPort: Send + Sync + 'static {
    /// 返回 `false` 表示记账被拒绝
    async fn book(
        &self,
        payment_main_no: &str,
        payment_detail_no: &str,
        amount: Money,
        currency: &str,
    ) -> DomainResult<bool>;
}
