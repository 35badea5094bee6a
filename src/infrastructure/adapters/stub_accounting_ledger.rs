use crate::domain::errors::DomainResult;
use crate::domain::Money;
use crate::ports::accounting_port::AccountingPort;
use async_trait::async_trait;
use tracing::info;

/// 记账桩：账务系统接入前总是记账成功
#[derive(Clone, Default)]
pub struct StubAccountingLedger;

impl StubAccountingLedger {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AccountingPort for StubAccountingLedger {
    async fn book(
        &self,
        payment_main_no: &str,
        payment_detail_no: &str,
        amount: Money,
        currency: &str,
    ) -> DomainResult<bool> {
        info!(
            "Booking {} {} for {}/{}",
            amount, currency, payment_main_no, payment_detail_no
        );
        Ok(true)
    }
}
