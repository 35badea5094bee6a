use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{Money, PaymentDetail, PaymentMain, PaymentMethod, PaymentStatus};
use crate::ports::payment_repository_port::PaymentRepositoryPort;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool};
use std::sync::Arc;
use tracing::{debug, error};

const MAIN_COLUMNS: &str = r#"
    payment_main_no, trade_order_no, amount_cents, currency, status,
    created_at, updated_at
"#;

const DETAIL_COLUMNS: &str = r#"
    payment_detail_no, payment_main_no, payment_method, amount_cents,
    currency, status, channel_code, channel_order_no, created_at, updated_at
"#;

/// MySQL支付主单/明细仓储实现
#[derive(Clone)]
pub struct MySqlPaymentRepository {
    pool: Arc<Pool<MySql>>,
}

impl MySqlPaymentRepository {
    pub fn new(pool: Arc<Pool<MySql>>) -> Self {
        Self { pool }
    }
}

/// 业务唯一键，冲突表示并发请求已创建同一记录
const BUSINESS_UNIQUE_KEYS: [&str; 2] = ["uk_trade_order_no", "uk_main_active_method"];

fn is_business_key_violation(constraint: Option<&str>, message: &str) -> bool {
    BUSINESS_UNIQUE_KEYS
        .iter()
        .any(|k| constraint.is_some_and(|c| c.contains(k)) || message.contains(k))
}

/// 业务唯一键冲突转换为 `DuplicateRecord`，主键冲突转换为 `IdConflict`
fn map_insert_error(e: sqlx::Error, key: &str, id: &str) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            if is_business_key_violation(db.constraint(), db.message()) {
                DomainError::DuplicateRecord(key.to_string())
            } else {
                DomainError::IdConflict(id.to_string())
            }
        }
        _ => DomainError::DatabaseError(e),
    }
}

#[async_trait]
impl PaymentRepositoryPort for MySqlPaymentRepository {
    async fn find_main_by_trade_order_no(
        &self,
        trade_order_no: &str,
    ) -> DomainResult<Option<PaymentMain>> {
        let query = format!(
            "SELECT {} FROM t_payment_main WHERE trade_order_no = ?",
            MAIN_COLUMNS
        );

        let row = sqlx::query_as::<_, PaymentMainRow>(&query)
            .bind(trade_order_no)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(PaymentMainRow::into_main).transpose()
    }

    async fn insert_main(&self, main: &PaymentMain) -> DomainResult<()> {
        let query = r#"
            INSERT INTO t_payment_main (
                payment_main_no, trade_order_no, amount_cents, currency, status,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&main.payment_main_no)
            .bind(&main.trade_order_no)
            .bind(main.amount.to_cents())
            .bind(&main.currency)
            .bind(main.status.code())
            .bind(main.created_at)
            .bind(main.updated_at)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| map_insert_error(e, &main.trade_order_no, &main.payment_main_no))?;

        debug!("Payment main saved: {}", main.payment_main_no);
        Ok(())
    }

    async fn update_main_status(
        &self,
        payment_main_no: &str,
        status: PaymentStatus,
    ) -> DomainResult<()> {
        let query = r#"
            UPDATE t_payment_main
            SET status = ?, updated_at = ?
            WHERE payment_main_no = ?
        "#;

        let rows_affected = sqlx::query(query)
            .bind(status.code())
            .bind(Utc::now())
            .bind(payment_main_no)
            .execute(self.pool.as_ref())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            error!("No payment main found to update: {}", payment_main_no);
            return Err(DomainError::InternalError(format!(
                "Payment main not found: {}",
                payment_main_no
            )));
        }

        debug!("Payment main {} -> {}", payment_main_no, status);
        Ok(())
    }

    async fn find_active_detail(
        &self,
        payment_main_no: &str,
        method: &PaymentMethod,
    ) -> DomainResult<Option<PaymentDetail>> {
        let query = format!(
            "SELECT {} FROM t_payment_detail \
             WHERE payment_main_no = ? AND payment_method = ? AND status IN ('PAYING', 'PAID') \
             LIMIT 1",
            DETAIL_COLUMNS
        );

        let row = sqlx::query_as::<_, PaymentDetailRow>(&query)
            .bind(payment_main_no)
            .bind(method.as_str())
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(PaymentDetailRow::into_detail).transpose()
    }

    async fn insert_detail(&self, detail: &PaymentDetail) -> DomainResult<()> {
        let query = r#"
            INSERT INTO t_payment_detail (
                payment_detail_no, payment_main_no, payment_method, amount_cents,
                currency, status, channel_code, channel_order_no, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&detail.payment_detail_no)
            .bind(&detail.payment_main_no)
            .bind(detail.payment_method.as_str())
            .bind(detail.amount.to_cents())
            .bind(&detail.currency)
            .bind(detail.status.code())
            .bind(&detail.channel_code)
            .bind(&detail.channel_order_no)
            .bind(detail.created_at)
            .bind(detail.updated_at)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| {
                map_insert_error(
                    e,
                    &format!("{}/{}", detail.payment_main_no, detail.payment_method),
                    &detail.payment_detail_no,
                )
            })?;

        debug!("Payment detail saved: {}", detail.payment_detail_no);
        Ok(())
    }

    async fn update_detail(&self, detail: &PaymentDetail) -> DomainResult<()> {
        let query = r#"
            UPDATE t_payment_detail
            SET status = ?, channel_code = ?, channel_order_no = ?, updated_at = ?
            WHERE payment_detail_no = ?
        "#;

        let rows_affected = sqlx::query(query)
            .bind(detail.status.code())
            .bind(&detail.channel_code)
            .bind(&detail.channel_order_no)
            .bind(detail.updated_at)
            .bind(&detail.payment_detail_no)
            .execute(self.pool.as_ref())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            error!("No payment detail found to update: {}", detail.payment_detail_no);
            return Err(DomainError::InternalError(format!(
                "Payment detail not found: {}",
                detail.payment_detail_no
            )));
        }

        debug!(
            "Payment detail {} -> {}",
            detail.payment_detail_no, detail.status
        );
        Ok(())
    }

    async fn find_stale_paying_details(
        &self,
        before: DateTime<Utc>,
        limit: u32,
    ) -> DomainResult<Vec<PaymentDetail>> {
        let query = format!(
            "SELECT {} FROM t_payment_detail \
             WHERE status = 'PAYING' AND updated_at < ? \
             ORDER BY updated_at LIMIT ?",
            DETAIL_COLUMNS
        );

        let rows = sqlx::query_as::<_, PaymentDetailRow>(&query)
            .bind(before)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.into_iter().map(PaymentDetailRow::into_detail).collect()
    }
}

/// 主单行结构体
#[derive(Debug, sqlx::FromRow)]
struct PaymentMainRow {
    payment_main_no: String,
    trade_order_no: String,
    amount_cents: i64,
    currency: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PaymentMainRow {
    fn into_main(self) -> DomainResult<PaymentMain> {
        Ok(PaymentMain {
            payment_main_no: self.payment_main_no,
            trade_order_no: self.trade_order_no,
            amount: Money::from_cents(self.amount_cents),
            currency: self.currency,
            status: self.status.parse()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// 明细行结构体
#[derive(Debug, sqlx::FromRow)]
struct PaymentDetailRow {
    payment_detail_no: String,
    payment_main_no: String,
    payment_method: String,
    amount_cents: i64,
    currency: String,
    status: String,
    channel_code: Option<String>,
    channel_order_no: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PaymentDetailRow {
    fn into_detail(self) -> DomainResult<PaymentDetail> {
        Ok(PaymentDetail {
            payment_detail_no: self.payment_detail_no,
            payment_main_no: self.payment_main_no,
            payment_method: PaymentMethod::new(&self.payment_method)?,
            amount: Money::from_cents(self.amount_cents),
            currency: self.currency,
            status: self.status.parse()?,
            channel_code: self.channel_code,
            channel_order_no: self.channel_order_no,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_key_violation_detection() {
        assert!(is_business_key_violation(
            None,
            "Duplicate entry 'P1-WECHAT' for key 't_payment_detail.uk_main_active_method'"
        ));
        assert!(is_business_key_violation(
            Some("uk_trade_order_no"),
            "Duplicate entry 'T1' for key 'uk_trade_order_no'"
        ));
        assert!(!is_business_key_violation(
            None,
            "Duplicate entry 'D1' for key 't_payment_detail.PRIMARY'"
        ));
    }
}
