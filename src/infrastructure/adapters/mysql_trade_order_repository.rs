use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{Money, TradeOrderLite, TradeOrderStatus};
use crate::ports::trade_order_port::TradeOrderPort;
use async_trait::async_trait;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use tracing::{debug, warn};

/// 交易订单只读查询（表由收单侧维护）
#[derive(Clone)]
pub struct MySqlTradeOrderRepository {
    pool: Arc<Pool<MySql>>,
}

impl MySqlTradeOrderRepository {
    pub fn new(pool: Arc<Pool<MySql>>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TradeOrderRow {
    trade_order_no: String,
    amount_cents: i64,
    currency: String,
    status: String,
}

#[async_trait]
impl TradeOrderPort for MySqlTradeOrderRepository {
    async fn get_order_lite(&self, trade_order_no: &str) -> DomainResult<Option<TradeOrderLite>> {
        let query = r#"
            SELECT trade_order_no, amount_cents, currency, status
            FROM t_trade_order
            WHERE trade_order_no = ?
        "#;

        let row = sqlx::query_as::<_, TradeOrderRow>(query)
            .bind(trade_order_no)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(|row| {
            Ok(TradeOrderLite {
                trade_order_no: row.trade_order_no,
                amount: Money::from_cents(row.amount_cents),
                currency: row.currency,
                status: row.status.parse()?,
            })
        })
        .transpose()
    }

    async fn update_status(
        &self,
        trade_order_no: &str,
        status: TradeOrderStatus,
    ) -> DomainResult<()> {
        let query = "UPDATE t_trade_order SET status = ? WHERE trade_order_no = ?";

        let rows_affected = sqlx::query(query)
            .bind(status.code())
            .bind(trade_order_no)
            .execute(self.pool.as_ref())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            warn!("No trade order found to update: {}", trade_order_no);
            return Err(DomainError::OrderNotFound(trade_order_no.to_string()));
        }

        debug!("Trade order {} -> {}", trade_order_no, status);
        Ok(())
    }
}
