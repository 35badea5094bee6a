use crate::domain::errors::DomainResult;
use crate::domain::{PaymentStatus, TradeOrderLite};
use crate::ports::{CachePort, PaymentRepositoryPort, TradeOrderPort};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// 负缓存哨兵值
pub const NEGATIVE_SENTINEL: &str = "";

/// 缓存键前缀与过期时间
#[derive(Debug, Clone)]
pub struct CachePolicy {
    pub prefix: String,
    pub trade_lite_ttl_secs: u64,
    pub status_success_ttl_secs: u64,
    pub status_fail_ttl_secs: u64,
    pub negative_ttl_secs: u64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            prefix: "cache:".to_string(),
            trade_lite_ttl_secs: 300,
            status_success_ttl_secs: 300,
            status_fail_ttl_secs: 60,
            negative_ttl_secs: 30,
        }
    }
}

impl CachePolicy {
    pub fn trade_lite_key(&self, trade_order_no: &str) -> String {
        format!("{}trade:lite:{}", self.prefix, trade_order_no)
    }

    pub fn payment_status_key(&self, trade_order_no: &str) -> String {
        format!("{}payment:status:{}", self.prefix, trade_order_no)
    }

    /// PAID 长缓存，其余状态短缓存以限制在途状态的陈旧时间
    pub fn status_ttl(&self, status: PaymentStatus) -> u64 {
        if status == PaymentStatus::Paid {
            self.status_success_ttl_secs
        } else {
            self.status_fail_ttl_secs
        }
    }
}

/// 旁路缓存读写
pub struct CacheAside<C: CachePort> {
    cache: Arc<C>,
    policy: CachePolicy,
}

impl<C: CachePort> CacheAside<C> {
    pub fn new(cache: Arc<C>, policy: CachePolicy) -> Self {
        Self { cache, policy }
    }

    /// 先查缓存；未命中回源，命中源则回写，源不存在则写负缓存
    pub async fn read_through<T, F, Fut>(
        &self,
        key: &str,
        load: F,
        ttl: impl Fn(&T) -> u64,
    ) -> DomainResult<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = DomainResult<Option<T>>>,
    {
        match self.cache.get(key).await {
            Some(raw) if raw == NEGATIVE_SENTINEL => {
                debug!("Negative cache hit: {}", key);
                return Ok(None);
            }
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!("Cache hit: {}", key);
                    return Ok(Some(value));
                }
                Err(e) => warn!("Discarding undecodable cache entry {}: {}", key, e),
            },
            None => {}
        }

        let loaded = load().await?;
        match &loaded {
            Some(value) => self.put(key, value, ttl(value)).await,
            None => {
                debug!("Source miss, writing negative cache: {}", key);
                self.cache
                    .set(key, NEGATIVE_SENTINEL, self.policy.negative_ttl_secs)
                    .await;
            }
        }
        Ok(loaded)
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        match serde_json::to_string(value) {
            Ok(raw) => self.cache.set(key, &raw, ttl_secs).await,
            Err(e) => warn!("Failed to encode cache entry {}: {}", key, e),
        }
    }

    pub async fn invalidate(&self, key: &str) {
        self.cache.delete(key).await;
    }

    /// 交易订单投影
    pub async fn order_lite<O: TradeOrderPort>(
        &self,
        orders: &O,
        trade_order_no: &str,
    ) -> DomainResult<Option<TradeOrderLite>> {
        let ttl = self.policy.trade_lite_ttl_secs;
        self.read_through(
            &self.policy.trade_lite_key(trade_order_no),
            || orders.get_order_lite(trade_order_no),
            |_| ttl,
        )
        .await
    }

    pub async fn put_order_lite(&self, order: &TradeOrderLite) {
        self.put(
            &self.policy.trade_lite_key(&order.trade_order_no),
            order,
            self.policy.trade_lite_ttl_secs,
        )
        .await;
    }

    /// 支付状态，回源读取主单状态
    pub async fn payment_status<R: PaymentRepositoryPort>(
        &self,
        repository: &R,
        trade_order_no: &str,
    ) -> DomainResult<Option<PaymentStatus>> {
        self.read_through(
            &self.policy.payment_status_key(trade_order_no),
            || async {
                Ok(repository
                    .find_main_by_trade_order_no(trade_order_no)
                    .await?
                    .map(|main| main.status))
            },
            |status| self.policy.status_ttl(*status),
        )
        .await
    }

    pub async fn put_payment_status(&self, trade_order_no: &str, status: PaymentStatus) {
        self.put(
            &self.policy.payment_status_key(trade_order_no),
            &status,
            self.policy.status_ttl(status),
        )
        .await;
    }

    pub async fn invalidate_payment_status(&self, trade_order_no: &str) {
        self.invalidate(&self.policy.payment_status_key(trade_order_no))
            .await;
    }
}
