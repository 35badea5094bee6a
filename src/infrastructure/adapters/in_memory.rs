//! 内存版仓储与缓存，供单元测试替代 MySQL / Redis

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{
    PaymentDetail, PaymentMain, PaymentMethod, PaymentStatus, TradeOrderLite, TradeOrderStatus,
};
use crate::ports::{CachePort, PaymentRepositoryPort, TradeOrderPort};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// 记录 TTL 的内存缓存，可模拟不可用
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, (String, u64)>>,
    available: AtomicBool,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).map(|(v, _)| v.clone())
    }

    pub async fn ttl_of(&self, key: &str) -> Option<u64> {
        self.entries.read().await.get(key).map(|(_, ttl)| *ttl)
    }
}

#[async_trait]
impl CachePort for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        if !self.available.load(Ordering::SeqCst) {
            return None;
        }
        self.raw(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) {
        if !self.available.load(Ordering::SeqCst) {
            return;
        }
        self.entries
            .write()
            .await
            .insert(key.to_string(), (value.to_string(), ttl_secs));
    }

    async fn delete(&self, key: &str) {
        if !self.available.load(Ordering::SeqCst) {
            return;
        }
        self.entries.write().await.remove(key);
    }
}

/// 内存交易订单表
pub struct InMemoryTradeOrders {
    orders: RwLock<HashMap<String, TradeOrderLite>>,
    lookups: AtomicUsize,
}

impl InMemoryTradeOrders {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            lookups: AtomicUsize::new(0),
        }
    }

    pub async fn insert(&self, order: TradeOrderLite) {
        self.orders
            .write()
            .await
            .insert(order.trade_order_no.clone(), order);
    }

    pub async fn status_of(&self, trade_order_no: &str) -> Option<TradeOrderStatus> {
        self.orders
            .read()
            .await
            .get(trade_order_no)
            .map(|o| o.status)
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TradeOrderPort for InMemoryTradeOrders {
    async fn get_order_lite(&self, trade_order_no: &str) -> DomainResult<Option<TradeOrderLite>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.orders.read().await.get(trade_order_no).cloned())
    }

    async fn update_status(
        &self,
        trade_order_no: &str,
        status: TradeOrderStatus,
    ) -> DomainResult<()> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(trade_order_no)
            .ok_or_else(|| DomainError::OrderNotFound(trade_order_no.to_string()))?;
        order.status = status;
        Ok(())
    }
}

/// 内存支付仓储，与 MySQL 实现相同地执行唯一约束
pub struct InMemoryPaymentRepository {
    mains: RwLock<HashMap<String, PaymentMain>>,
    details: RwLock<Vec<PaymentDetail>>,
    available: AtomicBool,
    blind_lookups: AtomicUsize,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self {
            mains: RwLock::new(HashMap::new()),
            details: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
            blind_lookups: AtomicUsize::new(0),
        }
    }

    /// 不可用时所有操作返回错误
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// 接下来 `n` 次活跃明细查询返回空，模拟并发检查窗口
    pub fn blind_active_lookups(&self, n: usize) {
        self.blind_lookups.store(n, Ordering::SeqCst);
    }

    pub async fn seed_main(&self, main: PaymentMain) {
        self.mains
            .write()
            .await
            .insert(main.trade_order_no.clone(), main);
    }

    pub async fn seed_detail(&self, detail: PaymentDetail) {
        self.details.write().await.push(detail);
    }

    pub async fn main_of(&self, trade_order_no: &str) -> Option<PaymentMain> {
        self.mains.read().await.get(trade_order_no).cloned()
    }

    pub async fn details_of(&self, payment_main_no: &str) -> Vec<PaymentDetail> {
        self.details
            .read()
            .await
            .iter()
            .filter(|d| d.payment_main_no == payment_main_no)
            .cloned()
            .collect()
    }

    pub async fn main_count(&self) -> usize {
        self.mains.read().await.len()
    }

    fn check_available(&self) -> DomainResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::InternalError("store unavailable".to_string()))
        }
    }
}

#[async_trait]
impl PaymentRepositoryPort for InMemoryPaymentRepository {
    async fn find_main_by_trade_order_no(
        &self,
        trade_order_no: &str,
    ) -> DomainResult<Option<PaymentMain>> {
        self.check_available()?;
        Ok(self.main_of(trade_order_no).await)
    }

    async fn insert_main(&self, main: &PaymentMain) -> DomainResult<()> {
        self.check_available()?;
        let mut mains = self.mains.write().await;
        if mains.contains_key(&main.trade_order_no) {
            return Err(DomainError::DuplicateRecord(main.trade_order_no.clone()));
        }
        if mains.values().any(|m| m.payment_main_no == main.payment_main_no) {
            return Err(DomainError::IdConflict(main.payment_main_no.clone()));
        }
        mains.insert(main.trade_order_no.clone(), main.clone());
        Ok(())
    }

    async fn update_main_status(
        &self,
        payment_main_no: &str,
        status: PaymentStatus,
    ) -> DomainResult<()> {
        self.check_available()?;
        let mut mains = self.mains.write().await;
        let main = mains
            .values_mut()
            .find(|m| m.payment_main_no == payment_main_no)
            .ok_or_else(|| DomainError::InternalError(format!("no main {}", payment_main_no)))?;
        main.status = status;
        main.updated_at = Utc::now();
        Ok(())
    }

    async fn find_active_detail(
        &self,
        payment_main_no: &str,
        method: &PaymentMethod,
    ) -> DomainResult<Option<PaymentDetail>> {
        self.check_available()?;
        let blind = self
            .blind_lookups
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if blind {
            return Ok(None);
        }
        Ok(self
            .details
            .read()
            .await
            .iter()
            .find(|d| {
                d.payment_main_no == payment_main_no
                    && &d.payment_method == method
                    && d.status.is_active()
            })
            .cloned())
    }

    async fn insert_detail(&self, detail: &PaymentDetail) -> DomainResult<()> {
        self.check_available()?;
        let mut details = self.details.write().await;
        if details
            .iter()
            .any(|d| d.payment_detail_no == detail.payment_detail_no)
        {
            return Err(DomainError::IdConflict(detail.payment_detail_no.clone()));
        }
        let clash = detail.status.is_active()
            && details.iter().any(|d| {
                d.payment_main_no == detail.payment_main_no
                    && d.payment_method == detail.payment_method
                    && d.status.is_active()
            });
        if clash {
            return Err(DomainError::DuplicateRecord(format!(
                "{}/{}",
                detail.payment_main_no, detail.payment_method
            )));
        }
        details.push(detail.clone());
        Ok(())
    }

    async fn update_detail(&self, detail: &PaymentDetail) -> DomainResult<()> {
        self.check_available()?;
        let mut details = self.details.write().await;
        let stored = details
            .iter_mut()
            .find(|d| d.payment_detail_no == detail.payment_detail_no)
            .ok_or_else(|| {
                DomainError::InternalError(format!("no detail {}", detail.payment_detail_no))
            })?;
        *stored = detail.clone();
        Ok(())
    }

    async fn find_stale_paying_details(
        &self,
        before: DateTime<Utc>,
        limit: u32,
    ) -> DomainResult<Vec<PaymentDetail>> {
        self.check_available()?;
        let mut stale: Vec<_> = self
            .details
            .read()
            .await
            .iter()
            .filter(|d| d.status == PaymentStatus::Paying && d.updated_at < before)
            .cloned()
            .collect();
        stale.sort_by_key(|d| d.updated_at);
        stale.truncate(limit as usize);
        Ok(stale)
    }
}
