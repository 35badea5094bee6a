use crate::application::cache_aside::CacheAside;
use crate::application::channel_registry::{ChannelRegistry, ChannelRoute};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{
    payment_state_machine, PaymentDetail, PaymentEvent, PaymentMain, PaymentMethod,
    PaymentStateMachine, PaymentStatus, TradeOrderLite, TradeOrderStatus,
};
use crate::ports::{
    AccountingPort, CachePort, ChannelResult, IdGenerator, PaymentRepositoryPort, TradeOrderPort,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// 单号冲突或并发失败后重新建单的次数上限
const MAX_INSERT_ATTEMPTS: usize = 3;

/// 外部调用超时
#[derive(Debug, Clone, Copy)]
pub struct CallDeadlines {
    pub channel: Duration,
    pub ledger: Duration,
}

impl Default for CallDeadlines {
    fn default() -> Self {
        Self {
            channel: Duration::from_secs(10),
            ledger: Duration::from_secs(5),
        }
    }
}

/// 支付受理编排服务
pub struct PaymentService<R, O, C, L>
where
    R: PaymentRepositoryPort,
    O: TradeOrderPort,
    C: CachePort,
    L: AccountingPort,
{
    repository: Arc<R>,
    orders: Arc<O>,
    cache: CacheAside<C>,
    ledger: Arc<L>,
    channels: ChannelRegistry,
    id_generator: Arc<dyn IdGenerator>,
    state_machine: Arc<PaymentStateMachine>,
    deadlines: CallDeadlines,
}

impl<R, O, C, L> PaymentService<R, O, C, L>
where
    R: PaymentRepositoryPort,
    O: TradeOrderPort,
    C: CachePort,
    L: AccountingPort,
{
    pub fn new(
        repository: Arc<R>,
        orders: Arc<O>,
        cache: CacheAside<C>,
        ledger: Arc<L>,
        channels: ChannelRegistry,
        id_generator: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            repository,
            orders,
            cache,
            ledger,
            channels,
            id_generator,
            state_machine: Arc::new(payment_state_machine()),
            deadlines: CallDeadlines::default(),
        }
    }

    pub fn with_deadlines(mut self, deadlines: CallDeadlines) -> Self {
        self.deadlines = deadlines;
        self
    }

    /// 受理支付，返回支付主单号
    ///
    /// 可安全重入：已成功的主单、支付中/已成功的同方式明细都不会再次调用渠道。
    /// 返回主单号不代表支付成功，结果通过 [`Self::result`] 查询。
    pub async fn accept(
        &self,
        trade_order_no: &str,
        method: &PaymentMethod,
    ) -> DomainResult<String> {
        info!(
            "Accepting payment: trade_order_no={}, method={}",
            trade_order_no, method
        );

        // 1. 查询交易订单，获取金额币种
        let mut order = self
            .cache
            .order_lite(self.orders.as_ref(), trade_order_no)
            .await?
            .ok_or_else(|| DomainError::OrderNotFound(trade_order_no.to_string()))?;

        // 2. 复用或创建主单
        let mut main = self.load_or_create_main(&order).await?;

        // 3. 主单已成功，只补齐订单状态
        if main.is_paid() {
            debug!("Payment main already paid: {}", main.payment_main_no);
            self.sync_order(&mut order, TradeOrderStatus::Success, true)
                .await;
            return Ok(main.payment_main_no);
        }

        // 4. 同方式存在支付中/已成功明细，不重复创建、不重复调用渠道
        if let Some(existing) = self
            .repository
            .find_active_detail(&main.payment_main_no, method)
            .await?
        {
            debug!(
                "Active detail {} found for {}, reconciling",
                existing.payment_detail_no, main.payment_main_no
            );
            self.reconcile(&mut main, &mut order, &existing).await?;
            return Ok(main.payment_main_no);
        }

        // 5. 新建明细并置为支付中
        let route = self.channels.resolve(method)?.clone();
        let Some(mut detail) = self.start_detail(&mut main, &mut order, method).await? else {
            return Ok(main.payment_main_no);
        };

        if main.mark_paying() {
            self.repository
                .update_main_status(&main.payment_main_no, main.status)
                .await?;
        }
        self.cache.invalidate_payment_status(trade_order_no).await;
        self.sync_order(&mut order, TradeOrderStatus::Paying, false)
            .await;

        // 6/7. 调用渠道，成功后记账
        let channel_result = self.call_channel(&route, &detail).await;
        detail.record_channel(&route.channel_code, channel_result.channel_order_no.clone());

        let booked = if channel_result.success {
            self.call_ledger(&main, &detail).await
        } else {
            warn!(
                "Channel payment failed: detail={}, code={:?}, message={:?}",
                detail.payment_detail_no, channel_result.error_code, channel_result.error_message
            );
            false
        };

        // 记账失败与渠道失败走同一条失败转换
        let event = if booked {
            PaymentEvent::ChannelSuccess
        } else {
            PaymentEvent::ChannelFail
        };
        detail.fire(&self.state_machine, event)?;
        self.repository.update_detail(&detail).await?;

        main.follow(detail.status);
        self.repository
            .update_main_status(&main.payment_main_no, main.status)
            .await?;

        let order_status = if detail.status == PaymentStatus::Paid {
            TradeOrderStatus::Success
        } else {
            TradeOrderStatus::Failed
        };
        self.sync_order(&mut order, order_status, true).await;
        self.cache
            .put_payment_status(trade_order_no, detail.status)
            .await;

        info!(
            "Payment {} finished: detail={}, status={}",
            main.payment_main_no, detail.payment_detail_no, detail.status
        );

        // 8. 所有路径都返回主单号
        Ok(main.payment_main_no)
    }

    /// 查询支付结果，缓存优先
    pub async fn result(&self, trade_order_no: &str) -> DomainResult<Option<PaymentStatus>> {
        debug!("Querying payment result: {}", trade_order_no);
        self.cache
            .payment_status(self.repository.as_ref(), trade_order_no)
            .await
    }

    /// 列出超过 `older_than` 仍处于支付中的明细，供外部对账任务使用
    pub async fn list_stuck_payments(
        &self,
        older_than: Duration,
        limit: u32,
    ) -> DomainResult<Vec<PaymentDetail>> {
        let before = chrono::Duration::from_std(older_than)
            .ok()
            .and_then(|age| chrono::Utc::now().checked_sub_signed(age))
            .ok_or_else(|| {
                DomainError::ValidationError(format!(
                    "Age threshold out of range: {}s",
                    older_than.as_secs()
                ))
            })?;
        self.repository
            .find_stale_paying_details(before, limit)
            .await
    }

    async fn load_or_create_main(&self, order: &TradeOrderLite) -> DomainResult<PaymentMain> {
        if let Some(main) = self
            .repository
            .find_main_by_trade_order_no(&order.trade_order_no)
            .await?
        {
            return Ok(main);
        }

        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let main = PaymentMain::new(self.id_generator.next(), order);
            match self.repository.insert_main(&main).await {
                Ok(()) => {
                    info!(
                        "Payment main created: {} for {}",
                        main.payment_main_no, main.trade_order_no
                    );
                    return Ok(main);
                }
                Err(DomainError::IdConflict(no)) => {
                    warn!(
                        "Payment main number {} already taken, regenerating (attempt {})",
                        no, attempt
                    );
                }
                Err(DomainError::DuplicateRecord(_)) => {
                    warn!(
                        "Concurrent main creation detected for {}",
                        order.trade_order_no
                    );
                    return self
                        .repository
                        .find_main_by_trade_order_no(&order.trade_order_no)
                        .await?
                        .ok_or_else(|| {
                            DomainError::InternalError(format!(
                                "payment main vanished for {}",
                                order.trade_order_no
                            ))
                        });
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::InternalError(format!(
            "no free payment main number for {} after {} attempts",
            order.trade_order_no, MAX_INSERT_ATTEMPTS
        )))
    }

    /// 创建并持久化支付中明细
    ///
    /// 返回 `None` 表示并发请求已持有同方式的活跃明细，主单和订单已对齐。
    async fn start_detail(
        &self,
        main: &mut PaymentMain,
        order: &mut TradeOrderLite,
        method: &PaymentMethod,
    ) -> DomainResult<Option<PaymentDetail>> {
        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let mut detail = PaymentDetail::new(self.id_generator.next(), main, method.clone());
            detail.fire(&self.state_machine, PaymentEvent::StartPay)?;

            match self.repository.insert_detail(&detail).await {
                Ok(()) => return Ok(Some(detail)),
                Err(DomainError::IdConflict(no)) => {
                    warn!(
                        "Payment detail number {} already taken, regenerating (attempt {})",
                        no, attempt
                    );
                }
                Err(DomainError::DuplicateRecord(key)) => {
                    warn!("Concurrent detail creation detected for {}", key);
                    if let Some(existing) = self
                        .repository
                        .find_active_detail(&main.payment_main_no, method)
                        .await?
                    {
                        self.reconcile(main, order, &existing).await?;
                        return Ok(None);
                    }
                    // 并发明细已结束为失败，重新创建
                    debug!(
                        "Concurrent detail for {} already settled, retrying (attempt {})",
                        key, attempt
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::InternalError(format!(
            "could not start payment detail for {} after {} attempts",
            main.payment_main_no, MAX_INSERT_ATTEMPTS
        )))
    }

    /// 主单/订单状态对齐已有明细
    async fn reconcile(
        &self,
        main: &mut PaymentMain,
        order: &mut TradeOrderLite,
        detail: &PaymentDetail,
    ) -> DomainResult<()> {
        if detail.status == PaymentStatus::Paid {
            if main.follow(PaymentStatus::Paid) {
                self.repository
                    .update_main_status(&main.payment_main_no, main.status)
                    .await?;
            }
            self.sync_order(order, TradeOrderStatus::Success, true).await;
            self.cache
                .put_payment_status(&order.trade_order_no, PaymentStatus::Paid)
                .await;
        } else {
            if main.mark_paying() {
                self.repository
                    .update_main_status(&main.payment_main_no, main.status)
                    .await?;
            }
            self.sync_order(order, TradeOrderStatus::Paying, true).await;
        }
        Ok(())
    }

    /// 同步交易订单状态；`persist` 为假时只更新缓存
    ///
    /// 缓存中的订单状态可能过期，持久化时总是写订单库。
    /// 订单状态属于带外同步，失败只记录日志，下次受理时补齐。
    async fn sync_order(&self, order: &mut TradeOrderLite, status: TradeOrderStatus, persist: bool) {
        if persist {
            if let Err(e) = self
                .orders
                .update_status(&order.trade_order_no, status)
                .await
            {
                warn!(
                    "Failed to update trade order {} to {}: {}",
                    order.trade_order_no, status, e
                );
            }
        }
        if order.status != status {
            order.status = status;
            self.cache.put_order_lite(order).await;
        }
    }

    async fn call_channel(&self, route: &ChannelRoute, detail: &PaymentDetail) -> ChannelResult {
        let call = route.gateway.pay(
            &route.channel_code,
            &detail.payment_detail_no,
            detail.amount,
            &detail.currency,
        );

        match timeout(self.deadlines.channel, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                error!(
                    "Channel {} error for {}: {}",
                    route.channel_code, detail.payment_detail_no, e
                );
                ChannelResult::system_error(e.to_string())
            }
            Err(_) => {
                error!(
                    "Channel {} timed out after {:?} for {}",
                    route.channel_code, self.deadlines.channel, detail.payment_detail_no
                );
                ChannelResult::system_error("channel call timed out")
            }
        }
    }

    async fn call_ledger(&self, main: &PaymentMain, detail: &PaymentDetail) -> bool {
        let call = self.ledger.book(
            &main.payment_main_no,
            &detail.payment_detail_no,
            detail.amount,
            &detail.currency,
        );

        match timeout(self.deadlines.ledger, call).await {
            Ok(Ok(true)) => true,
            Ok(Ok(false)) => {
                warn!("Ledger rejected booking for {}", detail.payment_detail_no);
                false
            }
            Ok(Err(e)) => {
                error!("Ledger error for {}: {}", detail.payment_detail_no, e);
                false
            }
            Err(_) => {
                error!(
                    "Ledger timed out after {:?} for {}",
                    self.deadlines.ledger, detail.payment_detail_no
                );
                false
            }
        }
    }
}
