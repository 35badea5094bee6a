use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::events::PaymentEvent;
use crate::domain::value_objects::PaymentStatus;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// 状态机：只接受指定状态下的指定事件，流转到指定目标状态
///
/// 规则表在启动时配置完成后以 `Arc` 共享，运行期只读。
#[derive(Debug, Clone)]
pub struct StateMachine<S, E> {
    rules: HashMap<(S, E), S>,
}

impl<S, E> Default for StateMachine<S, E> {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Hash + Display,
    E: Copy + Eq + Hash + Display,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册转换规则，重复注册同一 (状态, 事件) 时后者覆盖前者
    pub fn accept(&mut self, source: S, event: E, target: S) -> &mut Self {
        self.rules.insert((source, event), target);
        self
    }

    /// 通过源状态和事件获取目标状态
    pub fn transition(&self, source: S, event: E) -> Option<S> {
        self.rules.get(&(source, event)).copied()
    }

    pub fn is_valid_transition(&self, source: S, event: E) -> bool {
        self.rules.contains_key(&(source, event))
    }

    /// 与 `transition` 相同，但未注册的转换返回 `InvalidTransition`
    pub fn fire(&self, source: S, event: E) -> DomainResult<S> {
        self.transition(source, event)
            .ok_or_else(|| DomainError::InvalidTransition {
                state: source.to_string(),
                event: event.to_string(),
            })
    }

    pub fn transitions(&self) -> impl Iterator<Item = (S, E, S)> + '_ {
        self.rules.iter().map(|(&(s, e), &t)| (s, e, t))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

pub type PaymentStateMachine = StateMachine<PaymentStatus, PaymentEvent>;

/// 支付状态机配置
pub fn payment_state_machine() -> PaymentStateMachine {
    let mut sm = StateMachine::new();
    sm.accept(PaymentStatus::Init, PaymentEvent::StartPay, PaymentStatus::Paying)
        .accept(
            PaymentStatus::Paying,
            PaymentEvent::ChannelSuccess,
            PaymentStatus::Paid,
        )
        .accept(
            PaymentStatus::Paying,
            PaymentEvent::ChannelFail,
            PaymentStatus::Failed,
        );
    sm
}
