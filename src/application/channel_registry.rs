use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::PaymentMethod;
use crate::ports::ChannelGateway;
use std::collections::HashMap;
use std::sync::Arc;

/// 支付方式对应的渠道
#[derive(Clone)]
pub struct ChannelRoute {
    pub channel_code: String,
    pub gateway: Arc<dyn ChannelGateway>,
}

/// 渠道注册表，启动时填充，运行期只读
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    routes: HashMap<PaymentMethod, ChannelRoute>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        method: PaymentMethod,
        channel_code: impl Into<String>,
        gateway: Arc<dyn ChannelGateway>,
    ) -> &mut Self {
        self.routes.insert(
            method,
            ChannelRoute {
                channel_code: channel_code.into(),
                gateway,
            },
        );
        self
    }

    pub fn resolve(&self, method: &PaymentMethod) -> DomainResult<&ChannelRoute> {
        self.routes
            .get(method)
            .ok_or_else(|| DomainError::UnknownChannel(method.to_string()))
    }

    pub fn methods(&self) -> Vec<&PaymentMethod> {
        let mut methods: Vec<_> = self.routes.keys().collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::MockChannelGateway;

    #[test]
    fn test_resolve_registered_method() {
        let mut registry = ChannelRegistry::new();
        registry
            .register(
                PaymentMethod::new("WECHAT").unwrap(),
                "WXPAY",
                Arc::new(MockChannelGateway::new()),
            )
            .register(
                PaymentMethod::new("ALIPAY").unwrap(),
                "ALIPAY",
                Arc::new(MockChannelGateway::new()),
            );

        let route = registry
            .resolve(&PaymentMethod::new("wechat").unwrap())
            .unwrap();
        assert_eq!(route.channel_code, "WXPAY");
        assert_eq!(
            registry
                .methods()
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>(),
            vec!["ALIPAY", "WECHAT"]
        );
    }

    #[test]
    fn test_unknown_method_is_error() {
        let registry = ChannelRegistry::new();
        let result = registry.resolve(&PaymentMethod::new("CARD").unwrap());
        assert!(matches!(result, Err(DomainError::UnknownChannel(code)) if code == "CARD"));
    }
}
