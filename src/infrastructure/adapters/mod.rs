pub mod business_id_generator;
pub mod http_channel_gateway;
#[cfg(test)]
pub mod in_memory;
pub mod mock_channel_gateway;
pub mod mysql_payment_repository;
pub mod mysql_trade_order_repository;
pub mod redis_cache;
pub mod stub_accounting_ledger;

pub use business_id_generator::BusinessIdGenerator;
pub use http_channel_gateway::HttpChannelGateway;
pub use mock_channel_gateway::MockChannelGateway;
pub use mysql_payment_repository::MySqlPaymentRepository;
pub use mysql_trade_order_repository::MySqlTradeOrderRepository;
pub use redis_cache::RedisCache;
pub use stub_accounting_ledger::StubAccountingLedger;
