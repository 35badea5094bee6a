pub mod adapters;
pub mod config;

pub use adapters::{
    BusinessIdGenerator, HttpChannelGateway, MockChannelGateway, MySqlPaymentRepository,
    MySqlTradeOrderRepository, RedisCache, StubAccountingLedger,
};
pub use config::{ChannelConfig, EngineConfig};
