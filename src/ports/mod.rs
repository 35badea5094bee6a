pub mod accounting_port;
pub mod cache_port;
pub mod channel_port;
pub mod id_generator_port;
pub mod payment_repository_port;
pub mod trade_order_port;

pub use accounting_port::AccountingPort;
pub use cache_port::CachePort;
pub use channel_port::{ChannelGateway, ChannelResult, SYSTEM_ERROR_CODE};
pub use id_generator_port::IdGenerator;
pub use payment_repository_port::PaymentRepositoryPort;
pub use trade_order_port::TradeOrderPort;
