pub mod cache_aside;
pub mod channel_registry;
pub mod dto;
pub mod payment_service;

pub use cache_aside::{CacheAside, CachePolicy};
pub use channel_registry::ChannelRegistry;
pub use dto::*;
pub use payment_service::{CallDeadlines, PaymentService};
