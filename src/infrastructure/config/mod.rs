pub mod channel_config;
pub mod engine_config;

pub use channel_config::ChannelConfig;
pub use engine_config::EngineConfig;
