mod api;
mod application;
mod domain;
mod infrastructure;
mod ports;

use api::AppState;
use application::{CacheAside, ChannelRegistry, PaymentService};
use domain::errors::DomainResult;
use domain::PaymentMethod;
use infrastructure::config::channel_config::configured_methods;
use infrastructure::{
    BusinessIdGenerator, ChannelConfig, EngineConfig, HttpChannelGateway, MockChannelGateway,
    MySqlPaymentRepository, MySqlTradeOrderRepository, RedisCache, StubAccountingLedger,
};
use ports::ChannelGateway;
use sqlx::MySqlPool;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 按配置组装渠道路由表，支付方式编码即渠道编码
fn build_channel_registry() -> DomainResult<ChannelRegistry> {
    let (gateway, methods) = match ChannelConfig::from_env()? {
        Some(config) => {
            info!(
                "Channel gateway configured: base_url={}, merchant_id={}",
                config.base_url, config.merchant_id
            );
            let methods = config.methods.clone();
            let gateway: Arc<dyn ChannelGateway> = Arc::new(HttpChannelGateway::new(config)?);
            (gateway, methods)
        }
        None => {
            warn!("CHANNEL_BASE_URL not set, using mock channel gateway");
            let gateway: Arc<dyn ChannelGateway> = Arc::new(MockChannelGateway::new());
            (gateway, configured_methods())
        }
    };

    let mut registry = ChannelRegistry::new();
    for method in methods {
        let method = PaymentMethod::new(&method)?;
        let channel_code = method.as_str().to_string();
        registry.register(method, channel_code, gateway.clone());
    }
    Ok(registry)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting Payment Engine...");

    let config = EngineConfig::from_env()?;

    info!("Connecting to database...");
    let pool = Arc::new(MySqlPool::connect(&config.database_url).await?);
    info!("Database connected successfully");

    let cache = Arc::new(RedisCache::connect(&config.redis_url, config.redis_max_connections).await?);

    let channels = build_channel_registry()?;
    info!(
        "Payment methods enabled: {:?}",
        channels.methods().iter().map(|m| m.as_str()).collect::<Vec<_>>()
    );

    let payment_service = PaymentService::new(
        Arc::new(MySqlPaymentRepository::new(pool.clone())),
        Arc::new(MySqlTradeOrderRepository::new(pool)),
        CacheAside::new(cache, config.cache.clone()),
        Arc::new(StubAccountingLedger::new()),
        channels,
        Arc::new(BusinessIdGenerator::new()),
    )
    .with_deadlines(config.deadlines);

    let app_state = AppState {
        payment_service: Arc::new(payment_service),
    };
    let app = api::create_router(app_state);

    let addr = config.listen_addr();
    info!("Server listening on {}", addr);
    info!("Available endpoints:");
    info!("  GET  /health - Health check");
    info!("  POST /api/engine/accept - Accept payment");
    info!("  GET  /api/engine/result - Query payment result");
    info!("  GET  /api/engine/stuck - List stuck payments");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
