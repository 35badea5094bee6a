use super::handlers::*;
use crate::ports::{AccountingPort, CachePort, PaymentRepositoryPort, TradeOrderPort};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router<R, O, C, L>(state: AppState<R, O, C, L>) -> Router
where
    R: PaymentRepositoryPort,
    O: TradeOrderPort,
    C: CachePort,
    L: AccountingPort,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/engine/version", get(version))
        .route("/api/engine/accept", post(accept_payment::<R, O, C, L>))
        .route("/api/engine/result", get(payment_result::<R, O, C, L>))
        .route("/api/engine/stuck", get(stuck_payments::<R, O, C, L>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
