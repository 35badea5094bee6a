use crate::application::{
    AcceptPaymentQuery, AcceptPaymentResponse, ErrorResponse, PaymentResultQuery,
    PaymentResultResponse, PaymentService, StuckPaymentResponse, StuckPaymentsQuery,
};
use crate::domain::errors::DomainError;
use crate::domain::PaymentMethod;
use crate::ports::{AccountingPort, CachePort, PaymentRepositoryPort, TradeOrderPort};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// 应用状态
pub struct AppState<R, O, C, L>
where
    R: PaymentRepositoryPort,
    O: TradeOrderPort,
    C: CachePort,
    L: AccountingPort,
{
    pub payment_service: Arc<PaymentService<R, O, C, L>>,
}

impl<R, O, C, L> Clone for AppState<R, O, C, L>
where
    R: PaymentRepositoryPort,
    O: TradeOrderPort,
    C: CachePort,
    L: AccountingPort,
{
    fn clone(&self) -> Self {
        Self {
            payment_service: self.payment_service.clone(),
        }
    }
}

/// 领域错误映射为HTTP状态码与业务错误码
fn to_api_error(e: DomainError) -> ApiError {
    let (status, code) = match &e {
        DomainError::OrderNotFound(_) => (StatusCode::NOT_FOUND, "ORDER_NOT_EXIST"),
        DomainError::ValidationError(_) => (StatusCode::BAD_REQUEST, "PARAM_ERROR"),
        DomainError::UnknownChannel(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_PAYMENT_METHOD"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "SYSTEM_ERROR"),
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Unhandled engine error: {}", e);
    }
    (
        status,
        Json(ErrorResponse::new(code.to_string(), e.to_string())),
    )
}

/// 受理支付
pub async fn accept_payment<R, O, C, L>(
    State(state): State<AppState<R, O, C, L>>,
    Query(query): Query<AcceptPaymentQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    R: PaymentRepositoryPort,
    O: TradeOrderPort,
    C: CachePort,
    L: AccountingPort,
{
    info!(
        "Received accept request: trade_order_no={}, method={}",
        query.trade_order_no, query.payment_method
    );

    let method = PaymentMethod::new(&query.payment_method).map_err(to_api_error)?;
    let payment_main_no = state
        .payment_service
        .accept(&query.trade_order_no, &method)
        .await
        .map_err(to_api_error)?;

    Ok((StatusCode::OK, Json(AcceptPaymentResponse { payment_main_no })))
}

/// 查询支付结果
pub async fn payment_result<R, O, C, L>(
    State(state): State<AppState<R, O, C, L>>,
    Query(query): Query<PaymentResultQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    R: PaymentRepositoryPort,
    O: TradeOrderPort,
    C: CachePort,
    L: AccountingPort,
{
    let status = state
        .payment_service
        .result(&query.trade_order_no)
        .await
        .map_err(to_api_error)?
        .ok_or_else(|| to_api_error(DomainError::OrderNotFound(query.trade_order_no.clone())))?;

    Ok(Json(PaymentResultResponse {
        trade_order_no: query.trade_order_no,
        status,
    }))
}

/// 列出卡在支付中的明细
pub async fn stuck_payments<R, O, C, L>(
    State(state): State<AppState<R, O, C, L>>,
    Query(query): Query<StuckPaymentsQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    R: PaymentRepositoryPort,
    O: TradeOrderPort,
    C: CachePort,
    L: AccountingPort,
{
    let details = state
        .payment_service
        .list_stuck_payments(Duration::from_secs(query.older_than_secs), query.limit)
        .await
        .map_err(to_api_error)?;

    let body: Vec<StuckPaymentResponse> = details.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// 健康检查
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// 版本信息
pub async fn version() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let (status, body) = to_api_error(DomainError::OrderNotFound("T9".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.0.error, "ORDER_NOT_EXIST");

        let (status, _) = to_api_error(DomainError::UnknownChannel("CARD".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = to_api_error(DomainError::InvalidTransition {
            state: "PAID".to_string(),
            event: "START_PAY".to_string(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.0.error, "SYSTEM_ERROR");
    }
}
