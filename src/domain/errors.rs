use thiserror::Error;

/// 领域层错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 交易订单不存在
    #[error("Trade order not found: {0}")]
    OrderNotFound(String),

    /// 非法状态转换，属于配置错误，不重试
    #[error("Invalid state transition: state={state}, event={event}")]
    InvalidTransition { state: String, event: String },

    /// 支付方式未注册渠道
    #[error("No channel registered for payment method: {0}")]
    UnknownChannel(String),

    /// 业务唯一键冲突（并发请求已创建同一记录）
    #[error("Duplicate record: {0}")]
    DuplicateRecord(String),

    /// 单号主键冲突，换号重试
    #[error("Identifier already taken: {0}")]
    IdConflict(String),

    /// 渠道调用错误
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// 数据库错误
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP请求错误
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// 领域结果类型
pub type DomainResult<T> = Result<T, DomainError>;
