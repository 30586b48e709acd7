use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Broker error: {0}")]
    MqError(#[from] lapin::Error),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 业务拒绝原样返回给调用方；基础设施错误只返回笼统信息
    fn public_message(&self) -> String {
        match self {
            AppError::DatabaseError(_) => "Database error".to_string(),
            AppError::RedisError(_) => "Cache error".to_string(),
            AppError::MqError(_) => "Broker error".to_string(),
            AppError::SerdeJsonError(_) => "Serialization error".to_string(),
            AppError::InternalError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::FailedPrecondition(_) => StatusCode::PRECONDITION_FAILED,
            AppError::ResourceExhausted(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::DatabaseError(err) => log::error!("Database error: {err}"),
            AppError::RedisError(err) => log::error!("Redis error: {err}"),
            AppError::MqError(err) => log::error!("Broker error: {err}"),
            AppError::InternalError(msg) => log::error!("Internal error: {msg}"),
            AppError::AuthError(msg) => log::warn!("Authentication error: {msg}"),
            AppError::JwtError(err) => log::warn!("JWT error: {err}"),
            AppError::PermissionDenied(msg) => log::warn!("Permission denied: {msg}"),
            _ => {}
        }

        HttpResponse::build(status).json(json!({
            "code": status.as_u16(),
            "msg": self.public_message(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_rejections_map_to_transport_class() {
        assert_eq!(
            AppError::InvalidArgument("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::PermissionDenied("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::FailedPrecondition("x".into()).status_code(),
            StatusCode::PRECONDITION_FAILED
        );
        // 秒杀卖罄与限流都归入 429 一类
        assert_eq!(
            AppError::ResourceExhausted("x".into()).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::AlreadyExists("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Unavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_infrastructure_faults_are_opaque() {
        let err = AppError::InternalError("connection pool exhausted".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_rejection_message_passes_through() {
        let err = AppError::FailedPrecondition("stock not sufficient".into());
        assert!(err.public_message().contains("stock not sufficient"));
    }
}
