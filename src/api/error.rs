use crate::application::{catalog::CatalogError, loan::LoanApplicationError};
use crate::domain::ValidationError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    Loan(LoanApplicationError),
    Catalog(CatalogError),
    /// リクエストの形式・値が不正
    BadRequest(String),
    /// 管理者トークンがない、または一致しない
    Unauthorized,
}

impl From<LoanApplicationError> for ApiError {
    fn from(err: LoanApplicationError) -> Self {
        ApiError::Loan(err)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// ストレージ障害
///
/// 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
fn storage_failure(
    err: &(dyn std::error::Error + Send + Sync),
) -> (StatusCode, &'static str, String) {
    tracing::error!("Storage error: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "STORAGE_ERROR",
        "Storage is unavailable".to_string(),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            // 422 Unprocessable Entity - 貸出・返却のビジネスルール違反
            ApiError::Loan(ref err @ LoanApplicationError::MemberNotFound(_)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MEMBER_NOT_FOUND",
                err.to_string(),
            ),
            ApiError::Loan(ref err @ LoanApplicationError::BookNotFound(_)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "BOOK_NOT_FOUND",
                err.to_string(),
            ),
            ApiError::Loan(ref err @ LoanApplicationError::AlreadyOnLoan(_)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "ALREADY_ON_LOAN",
                err.to_string(),
            ),
            ApiError::Loan(ref err @ LoanApplicationError::NotOnLoan(_)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NOT_ON_LOAN",
                err.to_string(),
            ),
            ApiError::Loan(LoanApplicationError::DomainError(msg)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "DOMAIN_ERROR", msg)
            }

            // 404 / 409 - 管理者操作
            ApiError::Catalog(ref err @ CatalogError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
            }
            ApiError::Catalog(ref err @ CatalogError::DuplicateKey(_)) => {
                (StatusCode::CONFLICT, "DUPLICATE_KEY", err.to_string())
            }
            ApiError::Catalog(ref err @ CatalogError::ReferentialConflict(_)) => (
                StatusCode::CONFLICT,
                "REFERENTIAL_CONFLICT",
                err.to_string(),
            ),
            ApiError::Catalog(CatalogError::InvalidInput(err)) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", err.to_string())
            }

            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Admin credentials required".to_string(),
            ),

            // 500 Internal Server Error - システム障害
            ApiError::Loan(LoanApplicationError::Storage(ref e)) => storage_failure(e.as_ref()),
            ApiError::Catalog(CatalogError::Storage(ref e)) => storage_failure(e.as_ref()),
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
