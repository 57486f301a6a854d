use crate::application::{
    ServiceDependencies,
    loan::{
        is_book_on_loan, loan_history as query_loan_history, loans_for_member, overdue_loans,
        register_loan, register_return,
    },
};
use crate::domain::{BookCode, MemberCode, commands::*};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    extract::{ApiJson, ApiQuery},
    types::{
        BookStatusResponse, ListLoansQuery, LoanCommandResponse, LoanHistoryResponse,
        MemberLoanResponse, RegisterLoanRequest, RegisterReturnRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
    /// 管理者APIのBearerトークン。`None`なら管理者APIは認証なしで開放される
    pub admin_token: Option<String>,
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /loans - 貸出を登録
///
/// 強制されるビジネスルール:
/// - 会員が存在すること
/// - 書籍が存在すること
/// - 書籍が貸出中でないこと
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterLoanRequest>,
) -> Result<(StatusCode, Json<LoanCommandResponse>), ApiError> {
    let cmd = RegisterLoan {
        member_code: MemberCode::parse(&req.member_code)?,
        book_code: BookCode::parse(&req.book_code)?,
        loaned_at: chrono::Utc::now(),
    };

    let loan = register_loan(&state.service_deps, cmd).await?;

    let response = LoanCommandResponse {
        message: "Loan registered".to_string(),
        loan: loan.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /returns - 返却を登録
///
/// 書籍の貸出中の貸出を返却済みにする。貸出中でなければ422。
pub async fn create_return(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterReturnRequest>,
) -> Result<Json<LoanCommandResponse>, ApiError> {
    let cmd = RegisterReturn {
        book_code: BookCode::parse(&req.book_code)?,
        returned_at: chrono::Utc::now(),
    };

    let loan = register_return(&state.service_deps, cmd).await?;

    Ok(Json(LoanCommandResponse {
        message: "Return registered".to_string(),
        loan: loan.into(),
    }))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /loans?member_code=... - 会員の貸出中の貸出一覧
///
/// member_codeは必須。延滞中の貸出には`overdue: true`が付く。
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListLoansQuery>,
) -> Result<Json<Vec<MemberLoanResponse>>, ApiError> {
    let member_code = query.member_code.ok_or_else(|| {
        ApiError::BadRequest("member_code query parameter is required".to_string())
    })?;
    let member_code = MemberCode::parse(&member_code)?;

    let loans = loans_for_member(&state.service_deps, &member_code, chrono::Utc::now()).await?;

    Ok(Json(loans.into_iter().map(MemberLoanResponse::from).collect()))
}

/// GET /loans/overdue - 延滞一覧（貸出日時の古い順）
pub async fn list_overdue_loans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberLoanResponse>>, ApiError> {
    let loans = overdue_loans(&state.service_deps, chrono::Utc::now()).await?;

    Ok(Json(loans.into_iter().map(MemberLoanResponse::from).collect()))
}

/// GET /loans/history - 貸出履歴（新しい順）
pub async fn loan_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LoanHistoryResponse>>, ApiError> {
    let entries = query_loan_history(&state.service_deps).await?;

    Ok(Json(
        entries.into_iter().map(LoanHistoryResponse::from).collect(),
    ))
}

/// GET /books/:code/status - 書籍が貸出中かどうか
pub async fn book_status(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<BookStatusResponse>, ApiError> {
    let book_code = BookCode::parse(&code)?;
    let on_loan = is_book_on_loan(&state.service_deps, &book_code).await?;

    Ok(Json(BookStatusResponse {
        book_code: book_code.into(),
        on_loan,
    }))
}
