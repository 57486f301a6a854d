use crate::application::catalog;
use crate::domain::{BookCode, MemberCode, commands::*};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    extract::ApiJson,
    handlers::AppState,
    types::{
        AdminCommandResponse, BookResponse, CreateBookRequest, CreateMemberRequest,
        MemberResponse, RenameMemberRequest, UpdateBookRequest,
    },
};

// ============================================================================
// 会員
// ============================================================================

/// GET /admin/members
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = catalog::list_members(&state.service_deps).await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// GET /admin/members/:code
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<MemberResponse>, ApiError> {
    let code = MemberCode::parse(&code)?;
    let member = catalog::find_member(&state.service_deps, &code).await?;
    Ok(Json(member.into()))
}

/// POST /admin/members - 会員を登録
///
/// 同じコードの会員が既に存在する場合は409。
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateMemberRequest>,
) -> Result<(StatusCode, Json<AdminCommandResponse<MemberResponse>>), ApiError> {
    let cmd = CreateMember {
        code: MemberCode::parse(&req.code)?,
        name: req.name,
    };

    let member = catalog::create_member(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(AdminCommandResponse::new(
            "Member created",
            Some(member.into()),
        )),
    ))
}

/// PUT /admin/members/:code - 会員名を変更
pub async fn rename_member(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    ApiJson(req): ApiJson<RenameMemberRequest>,
) -> Result<Json<AdminCommandResponse<MemberResponse>>, ApiError> {
    let cmd = RenameMember {
        code: MemberCode::parse(&code)?,
        name: req.name,
    };

    let member = catalog::rename_member(&state.service_deps, cmd).await?;

    Ok(Json(AdminCommandResponse::new(
        "Member renamed",
        Some(member.into()),
    )))
}

/// DELETE /admin/members/:code - 会員を削除
///
/// 貸出中の貸出がある会員は削除できない（409）。
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<AdminCommandResponse<MemberResponse>>, ApiError> {
    let code = MemberCode::parse(&code)?;
    catalog::delete_member(&state.service_deps, &code).await?;

    Ok(Json(AdminCommandResponse::new("Member deleted", None)))
}

// ============================================================================
// 書籍
// ============================================================================

/// GET /admin/books
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = catalog::list_books(&state.service_deps).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// GET /admin/books/:code
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let code = BookCode::parse(&code)?;
    let book = catalog::find_book(&state.service_deps, &code).await?;
    Ok(Json(book.into()))
}

/// POST /admin/books - 書籍を登録
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateBookRequest>,
) -> Result<(StatusCode, Json<AdminCommandResponse<BookResponse>>), ApiError> {
    let cmd = CreateBook {
        code: BookCode::parse(&req.code)?,
        title: req.title,
        author: req.author,
        shelf: req.shelf,
    };

    let book = catalog::create_book(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(AdminCommandResponse::new("Book created", Some(book.into()))),
    ))
}

/// PUT /admin/books/:code - 書籍情報を更新
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    ApiJson(req): ApiJson<UpdateBookRequest>,
) -> Result<Json<AdminCommandResponse<BookResponse>>, ApiError> {
    let cmd = UpdateBook {
        code: BookCode::parse(&code)?,
        title: req.title,
        author: req.author,
        shelf: req.shelf,
    };

    let book = catalog::update_book(&state.service_deps, cmd).await?;

    Ok(Json(AdminCommandResponse::new(
        "Book updated",
        Some(book.into()),
    )))
}

/// DELETE /admin/books/:code - 書籍を削除
///
/// 貸出中の書籍は削除できない（409）。
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<AdminCommandResponse<BookResponse>>, ApiError> {
    let code = BookCode::parse(&code)?;
    catalog::delete_book(&state.service_deps, &code).await?;

    Ok(Json(AdminCommandResponse::new("Book deleted", None)))
}
