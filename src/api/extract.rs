use axum::extract::{FromRequest, FromRequestParts};

use super::error::ApiError;

/// JSONボディの抽出器
///
/// 失敗時は`ApiError::BadRequest`（400）として`{error, message}`で返す。
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// クエリパラメータの抽出器
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
