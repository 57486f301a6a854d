use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use super::{error::ApiError, handlers::AppState};

/// 管理者APIの認証ミドルウェア
///
/// 管理者トークンが設定されている場合、`Authorization: Bearer <token>`が
/// 一致しないリクエストは401で拒否する。未設定なら素通しする。
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    if !presented.is_some_and(|token| token_matches(token, expected)) {
        tracing::warn!(path = %request.uri().path(), "Rejected admin request");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// トークンを定数時間で比較する（長さが違えば不一致）
fn token_matches(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
