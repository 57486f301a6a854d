use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{
    admin,
    auth::require_admin,
    handlers::{
        AppState, book_status, create_loan, create_return, list_loans, list_overdue_loans,
        loan_history,
    },
};

/// Creates the API router with all circulation endpoints
///
/// Circulation endpoints:
/// - POST /loans - Register a loan
/// - POST /returns - Register a return
/// - GET /loans?member_code= - Open loans of a member
/// - GET /loans/overdue - Overdue loans
/// - GET /loans/history - All loans, newest first
/// - GET /books/:code/status - Whether a book is on loan
///
/// Admin endpoints (behind the admin token when one is configured):
/// - GET/POST /admin/members, GET/PUT/DELETE /admin/members/:code
/// - GET/POST /admin/books, GET/PUT/DELETE /admin/books/:code
pub fn create_router(state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .route(
            "/members",
            get(admin::list_members).post(admin::create_member),
        )
        .route(
            "/members/:code",
            get(admin::get_member)
                .put(admin::rename_member)
                .delete(admin::delete_member),
        )
        .route("/books", get(admin::list_books).post(admin::create_book))
        .route(
            "/books/:code",
            put(admin::update_book)
                .get(admin::get_book)
                .delete(admin::delete_book),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Circulation
        .route("/loans", post(create_loan).get(list_loans))
        .route("/loans/overdue", get(list_overdue_loans))
        .route("/loans/history", get(loan_history))
        .route("/returns", post(create_return))
        .route("/books/:code/status", get(book_status))
        // Catalog administration
        .nest("/admin", admin_routes)
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
