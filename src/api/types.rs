use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::loan::{LoanHistoryEntry, MemberLoan};
use crate::domain::{Book, Loan, Member};

// ============================================================================
// リクエスト
// ============================================================================

/// 貸出登録リクエスト（POST /loans）
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterLoanRequest {
    pub member_code: String,
    pub book_code: String,
}

/// 返却登録リクエスト（POST /returns）
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterReturnRequest {
    pub book_code: String,
}

/// 貸出一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListLoansQuery {
    /// 会員コード（必須）
    pub member_code: Option<String>,
}

/// 会員登録リクエスト（POST /admin/members）
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMemberRequest {
    pub code: String,
    pub name: String,
}

/// 会員名変更リクエスト（PUT /admin/members/:code）
#[derive(Debug, Serialize, Deserialize)]
pub struct RenameMemberRequest {
    pub name: String,
}

/// 書籍登録リクエスト（POST /admin/books）
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBookRequest {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub shelf: Option<String>,
}

/// 書籍更新リクエスト（PUT /admin/books/:code）
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateBookRequest {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub shelf: Option<String>,
}

// ============================================================================
// レスポンス
// ============================================================================

/// 貸出レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub loan_id: i64,
    pub member_code: String,
    pub book_code: String,
    pub loaned_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: String,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            loan_id: loan.loan_id.value(),
            status: loan.status().as_str().to_string(),
            member_code: loan.member_code.into(),
            book_code: loan.book_code.into(),
            loaned_at: loan.loaned_at,
            returned_at: loan.returned_at,
        }
    }
}

/// 貸出・返却の登録結果（メッセージ付き）
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanCommandResponse {
    pub message: String,
    pub loan: LoanResponse,
}

/// 会員の貸出一覧の1行（GET /loans, GET /loans/overdue）
///
/// 書籍が削除済みの場合、タイトルは書籍コードで代用する。
#[derive(Debug, Serialize, Deserialize)]
pub struct MemberLoanResponse {
    pub loan_id: i64,
    pub member_code: String,
    pub book_code: String,
    pub title: String,
    pub loaned_at: DateTime<Utc>,
    pub overdue_after: DateTime<Utc>,
    pub overdue: bool,
}

impl From<MemberLoan> for MemberLoanResponse {
    fn from(entry: MemberLoan) -> Self {
        let loan = entry.loan;
        Self {
            loan_id: loan.loan_id.value(),
            title: entry
                .book_title
                .unwrap_or_else(|| loan.book_code.to_string()),
            overdue_after: loan.overdue_after(),
            member_code: loan.member_code.into(),
            book_code: loan.book_code.into(),
            loaned_at: loan.loaned_at,
            overdue: entry.overdue,
        }
    }
}

/// 貸出履歴の1行（GET /loans/history）
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanHistoryResponse {
    pub loan_id: i64,
    pub member_code: String,
    pub member_name: Option<String>,
    pub book_code: String,
    pub book_title: Option<String>,
    pub loaned_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: String,
}

impl From<LoanHistoryEntry> for LoanHistoryResponse {
    fn from(entry: LoanHistoryEntry) -> Self {
        let loan = entry.loan;
        Self {
            loan_id: loan.loan_id.value(),
            status: loan.status().as_str().to_string(),
            member_code: loan.member_code.into(),
            member_name: entry.member_name,
            book_code: loan.book_code.into(),
            book_title: entry.book_title,
            loaned_at: loan.loaned_at,
            returned_at: loan.returned_at,
        }
    }
}

/// 書籍の貸出状況（GET /books/:code/status）
#[derive(Debug, Serialize, Deserialize)]
pub struct BookStatusResponse {
    pub book_code: String,
    pub on_loan: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemberResponse {
    pub code: String,
    pub name: String,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            code: member.code.into(),
            name: member.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub code: String,
    pub title: String,
    pub author: Option<String>,
    pub shelf: Option<String>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            code: book.code.into(),
            title: book.title,
            author: book.author,
            shelf: book.shelf,
        }
    }
}

/// 管理者操作の結果（メッセージ付き）
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminCommandResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<T>,
}

impl<T> AdminCommandResponse<T> {
    pub fn new(message: impl Into<String>, record: Option<T>) -> Self {
        Self {
            message: message.into(),
            record,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
