use crate::domain::{BookCode, MemberCode};
use thiserror::Error;

/// 貸出管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LoanApplicationError {
    /// 会員が存在しない
    #[error("Member not found: {0}")]
    MemberNotFound(MemberCode),

    /// 書籍が存在しない
    #[error("Book not found: {0}")]
    BookNotFound(BookCode),

    /// 書籍が既に貸出中
    #[error("Book is already on loan: {0}")]
    AlreadyOnLoan(BookCode),

    /// 書籍が貸出中ではない（返却できない）
    #[error("Book is not on loan: {0}")]
    NotOnLoan(BookCode),

    /// ドメイン層のエラー
    #[error("Domain error: {0}")]
    DomainError(String),

    /// ストレージのエラー
    #[error("Storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LoanApplicationError>;
