use thiserror::Error;

/// 入力値のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// コードが空、長すぎる、または制御文字を含む
    #[error("Invalid code: {0:?}")]
    InvalidCode(String),

    /// 会員名が空
    #[error("Member name must not be empty")]
    EmptyName,

    /// 書籍タイトルが空
    #[error("Book title must not be empty")]
    EmptyTitle,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnLoanError {
    /// 既に返却済み
    #[error("Loan has already been returned")]
    AlreadyReturned,
}
