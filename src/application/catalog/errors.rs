use crate::domain::{BookCode, MemberCode, ValidationError};
use std::fmt;
use thiserror::Error;

/// エラー対象のレコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    Member(MemberCode),
    Book(BookCode),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Member(code) => write!(f, "member {}", code),
            RecordKey::Book(code) => write!(f, "book {}", code),
        }
    }
}

/// 蔵書・会員管理（管理者操作）のエラー
#[derive(Debug, Error)]
pub enum CatalogError {
    /// レコードが存在しない
    #[error("Not found: {0}")]
    NotFound(RecordKey),

    /// 同じコードのレコードが既に存在する
    #[error("Duplicate key: {0}")]
    DuplicateKey(RecordKey),

    /// 貸出中の貸出が参照しているため削除できない
    #[error("Referenced by an open loan: {0}")]
    ReferentialConflict(RecordKey),

    /// 入力値が不正
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    /// ストレージのエラー
    #[error("Storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
