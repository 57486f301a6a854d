use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookCode, MemberCode};

/// コマンド：書籍を貸し出す
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterLoan {
    pub member_code: MemberCode,
    pub book_code: BookCode,
    pub loaned_at: DateTime<Utc>,
}

/// コマンド：書籍を返却する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterReturn {
    pub book_code: BookCode,
    pub returned_at: DateTime<Utc>,
}

/// コマンド：会員を登録する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMember {
    pub code: MemberCode,
    pub name: String,
}

/// コマンド：会員名を変更する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameMember {
    pub code: MemberCode,
    pub name: String,
}

/// コマンド：書籍を登録する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBook {
    pub code: BookCode,
    pub title: String,
    pub author: Option<String>,
    pub shelf: Option<String>,
}

/// コマンド：書籍情報を更新する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBook {
    pub code: BookCode,
    pub title: String,
    pub author: Option<String>,
    pub shelf: Option<String>,
}
