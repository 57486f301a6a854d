//! 区切りテキストファイルの行フォーマット
//!
//! 各ファイルは先頭にヘッダ行を持つ。列はヘッダ名で対応付けるため、
//! 列の順序が入れ替わっていても読める。

use crate::domain::{Book, BookCode, Loan, LoanId, Member, MemberCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(super) const MEMBERS_FILE: &str = "members.csv";
pub(super) const BOOKS_FILE: &str = "books.csv";
pub(super) const LOANS_FILE: &str = "loans.csv";

pub(super) const MEMBER_HEADERS: &[&str] = &["code", "name"];
pub(super) const BOOK_HEADERS: &[&str] = &["code", "title", "author", "shelf"];
pub(super) const LOAN_HEADERS: &[&str] = &[
    "id",
    "member_code",
    "book_code",
    "loaned_at",
    "returned_at",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct MemberRecord {
    pub code: MemberCode,
    pub name: String,
}

impl From<Member> for MemberRecord {
    fn from(member: Member) -> Self {
        Self {
            code: member.code,
            name: member.name,
        }
    }
}

impl From<MemberRecord> for Member {
    fn from(record: MemberRecord) -> Self {
        Member {
            code: record.code,
            name: record.name,
        }
    }
}

/// 空欄の著者・配架場所は`None`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct BookRecord {
    pub code: BookCode,
    pub title: String,
    pub author: Option<String>,
    pub shelf: Option<String>,
}

impl From<Book> for BookRecord {
    fn from(book: Book) -> Self {
        Self {
            code: book.code,
            title: book.title,
            author: book.author,
            shelf: book.shelf,
        }
    }
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Book {
            code: record.code,
            title: record.title,
            author: record.author,
            shelf: record.shelf,
        }
    }
}

/// 空欄の`returned_at`は貸出中を表す。日時はRFC 3339。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct LoanRecord {
    pub id: LoanId,
    pub member_code: MemberCode,
    pub book_code: BookCode,
    pub loaned_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl From<Loan> for LoanRecord {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.loan_id,
            member_code: loan.member_code,
            book_code: loan.book_code,
            loaned_at: loan.loaned_at,
            returned_at: loan.returned_at,
        }
    }
}

impl From<LoanRecord> for Loan {
    fn from(record: LoanRecord) -> Self {
        Loan {
            loan_id: record.id,
            member_code: record.member_code,
            book_code: record.book_code,
            loaned_at: record.loaned_at,
            returned_at: record.returned_at,
        }
    }
}
