use crate::application::ServiceDependencies;
use crate::domain::{self, BookCode, Loan, MemberCode};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::errors::{LoanApplicationError, Result};

/// 会員向けの貸出一覧の1行
///
/// 書籍タイトルは書籍が削除済みなら`None`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberLoan {
    pub loan: Loan,
    pub book_title: Option<String>,
    pub overdue: bool,
}

/// 貸出履歴の1行（会員・書籍・貸出の結合結果）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanHistoryEntry {
    pub loan: Loan,
    pub member_name: Option<String>,
    pub book_title: Option<String>,
}

pub(super) async fn book_titles(deps: &ServiceDependencies) -> Result<HashMap<BookCode, String>> {
    let books = deps
        .books
        .list()
        .await
        .map_err(LoanApplicationError::Storage)?;

    Ok(books.into_iter().map(|b| (b.code, b.title)).collect())
}

pub(super) fn to_member_loan(
    loan: Loan,
    titles: &HashMap<BookCode, String>,
    now: DateTime<Utc>,
) -> MemberLoan {
    MemberLoan {
        book_title: titles.get(&loan.book_code).cloned(),
        overdue: domain::loan::is_overdue(&loan, now),
        loan,
    }
}

/// 会員の貸出中の貸出一覧
///
/// 各行に書籍タイトルと延滞フラグ（貸出から30日超）を付ける。
/// 存在しない会員コードの場合は空の一覧を返す。
pub async fn loans_for_member(
    deps: &ServiceDependencies,
    member_code: &MemberCode,
    now: DateTime<Utc>,
) -> Result<Vec<MemberLoan>> {
    let loans = deps
        .loans
        .find_open_by_member(member_code)
        .await
        .map_err(LoanApplicationError::Storage)?;

    if loans.is_empty() {
        return Ok(Vec::new());
    }

    let titles = book_titles(deps).await?;

    Ok(loans
        .into_iter()
        .map(|loan| to_member_loan(loan, &titles, now))
        .collect())
}

/// 貸出履歴
///
/// 返却済みを含む全貸出を新しい順に返す。
/// 会員名・書籍タイトルは削除済みなら`None`。
pub async fn loan_history(deps: &ServiceDependencies) -> Result<Vec<LoanHistoryEntry>> {
    let (members, books, loans) = futures::try_join!(
        deps.members.list(),
        deps.books.list(),
        deps.loans.list_all()
    )
    .map_err(LoanApplicationError::Storage)?;

    let names: HashMap<MemberCode, String> =
        members.into_iter().map(|m| (m.code, m.name)).collect();
    let titles: HashMap<BookCode, String> = books.into_iter().map(|b| (b.code, b.title)).collect();

    let mut entries: Vec<LoanHistoryEntry> = loans
        .into_iter()
        .map(|loan| LoanHistoryEntry {
            member_name: names.get(&loan.member_code).cloned(),
            book_title: titles.get(&loan.book_code).cloned(),
            loan,
        })
        .collect();

    entries.sort_by(|a, b| b.loan.loan_id.cmp(&a.loan.loan_id));

    Ok(entries)
}
