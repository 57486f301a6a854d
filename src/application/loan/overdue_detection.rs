use crate::application::ServiceDependencies;
use crate::domain::{self, Loan};
use chrono::{DateTime, Utc};

use super::errors::{LoanApplicationError, Result};
use super::loan_queries::{MemberLoan, book_titles, to_member_loan};

/// 延滞一覧
///
/// 全会員の貸出中の貸出から、延滞しているもの（貸出から30日超）を抽出する。
///
/// 処理フロー：
/// 1. 貸出中の全貸出を取得
/// 2. `now`時点で延滞しているものだけを残す
/// 3. 書籍タイトルを付けて、貸出日時の古い順に並べる
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `now` - 判定基準の日時
pub async fn overdue_loans(
    deps: &ServiceDependencies,
    now: DateTime<Utc>,
) -> Result<Vec<MemberLoan>> {
    let open_loans = deps
        .loans
        .list_open()
        .await
        .map_err(LoanApplicationError::Storage)?;

    let mut overdue: Vec<Loan> = open_loans
        .into_iter()
        .filter(|loan| domain::loan::is_overdue(loan, now))
        .collect();

    if overdue.is_empty() {
        return Ok(Vec::new());
    }

    overdue.sort_by_key(|loan| (loan.loaned_at, loan.loan_id));

    let titles = book_titles(deps).await?;

    tracing::debug!(count = overdue.len(), "Overdue loans detected");

    Ok(overdue
        .into_iter()
        .map(|loan| to_member_loan(loan, &titles, now))
        .collect())
}
