use crate::domain::{BookCode, Loan, LoanId, MemberCode, NewLoan};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::Result;

/// 貸出リポジトリポート
///
/// 貸出は追記され、返却時に一度だけ更新される。削除はしない。
/// 一覧系のメソッドはすべてID順（登録順）で返す。
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// 貸出を追加し、採番済みの貸出を返す
    async fn insert(&self, new_loan: NewLoan) -> Result<Loan>;

    /// 書籍の貸出中の貸出を取得する
    ///
    /// 不変条件が守られていれば高々1件。
    async fn find_open_by_book(&self, book_code: &BookCode) -> Result<Vec<Loan>>;

    /// 会員の貸出中の貸出を取得する
    async fn find_open_by_member(&self, member_code: &MemberCode) -> Result<Vec<Loan>>;

    /// 貸出中の全貸出を取得する
    async fn list_open(&self) -> Result<Vec<Loan>>;

    /// 返却済みを含む全貸出を取得する
    async fn list_all(&self) -> Result<Vec<Loan>>;

    /// 返却日時を記録する
    ///
    /// 貸出が存在しない、または既に返却済みの場合は`false`を返す。
    async fn mark_returned(&self, loan_id: LoanId, returned_at: DateTime<Utc>) -> Result<bool>;
}
