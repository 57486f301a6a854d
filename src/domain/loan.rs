use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{BookCode, LoanId, MemberCode, ReturnLoanError};

/// 延滞とみなすまでの日数
pub const OVERDUE_AFTER_DAYS: i64 = 30;

/// 貸出ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// 貸出中（返却日時なし）
    Open,
    /// 返却済み
    Returned,
}

impl LoanStatus {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Open => "open",
            LoanStatus::Returned => "returned",
        }
    }
}

/// 採番前の貸出
///
/// IDはストレージが割り当てる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    pub member_code: MemberCode,
    pub book_code: BookCode,
    pub loaned_at: DateTime<Utc>,
}

impl NewLoan {
    /// 採番済みの貸出に変換する
    pub fn with_id(self, loan_id: LoanId) -> Loan {
        Loan {
            loan_id,
            member_code: self.member_code,
            book_code: self.book_code,
            loaned_at: self.loaned_at,
            returned_at: None,
        }
    }
}

/// 貸出 - 1人の会員への1冊の書籍の1回の貸出
///
/// 状態遷移は Open → Returned の一方向のみ。
/// `returned_at`が`None`の間は貸出中。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: LoanId,
    pub member_code: MemberCode,
    pub book_code: BookCode,
    pub loaned_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn status(&self) -> LoanStatus {
        match self.returned_at {
            None => LoanStatus::Open,
            Some(_) => LoanStatus::Returned,
        }
    }

    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }

    /// この日時を過ぎると延滞になる
    pub fn overdue_after(&self) -> DateTime<Utc> {
        self.loaned_at + Duration::days(OVERDUE_AFTER_DAYS)
    }
}

/// 純粋関数：書籍を貸し出す
///
/// 会員・書籍の存在確認と貸出中チェックはアプリケーション層で行う。
pub fn lend(member_code: MemberCode, book_code: BookCode, loaned_at: DateTime<Utc>) -> NewLoan {
    NewLoan {
        member_code,
        book_code,
        loaned_at,
    }
}

/// 純粋関数：書籍を返却する
///
/// 延滞していても返却は受け付ける。
/// 副作用なし。返却済みの新しいLoanを返す。
pub fn return_loan(loan: &Loan, returned_at: DateTime<Utc>) -> Result<Loan, ReturnLoanError> {
    if !loan.is_open() {
        return Err(ReturnLoanError::AlreadyReturned);
    }

    Ok(Loan {
        returned_at: Some(returned_at),
        ..loan.clone()
    })
}

/// 純粋関数：延滞判定
///
/// 貸出中で、貸出日時から30日を超えて経過していれば延滞。
pub fn is_overdue(loan: &Loan, now: DateTime<Utc>) -> bool {
    loan.is_open() && now - loan.loaned_at > Duration::days(OVERDUE_AFTER_DAYS)
}

/// 純粋関数：返却対象の貸出を選ぶ
///
/// 同じ書籍に貸出中の行が複数ある場合（不変条件違反の旧データ）は、
/// 最も古く登録された（IDが最小の）貸出を対象とする。
pub fn select_loan_to_return(loans: &[Loan]) -> Option<&Loan> {
    loans
        .iter()
        .filter(|loan| loan.is_open())
        .min_by_key(|loan| loan.loan_id)
}
