use crate::application::ServiceDependencies;
use crate::domain::{self, BookCode, Loan, commands::*};

use super::errors::{LoanApplicationError, Result};

/// 書籍が貸出中かどうか
///
/// 返却日時が未設定の貸出が1件でもあれば貸出中。
pub async fn is_book_on_loan(deps: &ServiceDependencies, book_code: &BookCode) -> Result<bool> {
    let open_loans = deps
        .loans
        .find_open_by_book(book_code)
        .await
        .map_err(LoanApplicationError::Storage)?;

    Ok(!open_loans.is_empty())
}

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - 会員が存在すること
/// - 書籍が存在すること
/// - 書籍が貸出中でないこと
///
/// 確認から追加までを書き込みロックの中で行うため、
/// 同じ書籍への同時の貸出登録は片方だけが成功する。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 貸出コマンド
///
/// # 戻り値
/// 成功時は採番済みの貸出
pub async fn register_loan(deps: &ServiceDependencies, cmd: RegisterLoan) -> Result<Loan> {
    let _guard = deps.write_lock.lock().await;

    // 1. 会員の存在確認
    let member = deps
        .members
        .find(&cmd.member_code)
        .await
        .map_err(LoanApplicationError::Storage)?;

    if member.is_none() {
        return Err(LoanApplicationError::MemberNotFound(cmd.member_code));
    }

    // 2. 書籍の存在確認
    let book = deps
        .books
        .find(&cmd.book_code)
        .await
        .map_err(LoanApplicationError::Storage)?;

    if book.is_none() {
        return Err(LoanApplicationError::BookNotFound(cmd.book_code));
    }

    // 3. 貸出中チェック
    if is_book_on_loan(deps, &cmd.book_code).await? {
        return Err(LoanApplicationError::AlreadyOnLoan(cmd.book_code));
    }

    // 4. ドメイン層の純粋関数を呼び出し、追記
    let new_loan = domain::loan::lend(cmd.member_code, cmd.book_code, cmd.loaned_at);
    let loan = deps
        .loans
        .insert(new_loan)
        .await
        .map_err(LoanApplicationError::Storage)?;

    tracing::info!(
        loan_id = %loan.loan_id,
        member_code = %loan.member_code,
        book_code = %loan.book_code,
        "Loan registered"
    );

    Ok(loan)
}

/// 書籍を返却する
///
/// ビジネスルール：
/// - 書籍に貸出中の貸出があること
/// - 延滞していても返却は受け付ける
///
/// 貸出中の行が複数ある場合は最も古い貸出（IDが最小）だけを返却済みにする。
///
/// # 戻り値
/// 返却済みになった貸出。貸出中でなければ`NotOnLoan`
pub async fn register_return(deps: &ServiceDependencies, cmd: RegisterReturn) -> Result<Loan> {
    let _guard = deps.write_lock.lock().await;

    // 1. 貸出中の貸出を取得
    let open_loans = deps
        .loans
        .find_open_by_book(&cmd.book_code)
        .await
        .map_err(LoanApplicationError::Storage)?;

    if open_loans.len() > 1 {
        tracing::warn!(
            book_code = %cmd.book_code,
            open_loans = open_loans.len(),
            "Book has more than one open loan; returning the earliest"
        );
    }

    let Some(loan) = domain::loan::select_loan_to_return(&open_loans) else {
        return Err(LoanApplicationError::NotOnLoan(cmd.book_code));
    };

    // 2. ドメイン層の純粋関数で状態遷移
    let returned = domain::loan::return_loan(loan, cmd.returned_at)
        .map_err(|e| LoanApplicationError::DomainError(e.to_string()))?;

    // 3. 返却日時を記録
    let updated = deps
        .loans
        .mark_returned(returned.loan_id, cmd.returned_at)
        .await
        .map_err(LoanApplicationError::Storage)?;

    if !updated {
        return Err(LoanApplicationError::NotOnLoan(cmd.book_code));
    }

    tracing::info!(
        loan_id = %returned.loan_id,
        member_code = %returned.member_code,
        book_code = %returned.book_code,
        "Return registered"
    );

    Ok(returned)
}
