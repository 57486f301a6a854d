use crate::application::ServiceDependencies;
use crate::domain::{Book, BookCode, Member, MemberCode, commands::*};

use super::errors::{CatalogError, RecordKey, Result};

// ============================================================================
// 会員
// ============================================================================

/// コードで会員を検索する
pub async fn find_member(deps: &ServiceDependencies, code: &MemberCode) -> Result<Member> {
    deps.members
        .find(code)
        .await
        .map_err(CatalogError::Storage)?
        .ok_or_else(|| CatalogError::NotFound(RecordKey::Member(code.clone())))
}

/// 全会員をコード順で取得する
pub async fn list_members(deps: &ServiceDependencies) -> Result<Vec<Member>> {
    deps.members.list().await.map_err(CatalogError::Storage)
}

/// 会員を登録する
///
/// 同じコードの会員が既に存在する場合は`DuplicateKey`。
pub async fn create_member(deps: &ServiceDependencies, cmd: CreateMember) -> Result<Member> {
    let member = Member::new(cmd.code, &cmd.name)?;

    let _guard = deps.write_lock.lock().await;

    let inserted = deps
        .members
        .insert(member.clone())
        .await
        .map_err(CatalogError::Storage)?;

    if !inserted {
        return Err(CatalogError::DuplicateKey(RecordKey::Member(member.code)));
    }

    tracing::info!(member_code = %member.code, "Member created");
    Ok(member)
}

/// 会員名を変更する
pub async fn rename_member(deps: &ServiceDependencies, cmd: RenameMember) -> Result<Member> {
    let _guard = deps.write_lock.lock().await;

    let current = find_member(deps, &cmd.code).await?;
    let renamed = current.renamed(&cmd.name)?;

    let updated = deps
        .members
        .update(renamed.clone())
        .await
        .map_err(CatalogError::Storage)?;

    if !updated {
        return Err(CatalogError::NotFound(RecordKey::Member(cmd.code)));
    }

    tracing::info!(member_code = %renamed.code, "Member renamed");
    Ok(renamed)
}

/// 会員を削除する
///
/// 貸出中の貸出がある会員は削除できない（`ReferentialConflict`）。
/// 返却済みの貸出は履歴として残る。
pub async fn delete_member(deps: &ServiceDependencies, code: &MemberCode) -> Result<()> {
    let _guard = deps.write_lock.lock().await;

    let open_loans = deps
        .loans
        .find_open_by_member(code)
        .await
        .map_err(CatalogError::Storage)?;

    if !open_loans.is_empty() {
        return Err(CatalogError::ReferentialConflict(RecordKey::Member(
            code.clone(),
        )));
    }

    let deleted = deps
        .members
        .delete(code)
        .await
        .map_err(CatalogError::Storage)?;

    if !deleted {
        return Err(CatalogError::NotFound(RecordKey::Member(code.clone())));
    }

    tracing::info!(member_code = %code, "Member deleted");
    Ok(())
}

// ============================================================================
// 書籍
// ============================================================================

/// コードで書籍を検索する
pub async fn find_book(deps: &ServiceDependencies, code: &BookCode) -> Result<Book> {
    deps.books
        .find(code)
        .await
        .map_err(CatalogError::Storage)?
        .ok_or_else(|| CatalogError::NotFound(RecordKey::Book(code.clone())))
}

/// 全書籍をコード順で取得する
pub async fn list_books(deps: &ServiceDependencies) -> Result<Vec<Book>> {
    deps.books.list().await.map_err(CatalogError::Storage)
}

/// 書籍を登録する
///
/// 同じコードの書籍が既に存在する場合は`DuplicateKey`。
pub async fn create_book(deps: &ServiceDependencies, cmd: CreateBook) -> Result<Book> {
    let book = Book::new(cmd.code, &cmd.title, cmd.author, cmd.shelf)?;

    let _guard = deps.write_lock.lock().await;

    let inserted = deps
        .books
        .insert(book.clone())
        .await
        .map_err(CatalogError::Storage)?;

    if !inserted {
        return Err(CatalogError::DuplicateKey(RecordKey::Book(book.code)));
    }

    tracing::info!(book_code = %book.code, "Book created");
    Ok(book)
}

/// 書籍のタイトル・著者・配架場所を更新する
pub async fn update_book(deps: &ServiceDependencies, cmd: UpdateBook) -> Result<Book> {
    let book = Book::new(cmd.code, &cmd.title, cmd.author, cmd.shelf)?;

    let _guard = deps.write_lock.lock().await;

    let updated = deps
        .books
        .update(book.clone())
        .await
        .map_err(CatalogError::Storage)?;

    if !updated {
        return Err(CatalogError::NotFound(RecordKey::Book(book.code)));
    }

    tracing::info!(book_code = %book.code, "Book updated");
    Ok(book)
}

/// 書籍を削除する
///
/// 貸出中の書籍は削除できない（`ReferentialConflict`）。
pub async fn delete_book(deps: &ServiceDependencies, code: &BookCode) -> Result<()> {
    let _guard = deps.write_lock.lock().await;

    let open_loans = deps
        .loans
        .find_open_by_book(code)
        .await
        .map_err(CatalogError::Storage)?;

    if !open_loans.is_empty() {
        return Err(CatalogError::ReferentialConflict(RecordKey::Book(
            code.clone(),
        )));
    }

    let deleted = deps
        .books
        .delete(code)
        .await
        .map_err(CatalogError::Storage)?;

    if !deleted {
        return Err(CatalogError::NotFound(RecordKey::Book(code.clone())));
    }

    tracing::info!(book_code = %code, "Book deleted");
    Ok(())
}
