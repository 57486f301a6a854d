use chrono::{Duration, Utc};
use rusty_library_circulation::adapters::SqliteStore;
use rusty_library_circulation::domain::{
    Book, BookCode, LoanId, LoanStatus, Member, MemberCode, NewLoan,
};
use rusty_library_circulation::ports::{BookRepository, LoanRepository, MemberRepository};
use tempfile::TempDir;

fn member(code: &str, name: &str) -> Member {
    Member::new(MemberCode::parse(code).unwrap(), name).unwrap()
}

fn book(code: &str, title: &str) -> Book {
    Book::new(
        BookCode::parse(code).unwrap(),
        title,
        Some("Frank Herbert".to_string()),
        None,
    )
    .unwrap()
}

fn new_loan(member: &str, book: &str) -> NewLoan {
    NewLoan {
        member_code: MemberCode::parse(member).unwrap(),
        book_code: BookCode::parse(book).unwrap(),
        loaned_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_migrations_can_run_twice() {
    let store = SqliteStore::in_memory().await.unwrap();

    // in_memory()で1回適用済み
    store.migrate().await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_member_insert_update_delete() {
    let store = SqliteStore::in_memory().await.unwrap();

    assert!(MemberRepository::insert(&store, member("U1", "Alice")).await.unwrap());
    // 同じコードは挿入されない
    assert!(!MemberRepository::insert(&store, member("U1", "Other")).await.unwrap());

    assert!(MemberRepository::update(&store, member("U1", "Alice L.")).await.unwrap());
    assert!(!MemberRepository::update(&store, member("U2", "Nobody")).await.unwrap());

    let found = MemberRepository::find(&store, &MemberCode::parse("U1").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "Alice L.");

    assert!(MemberRepository::delete(&store, &found.code).await.unwrap());
    assert!(!MemberRepository::delete(&store, &found.code).await.unwrap());
    assert!(MemberRepository::list(&store).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_book_optional_fields_are_nullable() {
    let store = SqliteStore::in_memory().await.unwrap();

    let mut plain = book("B2", "Emma");
    plain.author = None;
    BookRepository::insert(&store, book("B1", "Dune")).await.unwrap();
    BookRepository::insert(&store, plain).await.unwrap();

    let books = BookRepository::list(&store).await.unwrap();

    assert_eq!(books.len(), 2);
    assert_eq!(books[0].code.as_str(), "B1");
    assert_eq!(books[0].author.as_deref(), Some("Frank Herbert"));
    assert_eq!(books[1].author, None);
    assert_eq!(books[1].shelf, None);
}

#[tokio::test]
async fn test_loan_ids_are_assigned_in_order() {
    let store = SqliteStore::in_memory().await.unwrap();

    let first = LoanRepository::insert(&store, new_loan("U1", "B1")).await.unwrap();
    let second = LoanRepository::insert(&store, new_loan("U1", "B2")).await.unwrap();

    assert_eq!(first.loan_id, LoanId::from_i64(1));
    assert_eq!(second.loan_id, LoanId::from_i64(2));
    assert_eq!(first.status(), LoanStatus::Open);
}

#[tokio::test]
async fn test_second_open_loan_for_book_is_rejected_by_index() {
    let store = SqliteStore::in_memory().await.unwrap();

    LoanRepository::insert(&store, new_loan("U1", "B1")).await.unwrap();
    let result = LoanRepository::insert(&store, new_loan("U2", "B1")).await;

    assert!(result.is_err());
    let open = store
        .find_open_by_book(&BookCode::parse("B1").unwrap())
        .await
        .unwrap();
    assert_eq!(open.len(), 1);
}

#[tokio::test]
async fn test_mark_returned_only_once() {
    let store = SqliteStore::in_memory().await.unwrap();
    let loan = LoanRepository::insert(&store, new_loan("U1", "B1")).await.unwrap();
    let returned_at = loan.loaned_at + Duration::days(3);

    assert!(store.mark_returned(loan.loan_id, returned_at).await.unwrap());
    assert!(!store.mark_returned(loan.loan_id, returned_at).await.unwrap());
    assert!(!store.mark_returned(LoanId::from_i64(99), returned_at).await.unwrap());

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].returned_at, Some(returned_at));
    assert!(store.list_open().await.unwrap().is_empty());

    // 返却後は同じ書籍を再び貸し出せる
    LoanRepository::insert(&store, new_loan("U2", "B1")).await.unwrap();
}

#[tokio::test]
async fn test_open_loans_by_member() {
    let store = SqliteStore::in_memory().await.unwrap();
    LoanRepository::insert(&store, new_loan("U1", "B1")).await.unwrap();
    let returned = LoanRepository::insert(&store, new_loan("U1", "B2")).await.unwrap();
    LoanRepository::insert(&store, new_loan("U2", "B3")).await.unwrap();
    store.mark_returned(returned.loan_id, Utc::now()).await.unwrap();

    let open = store
        .find_open_by_member(&MemberCode::parse("U1").unwrap())
        .await
        .unwrap();

    assert_eq!(open.len(), 1);
    assert_eq!(open[0].book_code.as_str(), "B1");
}

#[tokio::test]
async fn test_file_database_survives_reconnect() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("library.db");
    let url = format!("sqlite://{}", path.display());

    {
        let store = SqliteStore::connect(&url).await.unwrap();
        MemberRepository::insert(&store, member("U1", "Alice")).await.unwrap();
        LoanRepository::insert(&store, new_loan("U1", "B1")).await.unwrap();
        store.pool().close().await;
    }

    let store = SqliteStore::connect(&url).await.unwrap();
    let members = MemberRepository::list(&store).await.unwrap();
    let loans = store.list_open().await.unwrap();

    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name, "Alice");
    assert_eq!(loans.len(), 1);
    assert!(path.exists());
}
