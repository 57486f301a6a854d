#![allow(dead_code)]

use rusty_library_circulation::adapters::{FlatFileStore, MemoryStore, SqliteStore};
use rusty_library_circulation::application::{ServiceDependencies, catalog};
use rusty_library_circulation::domain::commands::{CreateBook, CreateMember};
use rusty_library_circulation::domain::{BookCode, MemberCode};
use std::sync::Arc;
use tempfile::TempDir;

/// テスト用のストレージと依存関係
///
/// フラットファイルの場合、一時ディレクトリはこの値が生きている間だけ残る。
pub struct TestBackend {
    pub name: &'static str,
    pub deps: ServiceDependencies,
    _dir: Option<TempDir>,
}

pub fn memory_backend() -> TestBackend {
    TestBackend {
        name: "memory",
        deps: ServiceDependencies::from_store(Arc::new(MemoryStore::new())),
        _dir: None,
    }
}

/// インメモリSQLiteにマイグレーションを適用して作成
pub async fn sqlite_backend() -> TestBackend {
    let store = SqliteStore::in_memory()
        .await
        .expect("Failed to open in-memory SQLite");
    TestBackend {
        name: "sqlite",
        deps: ServiceDependencies::from_store(Arc::new(store)),
        _dir: None,
    }
}

/// 一時ディレクトリ上にフラットファイルストアを作成
pub async fn flat_file_backend() -> TestBackend {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = FlatFileStore::open(dir.path())
        .await
        .expect("Failed to open flat-file store");
    TestBackend {
        name: "flat_file",
        deps: ServiceDependencies::from_store(Arc::new(store)),
        _dir: Some(dir),
    }
}

/// 3種類すべてのバックエンド
pub async fn all_backends() -> Vec<TestBackend> {
    vec![
        memory_backend(),
        sqlite_backend().await,
        flat_file_backend().await,
    ]
}

pub fn member_code(code: &str) -> MemberCode {
    MemberCode::parse(code).expect("valid member code")
}

pub fn book_code(code: &str) -> BookCode {
    BookCode::parse(code).expect("valid book code")
}

pub async fn seed_member(deps: &ServiceDependencies, code: &str, name: &str) {
    catalog::create_member(
        deps,
        CreateMember {
            code: member_code(code),
            name: name.to_string(),
        },
    )
    .await
    .expect("Failed to seed member");
}

pub async fn seed_book(deps: &ServiceDependencies, code: &str, title: &str) {
    catalog::create_book(
        deps,
        CreateBook {
            code: book_code(code),
            title: title.to_string(),
            author: None,
            shelf: None,
        },
    )
    .await
    .expect("Failed to seed book");
}
