use crate::domain::{Book, BookCode, Loan, LoanId, Member, MemberCode, NewLoan};
use crate::ports::{BookRepository, LoanRepository, MemberRepository, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    Row, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
};
use std::str::FromStr;

/// SQLiteの行データをMemberに変換する
fn map_row_to_member(row: &SqliteRow) -> Result<Member> {
    let code: String = row.try_get("code")?;
    Ok(Member {
        code: MemberCode::parse(&code)?,
        name: row.try_get("name")?,
    })
}

/// SQLiteの行データをBookに変換する
fn map_row_to_book(row: &SqliteRow) -> Result<Book> {
    let code: String = row.try_get("code")?;
    Ok(Book {
        code: BookCode::parse(&code)?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        shelf: row.try_get("shelf")?,
    })
}

/// SQLiteの行データをLoanに変換する
///
/// `returned_at`がNULLなら貸出中。
fn map_row_to_loan(row: &SqliteRow) -> Result<Loan> {
    let member_code: String = row.try_get("member_code")?;
    let book_code: String = row.try_get("book_code")?;
    Ok(Loan {
        loan_id: LoanId::from_i64(row.try_get("id")?),
        member_code: MemberCode::parse(&member_code)?,
        book_code: BookCode::parse(&book_code)?,
        loaned_at: row.try_get("loaned_at")?,
        returned_at: row.try_get("returned_at")?,
    })
}

/// 組み込みデータベース（SQLite）のストレージ実装
///
/// スキーマは`migrations/`で管理する。
/// 貸出IDはAUTOINCREMENT、貸出中の貸出は書籍ごとに部分ユニークインデックスで1件に制限。
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// コネクションプールから作成する（マイグレーションは実行しない）
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// データベースURLに接続し、マイグレーションを実行する
    ///
    /// ファイルが存在しなければ、親ディレクトリごと作成する。
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;

        tracing::debug!(database_url, "SQLite store opened");
        Ok(store)
    }

    /// インメモリデータベースを作成する
    ///
    /// インメモリDBは接続ごとに別物になるため、接続は1本に固定する。
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// `migrations/`のマイグレーションを適用する
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl MemberRepository for SqliteStore {
    async fn find(&self, code: &MemberCode) -> Result<Option<Member>> {
        let row = sqlx::query("SELECT code, name FROM members WHERE code = ?1")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_member).transpose()
    }

    async fn list(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query("SELECT code, name FROM members ORDER BY code")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_row_to_member).collect()
    }

    async fn insert(&self, member: Member) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO members (code, name)
            VALUES (?1, ?2)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(member.code.as_str())
        .bind(&member.name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn update(&self, member: Member) -> Result<bool> {
        let result = sqlx::query("UPDATE members SET name = ?2 WHERE code = ?1")
            .bind(member.code.as_str())
            .bind(&member.name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, code: &MemberCode) -> Result<bool> {
        let result = sqlx::query("DELETE FROM members WHERE code = ?1")
            .bind(code.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl BookRepository for SqliteStore {
    async fn find(&self, code: &BookCode) -> Result<Option<Book>> {
        let row = sqlx::query("SELECT code, title, author, shelf FROM books WHERE code = ?1")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query("SELECT code, title, author, shelf FROM books ORDER BY code")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_row_to_book).collect()
    }

    async fn insert(&self, book: Book) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO books (code, title, author, shelf)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(book.code.as_str())
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.shelf)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn update(&self, book: Book) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = ?2, author = ?3, shelf = ?4
            WHERE code = ?1
            "#,
        )
        .bind(book.code.as_str())
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.shelf)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, code: &BookCode) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE code = ?1")
            .bind(code.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl LoanRepository for SqliteStore {
    async fn insert(&self, new_loan: NewLoan) -> Result<Loan> {
        let result = sqlx::query(
            r#"
            INSERT INTO loans (member_code, book_code, loaned_at, returned_at)
            VALUES (?1, ?2, ?3, NULL)
            "#,
        )
        .bind(new_loan.member_code.as_str())
        .bind(new_loan.book_code.as_str())
        .bind(new_loan.loaned_at)
        .execute(&self.pool)
        .await?;

        Ok(new_loan.with_id(LoanId::from_i64(result.last_insert_rowid())))
    }

    async fn find_open_by_book(&self, book_code: &BookCode) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT id, member_code, book_code, loaned_at, returned_at
            FROM loans
            WHERE book_code = ?1 AND returned_at IS NULL
            ORDER BY id
            "#,
        )
        .bind(book_code.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_loan).collect()
    }

    async fn find_open_by_member(&self, member_code: &MemberCode) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT id, member_code, book_code, loaned_at, returned_at
            FROM loans
            WHERE member_code = ?1 AND returned_at IS NULL
            ORDER BY id
            "#,
        )
        .bind(member_code.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_loan).collect()
    }

    async fn list_open(&self) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT id, member_code, book_code, loaned_at, returned_at
            FROM loans
            WHERE returned_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_loan).collect()
    }

    async fn list_all(&self) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT id, member_code, book_code, loaned_at, returned_at
            FROM loans
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_loan).collect()
    }

    async fn mark_returned(&self, loan_id: LoanId, returned_at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE loans
            SET returned_at = ?2
            WHERE id = ?1 AND returned_at IS NULL
            "#,
        )
        .bind(loan_id.value())
        .bind(returned_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
