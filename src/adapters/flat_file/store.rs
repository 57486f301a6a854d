use crate::domain::{Book, BookCode, Loan, LoanId, Member, MemberCode, NewLoan};
use crate::ports::{BookRepository, LoanRepository, MemberRepository, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::records::*;

/// ヘッダ行のみのファイル内容を作る
fn encode_header(headers: &[&str]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(headers)?;
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

/// 行をエンコードする（ヘッダなし）
fn encode_rows<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

/// フラットファイル（区切りテキスト）のストレージ実装
///
/// データディレクトリに`members.csv`、`books.csv`、`loans.csv`を置く。
/// - 追加は末尾への追記
/// - 更新・削除はファイル全体の書き直し（一時ファイルに書いてからrename）
/// - 読み取り・変更・書き込みは`write_lock`で直列化する
///
/// 貸出IDは既存の最大ID + 1。
pub struct FlatFileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FlatFileStore {
    /// データディレクトリを開く
    ///
    /// ディレクトリと、存在しないファイルをヘッダ行付きで作成する。
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let store = Self {
            dir,
            write_lock: Mutex::new(()),
        };
        store.ensure_file(MEMBERS_FILE, MEMBER_HEADERS).await?;
        store.ensure_file(BOOKS_FILE, BOOK_HEADERS).await?;
        store.ensure_file(LOANS_FILE, LOAN_HEADERS).await?;

        tracing::debug!(dir = %store.dir.display(), "Flat file store opened");
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn ensure_file(&self, file: &str, headers: &[&str]) -> Result<()> {
        let path = self.dir.join(file);
        if tokio::fs::try_exists(&path).await? {
            return Ok(());
        }
        tokio::fs::write(&path, encode_header(headers)?).await?;
        Ok(())
    }

    async fn read_rows<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let bytes = tokio::fs::read(self.dir.join(file)).await?;
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let rows = reader
            .deserialize()
            .collect::<std::result::Result<Vec<T>, csv::Error>>()?;
        Ok(rows)
    }

    async fn append_row<T: Serialize>(&self, file: &str, row: &T) -> Result<()> {
        let bytes = encode_rows(std::slice::from_ref(row))?;
        let mut handle = tokio::fs::OpenOptions::new()
            .append(true)
            .open(self.dir.join(file))
            .await?;
        handle.write_all(&bytes).await?;
        handle.sync_data().await?;
        Ok(())
    }

    async fn write_rows<T: Serialize>(
        &self,
        file: &str,
        headers: &[&str],
        rows: &[T],
    ) -> Result<()> {
        let mut bytes = encode_header(headers)?;
        bytes.extend(encode_rows(rows)?);

        let path = self.dir.join(file);
        let tmp = path.with_extension("csv.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn members(&self) -> Result<Vec<MemberRecord>> {
        self.read_rows(MEMBERS_FILE).await
    }

    async fn books(&self) -> Result<Vec<BookRecord>> {
        self.read_rows(BOOKS_FILE).await
    }

    async fn loans(&self) -> Result<Vec<Loan>> {
        let records: Vec<LoanRecord> = self.read_rows(LOANS_FILE).await?;
        Ok(records.into_iter().map(Loan::from).collect())
    }

    async fn loans_where(&self, predicate: impl Fn(&Loan) -> bool) -> Result<Vec<Loan>> {
        let mut loans: Vec<Loan> = self.loans().await?.into_iter().filter(predicate).collect();
        loans.sort_by_key(|l| l.loan_id);
        Ok(loans)
    }
}

#[async_trait]
impl MemberRepository for FlatFileStore {
    async fn find(&self, code: &MemberCode) -> Result<Option<Member>> {
        Ok(self
            .members()
            .await?
            .into_iter()
            .find(|r| &r.code == code)
            .map(Member::from))
    }

    async fn list(&self) -> Result<Vec<Member>> {
        let mut members: Vec<Member> =
            self.members().await?.into_iter().map(Member::from).collect();
        members.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(members)
    }

    async fn insert(&self, member: Member) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        if self.members().await?.iter().any(|r| r.code == member.code) {
            return Ok(false);
        }
        self.append_row(MEMBERS_FILE, &MemberRecord::from(member))
            .await?;
        Ok(true)
    }

    async fn update(&self, member: Member) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.members().await?;
        let Some(record) = records.iter_mut().find(|r| r.code == member.code) else {
            return Ok(false);
        };
        *record = MemberRecord::from(member);
        self.write_rows(MEMBERS_FILE, MEMBER_HEADERS, &records)
            .await?;
        Ok(true)
    }

    async fn delete(&self, code: &MemberCode) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.members().await?;
        let before = records.len();
        records.retain(|r| &r.code != code);
        if records.len() == before {
            return Ok(false);
        }
        self.write_rows(MEMBERS_FILE, MEMBER_HEADERS, &records)
            .await?;
        Ok(true)
    }
}

#[async_trait]
impl BookRepository for FlatFileStore {
    async fn find(&self, code: &BookCode) -> Result<Option<Book>> {
        Ok(self
            .books()
            .await?
            .into_iter()
            .find(|r| &r.code == code)
            .map(Book::from))
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let mut books: Vec<Book> = self.books().await?.into_iter().map(Book::from).collect();
        books.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(books)
    }

    async fn insert(&self, book: Book) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        if self.books().await?.iter().any(|r| r.code == book.code) {
            return Ok(false);
        }
        self.append_row(BOOKS_FILE, &BookRecord::from(book)).await?;
        Ok(true)
    }

    async fn update(&self, book: Book) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.books().await?;
        let Some(record) = records.iter_mut().find(|r| r.code == book.code) else {
            return Ok(false);
        };
        *record = BookRecord::from(book);
        self.write_rows(BOOKS_FILE, BOOK_HEADERS, &records).await?;
        Ok(true)
    }

    async fn delete(&self, code: &BookCode) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.books().await?;
        let before = records.len();
        records.retain(|r| &r.code != code);
        if records.len() == before {
            return Ok(false);
        }
        self.write_rows(BOOKS_FILE, BOOK_HEADERS, &records).await?;
        Ok(true)
    }
}

#[async_trait]
impl LoanRepository for FlatFileStore {
    async fn insert(&self, new_loan: NewLoan) -> Result<Loan> {
        let _guard = self.write_lock.lock().await;
        let loan_id = self
            .loans()
            .await?
            .iter()
            .map(|l| l.loan_id)
            .max()
            .map_or(LoanId::from_i64(1), |id| id.next());

        let loan = new_loan.with_id(loan_id);
        self.append_row(LOANS_FILE, &LoanRecord::from(loan.clone()))
            .await?;
        Ok(loan)
    }

    async fn find_open_by_book(&self, book_code: &BookCode) -> Result<Vec<Loan>> {
        self.loans_where(|l| l.is_open() && &l.book_code == book_code)
            .await
    }

    async fn find_open_by_member(&self, member_code: &MemberCode) -> Result<Vec<Loan>> {
        self.loans_where(|l| l.is_open() && &l.member_code == member_code)
            .await
    }

    async fn list_open(&self) -> Result<Vec<Loan>> {
        self.loans_where(Loan::is_open).await
    }

    async fn list_all(&self) -> Result<Vec<Loan>> {
        self.loans_where(|_| true).await
    }

    async fn mark_returned(&self, loan_id: LoanId, returned_at: DateTime<Utc>) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut loans = self.loans().await?;
        let Some(loan) = loans
            .iter_mut()
            .find(|l| l.loan_id == loan_id && l.is_open())
        else {
            return Ok(false);
        };
        loan.returned_at = Some(returned_at);

        let records: Vec<LoanRecord> = loans.into_iter().map(LoanRecord::from).collect();
        self.write_rows(LOANS_FILE, LOAN_HEADERS, &records).await?;
        Ok(true)
    }
}
