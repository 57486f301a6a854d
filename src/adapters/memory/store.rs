use crate::domain::{Book, BookCode, Loan, LoanId, Member, MemberCode, NewLoan};
use crate::ports::{BookRepository, LoanRepository, MemberRepository, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Tables {
    members: BTreeMap<MemberCode, Member>,
    books: BTreeMap<BookCode, Book>,
    loans: Vec<Loan>,
    last_loan_id: Option<LoanId>,
}

/// In-memory storage backend
///
/// Keeps all three collections behind a single mutex. Nothing is persisted;
/// used by tests and by `LIBRARY_STORAGE=memory` for throwaway runs.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn find(&self, code: &MemberCode) -> Result<Option<Member>> {
        Ok(self.tables().members.get(code).cloned())
    }

    async fn list(&self) -> Result<Vec<Member>> {
        Ok(self.tables().members.values().cloned().collect())
    }

    async fn insert(&self, member: Member) -> Result<bool> {
        let mut tables = self.tables();
        if tables.members.contains_key(&member.code) {
            return Ok(false);
        }
        tables.members.insert(member.code.clone(), member);
        Ok(true)
    }

    async fn update(&self, member: Member) -> Result<bool> {
        let mut tables = self.tables();
        match tables.members.get_mut(&member.code) {
            Some(existing) => {
                *existing = member;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, code: &MemberCode) -> Result<bool> {
        Ok(self.tables().members.remove(code).is_some())
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn find(&self, code: &BookCode) -> Result<Option<Book>> {
        Ok(self.tables().books.get(code).cloned())
    }

    async fn list(&self) -> Result<Vec<Book>> {
        Ok(self.tables().books.values().cloned().collect())
    }

    async fn insert(&self, book: Book) -> Result<bool> {
        let mut tables = self.tables();
        if tables.books.contains_key(&book.code) {
            return Ok(false);
        }
        tables.books.insert(book.code.clone(), book);
        Ok(true)
    }

    async fn update(&self, book: Book) -> Result<bool> {
        let mut tables = self.tables();
        match tables.books.get_mut(&book.code) {
            Some(existing) => {
                *existing = book;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, code: &BookCode) -> Result<bool> {
        Ok(self.tables().books.remove(code).is_some())
    }
}

#[async_trait]
impl LoanRepository for MemoryStore {
    async fn insert(&self, new_loan: NewLoan) -> Result<Loan> {
        let mut tables = self.tables();
        let loan_id = tables
            .last_loan_id
            .map_or(LoanId::from_i64(1), |id| id.next());
        let loan = new_loan.with_id(loan_id);
        tables.loans.push(loan.clone());
        tables.last_loan_id = Some(loan_id);
        Ok(loan)
    }

    async fn find_open_by_book(&self, book_code: &BookCode) -> Result<Vec<Loan>> {
        Ok(self
            .tables()
            .loans
            .iter()
            .filter(|l| l.is_open() && &l.book_code == book_code)
            .cloned()
            .collect())
    }

    async fn find_open_by_member(&self, member_code: &MemberCode) -> Result<Vec<Loan>> {
        Ok(self
            .tables()
            .loans
            .iter()
            .filter(|l| l.is_open() && &l.member_code == member_code)
            .cloned()
            .collect())
    }

    async fn list_open(&self) -> Result<Vec<Loan>> {
        Ok(self
            .tables()
            .loans
            .iter()
            .filter(|l| l.is_open())
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Loan>> {
        Ok(self.tables().loans.clone())
    }

    async fn mark_returned(&self, loan_id: LoanId, returned_at: DateTime<Utc>) -> Result<bool> {
        let mut tables = self.tables();
        match tables
            .loans
            .iter_mut()
            .find(|l| l.loan_id == loan_id && l.is_open())
        {
            Some(loan) => {
                loan.returned_at = Some(returned_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::loan::lend;

    fn member(code: &str, name: &str) -> Member {
        Member::new(MemberCode::parse(code).unwrap(), name).unwrap()
    }

    #[tokio::test]
    async fn test_member_insert_rejects_duplicate_code() {
        let store = MemoryStore::new();

        assert!(MemberRepository::insert(&store, member("U1", "Alice")).await.unwrap());
        assert!(!MemberRepository::insert(&store, member("U1", "Bob")).await.unwrap());

        let found = MemberRepository::find(&store, &MemberCode::parse("U1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "Alice");
    }

    #[tokio::test]
    async fn test_member_list_is_sorted_by_code() {
        let store = MemoryStore::new();
        for (code, name) in [("U3", "Carol"), ("U1", "Alice"), ("U2", "Bob")] {
            MemberRepository::insert(&store, member(code, name))
                .await
                .unwrap();
        }

        let codes: Vec<String> = MemberRepository::list(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.code.to_string())
            .collect();
        assert_eq!(codes, vec!["U1", "U2", "U3"]);
    }

    #[tokio::test]
    async fn test_loan_ids_are_sequential() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let m = MemberCode::parse("U1").unwrap();

        let first = LoanRepository::insert(
            &store,
            lend(m.clone(), BookCode::parse("B1").unwrap(), now),
        )
        .await
        .unwrap();
        let second = LoanRepository::insert(&store, lend(m, BookCode::parse("B2").unwrap(), now))
            .await
            .unwrap();

        assert_eq!(first.loan_id, LoanId::from_i64(1));
        assert_eq!(second.loan_id, LoanId::from_i64(2));
    }

    #[tokio::test]
    async fn test_mark_returned_only_once() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let loan = LoanRepository::insert(
            &store,
            lend(
                MemberCode::parse("U1").unwrap(),
                BookCode::parse("B1").unwrap(),
                now,
            ),
        )
        .await
        .unwrap();

        assert!(store.mark_returned(loan.loan_id, now).await.unwrap());
        assert!(!store.mark_returned(loan.loan_id, now).await.unwrap());
        assert!(store.list_open().await.unwrap().is_empty());
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}
