mod errors;
mod loan_queries;
mod loan_service;
mod overdue_detection;

pub use errors::{LoanApplicationError, Result};
pub use loan_queries::{LoanHistoryEntry, MemberLoan, loan_history, loans_for_member};
pub use loan_service::{is_book_on_loan, register_loan, register_return};
pub use overdue_detection::overdue_loans;
