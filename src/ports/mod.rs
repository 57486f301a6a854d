pub mod book_repository;
pub mod loan_repository;
pub mod member_repository;

pub use book_repository::BookRepository;
pub use loan_repository::LoanRepository;
pub use member_repository::MemberRepository;

/// ポート共通の Result型
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
