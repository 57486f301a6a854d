pub mod flat_file;
pub mod memory;
pub mod sqlite;

pub use flat_file::FlatFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
