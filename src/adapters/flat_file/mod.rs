mod records;
mod store;

pub use store::FlatFileStore;
