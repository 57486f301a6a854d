mod catalog_service;
mod errors;

pub use catalog_service::{
    create_book, create_member, delete_book, delete_member, find_book, find_member, list_books,
    list_members, rename_member, update_book,
};
pub use errors::{CatalogError, RecordKey, Result};
