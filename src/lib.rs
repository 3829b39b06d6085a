//! Single-user library circulation manager.
//!
//! This crate keeps member accounts and a book inventory in memory, enforces
//! registration, login and borrow/return rules through [`LibraryService`],
//! and round-trips both collections through two comma-delimited text files.

pub mod book;
pub mod book_state;
pub mod config;
pub mod error;
pub mod events;
pub mod member;
pub mod observers;
pub mod persistence;
pub mod service;
pub mod store;

pub use book::Book;
pub use book_state::BookState;
pub use config::LibraryConfig;
pub use error::{LibraryError, Result};
pub use events::LoanEvent;
pub use member::Member;
pub use observers::{LoanObserver, TransitionLogger};
pub use persistence::FlatFileStore;
pub use service::LibraryService;
pub use store::RecordStore;
