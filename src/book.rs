use std::fmt;

use serde::Serialize;

use crate::book_state::BookState;

/// A book in the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Unique book number
    no: u32,
    /// Title, matched by keyword search
    title: String,
    /// Author
    author: String,
    /// Current lend state
    state: BookState,
}

impl Book {
    /// Create an unborrowed book
    pub fn new(no: u32, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self::with_state(no, title, author, BookState::Available)
    }

    /// Create a book in an explicit lend state
    pub fn with_state(
        no: u32,
        title: impl Into<String>,
        author: impl Into<String>,
        state: BookState,
    ) -> Self {
        Self { no, title: title.into(), author: author.into(), state }
    }

    /// Unique book number
    #[must_use]
    pub fn no(&self) -> u32 {
        self.no
    }

    /// Title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Author
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Current lend state
    #[must_use]
    pub fn state(&self) -> &BookState {
        &self.state
    }

    /// Whether the book is out on loan
    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        self.state.is_borrowed()
    }

    /// Id of the borrowing member, present iff the book is borrowed
    #[must_use]
    pub fn borrower(&self) -> Option<&str> {
        self.state.borrower()
    }

    /// Replace the lend state, returning the previous one
    pub(crate) fn set_state(&mut self, state: BookState) -> BookState {
        std::mem::replace(&mut self.state, state)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.get_description();
        write!(f, "[{}] {} / {} ({state})", self.no, self.title, self.author)
    }
}
