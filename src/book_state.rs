use serde::{Deserialize, Serialize};

/// Lend state of a single book
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum BookState {
    /// Book is on the shelf and may be borrowed
    #[default]
    Available,
    /// Book is borrowed by the member with this id
    Borrowed(String),
}

impl BookState {
    /// Whether the book is currently out on loan
    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }

    /// Id of the member holding the book, if any
    #[must_use]
    pub fn borrower(&self) -> Option<&str> {
        match self {
            Self::Available => None,
            Self::Borrowed(member_id) => Some(member_id),
        }
    }

    /// Get a human-readable description of the current state
    #[must_use]
    pub fn get_description(&self) -> String {
        match self {
            Self::Available => "available".to_string(),
            Self::Borrowed(member_id) => format!("borrowed by {member_id}"),
        }
    }
}
