use serde::{Deserialize, Serialize};

/// Events that move a book between lend states
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum LoanEvent {
    /// A member borrowed the book
    Borrow(String),
    /// A member returned the book
    Return(String),
}

impl LoanEvent {
    /// Id of the member who triggered the event
    #[must_use]
    pub fn member_id(&self) -> &str {
        match self {
            Self::Borrow(member_id) | Self::Return(member_id) => member_id,
        }
    }
}
