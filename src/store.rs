use crate::{book::Book, member::Member};

/// In-memory member and book collections, kept in insertion/load order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    /// Registered members
    members: Vec<Member>,
    /// Book inventory
    books: Vec<Book>,
}

impl RecordStore {
    /// Build a store from already-ordered collections
    #[must_use]
    pub fn from_records(members: Vec<Member>, books: Vec<Book>) -> Self {
        Self { members, books }
    }

    /// All members
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// All books
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Append a member without any uniqueness check
    pub fn push_member(&mut self, member: Member) {
        self.members.push(member);
    }

    /// First member with this id
    #[must_use]
    pub fn find_member_by_id(&self, id: &str) -> Option<&Member> {
        let found = self.members.iter().find(|m| m.id() == id);
        tracing::debug!(member_id = id, found = found.is_some(), "member lookup");
        found
    }

    /// First book with this number
    #[must_use]
    pub fn find_book_by_no(&self, no: u32) -> Option<&Book> {
        let found = self.books.iter().find(|b| b.no() == no);
        tracing::debug!(book_no = no, found = found.is_some(), "book lookup");
        found
    }

    /// First book with this number, mutably
    pub fn find_book_by_no_mut(&mut self, no: u32) -> Option<&mut Book> {
        let found = self.books.iter_mut().find(|b| b.no() == no);
        tracing::debug!(book_no = no, found = found.is_some(), "book lookup");
        found
    }

    /// Swap in freshly loaded collections
    pub fn replace(&mut self, members: Vec<Member>, books: Vec<Book>) {
        self.members = members;
        self.books = books;
    }
}
