use std::fmt;

use crate::{
    book::Book,
    book_state::BookState,
    config::LibraryConfig,
    error::{LibraryError, Result},
    events::LoanEvent,
    member::Member,
    observers::{LoanObserver, TransitionLogger},
    persistence::FlatFileStore,
    store::RecordStore,
};

/// Owns the record store and enforces registration, login and loan rules
pub struct LibraryService {
    /// Member and book collections
    records: RecordStore,
    /// Backing files for `save` and `load`
    persistence: FlatFileStore,
    /// Id of the single privileged account
    admin_id: String,
    /// Registered loan transition observers
    observers: Vec<Box<dyn LoanObserver>>,
}

impl fmt::Debug for LibraryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryService")
            .field("members", &self.records.members().len())
            .field("books", &self.records.books().len())
            .field("persistence", &self.persistence)
            .field("admin_id", &self.admin_id)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl LibraryService {
    /// Create a service with an empty record store; call `load` before use
    #[must_use]
    pub fn new(config: &LibraryConfig) -> Self {
        Self::with_records(config, Vec::new(), Vec::new())
    }

    /// Create a service over already-built collections
    #[must_use]
    pub fn with_records(config: &LibraryConfig, members: Vec<Member>, books: Vec<Book>) -> Self {
        let mut service = Self {
            records: RecordStore::from_records(members, books),
            persistence: FlatFileStore::from_config(config),
            admin_id: config.admin_id.clone(),
            observers: Vec::new(),
        };
        service.register_observer(Box::new(TransitionLogger));
        service
    }

    /// Register an observer to be notified of loan transitions
    pub fn register_observer(&mut self, observer: Box<dyn LoanObserver>) {
        self.observers.push(observer);
    }

    /// Register a new member
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::DuplicateIdentifier` if the id is already taken
    pub fn register_member(&mut self, member: Member) -> Result<()> {
        if self.find_member_by_id(member.id()).is_some() {
            tracing::warn!(member_id = member.id(), "registration rejected: id in use");
            return Err(LibraryError::DuplicateIdentifier(member.id().to_string()));
        }

        tracing::info!(member_id = member.id(), "member registered");
        self.records.push_member(member);
        Ok(())
    }

    /// Authenticate a member and return a copy of their record
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::InvalidCredentials` if the id is unknown or the
    /// password differs
    pub fn login(&self, id: &str, password: &str) -> Result<Member> {
        match self.find_member_by_id(id) {
            Some(member) if member.password_matches(password) => {
                tracing::info!(member_id = id, "login succeeded");
                Ok(member.clone())
            }
            _ => {
                tracing::warn!(member_id = id, "login rejected");
                Err(LibraryError::InvalidCredentials)
            }
        }
    }

    /// Whether `member` is the privileged account
    #[must_use]
    pub fn is_privileged(&self, member: &Member) -> bool {
        member.id() == self.admin_id
    }

    /// All members in registration order
    #[must_use]
    pub fn members(&self) -> &[Member] {
        self.records.members()
    }

    /// All books in load order
    #[must_use]
    pub fn get_all_books(&self) -> &[Book] {
        self.records.books()
    }

    /// Books whose title contains `keyword`, case-sensitively
    #[must_use]
    pub fn search_books(&self, keyword: &str) -> Vec<&Book> {
        self.records.books().iter().filter(|b| b.title().contains(keyword)).collect()
    }

    /// Books currently borrowed by `member_id`
    #[must_use]
    pub fn get_my_borrowed_books(&self, member_id: &str) -> Vec<&Book> {
        self.records.books().iter().filter(|b| b.borrower() == Some(member_id)).collect()
    }

    /// Lend a book to a member
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NotFound` if no book has `book_no`, and
    /// `LibraryError::AlreadyBorrowed` if the book is already out
    pub fn borrow_book(&mut self, book_no: u32, member_id: &str) -> Result<()> {
        let Some(book) = self.records.find_book_by_no_mut(book_no) else {
            tracing::warn!(book_no, member_id, "borrow rejected: no such book");
            return Err(LibraryError::NotFound(book_no));
        };
        if book.is_borrowed() {
            tracing::warn!(book_no, member_id, "borrow rejected: already borrowed");
            return Err(LibraryError::AlreadyBorrowed(book_no));
        }

        let to = BookState::Borrowed(member_id.to_string());
        let from = book.set_state(to.clone());
        tracing::info!(book_no, member_id, "book borrowed");
        self.notify(book_no, &from, &to, &LoanEvent::Borrow(member_id.to_string()));
        Ok(())
    }

    /// Take a book back from the member who borrowed it
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NotFound` if no book has `book_no`,
    /// `LibraryError::NotBorrowed` if the book is on the shelf, and
    /// `LibraryError::BorrowerMismatch` if another member holds it
    pub fn return_book(&mut self, book_no: u32, member_id: &str) -> Result<()> {
        let Some(book) = self.records.find_book_by_no_mut(book_no) else {
            tracing::warn!(book_no, member_id, "return rejected: no such book");
            return Err(LibraryError::NotFound(book_no));
        };
        match book.borrower() {
            None => {
                tracing::warn!(book_no, member_id, "return rejected: not borrowed");
                return Err(LibraryError::NotBorrowed(book_no));
            }
            Some(holder) if holder != member_id => {
                tracing::warn!(book_no, member_id, holder, "return rejected: borrower mismatch");
                return Err(LibraryError::BorrowerMismatch {
                    no: book_no,
                    member_id: member_id.to_string(),
                });
            }
            Some(_) => {}
        }

        let from = book.set_state(BookState::Available);
        tracing::info!(book_no, member_id, "book returned");
        let event = LoanEvent::Return(member_id.to_string());
        self.notify(book_no, &from, &BookState::Available, &event);
        Ok(())
    }

    /// Write members and books to the backing files
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Persistence` on any I/O failure; in-memory state is untouched
    pub fn save(&self) -> Result<()> {
        self.persistence.save(self.records.members(), self.records.books())?;
        tracing::info!(
            members = self.records.members().len(),
            books = self.records.books().len(),
            "records saved"
        );
        Ok(())
    }

    /// Replace the in-memory collections with the contents of the backing files
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Persistence` if a file is missing or unreadable and
    /// `LibraryError::MalformedRecord` if a line cannot be decoded. On failure the
    /// current collections are kept.
    pub fn load(&mut self) -> Result<()> {
        let (members, books) = self.persistence.load()?;
        tracing::info!(members = members.len(), books = books.len(), "records loaded");
        self.records.replace(members, books);
        Ok(())
    }

    /// Create empty backing files where none exist yet
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Persistence` if a file or directory cannot be created
    pub fn initialize_storage(&self) -> Result<bool> {
        self.persistence.initialize()
    }

    /// Member with this id, if registered
    fn find_member_by_id(&self, id: &str) -> Option<&Member> {
        self.records.find_member_by_id(id)
    }

    /// Tell every observer about a completed transition
    fn notify(&self, book_no: u32, from: &BookState, to: &BookState, event: &LoanEvent) {
        for observer in &self.observers {
            observer.on_loan_change(book_no, from, to, event);
        }
    }
}

#[cfg(test)]
mod tests;
