#![allow(clippy::expect_used)]

use std::{cell::RefCell, fs, rc::Rc};

use crate::{
    book::Book,
    book_state::BookState,
    config::LibraryConfig,
    error::LibraryError,
    events::LoanEvent,
    member::Member,
    observers::LoanObserver,
    service::LibraryService,
};

/// Transitions captured by `RecordingObserver`
type Recorded = Rc<RefCell<Vec<(u32, BookState, BookState, LoanEvent)>>>;

/// Observer that keeps every transition it sees
struct RecordingObserver(Recorded);

impl LoanObserver for RecordingObserver {
    fn on_loan_change(&self, book_no: u32, from: &BookState, to: &BookState, event: &LoanEvent) {
        self.0.borrow_mut().push((book_no, from.clone(), to.clone(), event.clone()));
    }
}

/// Helper function to set up a service with two members and three books
fn setup_test_service() -> LibraryService {
    LibraryService::with_records(
        &LibraryConfig::default(),
        vec![Member::new("alice", "pw-a", "Alice"), Member::new("bob", "pw-b", "Bob")],
        vec![
            Book::new(1, "Go in Action", "Kennedy"),
            Book::new(2, "Programming Rust", "Blandy"),
            Book::new(3, "The Rust Programming Language", "Klabnik"),
        ],
    )
}

#[test]
fn test_register_member() {
    let mut service = setup_test_service();
    let result = service.register_member(Member::new("carol", "pw-c", "Carol"));
    assert!(result.is_ok());
    assert_eq!(service.members().len(), 3);
}

#[test]
fn test_register_duplicate_id_leaves_members_unchanged() {
    let mut service = setup_test_service();
    let result = service.register_member(Member::new("alice", "other", "Another Alice"));
    assert!(matches!(result, Err(LibraryError::DuplicateIdentifier(ref id)) if id == "alice"));
    assert_eq!(service.members().len(), 2);
    assert_eq!(service.login("alice", "pw-a").expect("original kept").name(), "Alice");
}

#[test]
fn test_login() {
    let service = setup_test_service();
    let member = service.login("bob", "pw-b").expect("valid credentials");
    assert_eq!(member, Member::new("bob", "pw-b", "Bob"));
}

#[test]
fn test_login_failures_are_indistinguishable() {
    let service = setup_test_service();
    let unknown = service.login("mallory", "pw-a");
    let wrong = service.login("alice", "PW-A");
    assert!(matches!(unknown, Err(LibraryError::InvalidCredentials)));
    assert!(matches!(wrong, Err(LibraryError::InvalidCredentials)));
}

#[test]
fn test_is_privileged() {
    let mut service = setup_test_service();
    service.register_member(Member::new("admin", "root", "Librarian")).expect("register admin");
    let admin = service.login("admin", "root").expect("admin login");
    let alice = service.login("alice", "pw-a").expect("alice login");
    assert!(service.is_privileged(&admin));
    assert!(!service.is_privileged(&alice));
}

#[test]
fn test_get_all_books_keeps_order() {
    let service = setup_test_service();
    let numbers: Vec<u32> = service.get_all_books().iter().map(Book::no).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn test_search_books() {
    let service = setup_test_service();

    let rust: Vec<u32> = service.search_books("Rust").iter().map(|b| b.no()).collect();
    assert_eq!(rust, vec![2, 3]);

    assert!(service.search_books("rust").is_empty());
    assert!(service.search_books("Haskell").is_empty());
    assert_eq!(service.search_books("").len(), 3);
}

#[test]
fn test_get_my_borrowed_books() {
    let mut service = setup_test_service();
    assert!(service.get_my_borrowed_books("alice").is_empty());

    service.borrow_book(3, "alice").expect("borrow 3");
    service.borrow_book(2, "bob").expect("borrow 2");
    service.borrow_book(1, "alice").expect("borrow 1");

    let mine: Vec<u32> = service.get_my_borrowed_books("alice").iter().map(|b| b.no()).collect();
    assert_eq!(mine, vec![1, 3]);
}

#[test]
fn test_borrow_unknown_book() {
    let mut service = setup_test_service();
    let result = service.borrow_book(99, "alice");
    assert!(matches!(result, Err(LibraryError::NotFound(99))));
}

#[test]
fn test_return_unborrowed_book() {
    let mut service = setup_test_service();
    let result = service.return_book(1, "alice");
    assert!(matches!(result, Err(LibraryError::NotBorrowed(1))));
    assert!(matches!(service.return_book(42, "alice"), Err(LibraryError::NotFound(42))));
}

#[test]
fn test_borrow_and_return_scenario() {
    let mut service = LibraryService::with_records(
        &LibraryConfig::default(),
        Vec::new(),
        vec![Book::new(1, "Go in Action", "Kennedy")],
    );

    service.borrow_book(1, "alice").expect("first borrow");
    let book = service.get_all_books().first().expect("one book");
    assert_eq!(book.borrower(), Some("alice"));

    let result = service.borrow_book(1, "bob");
    assert!(matches!(result, Err(LibraryError::AlreadyBorrowed(1))));

    let result = service.return_book(1, "bob");
    assert!(matches!(
        result,
        Err(LibraryError::BorrowerMismatch { no: 1, ref member_id }) if member_id == "bob"
    ));
    let book = service.get_all_books().first().expect("one book");
    assert_eq!(book.borrower(), Some("alice"));

    service.return_book(1, "alice").expect("return by borrower");
    let book = service.get_all_books().first().expect("one book");
    assert!(!book.is_borrowed());
    assert_eq!(book.borrower(), None);
}

#[test]
fn test_same_member_cannot_borrow_twice() {
    let mut service = setup_test_service();
    service.borrow_book(2, "alice").expect("borrow");
    assert!(matches!(service.borrow_book(2, "alice"), Err(LibraryError::AlreadyBorrowed(2))));
}

#[test]
#[allow(clippy::indexing_slicing)]
fn test_observers_see_successful_transitions_only() {
    let mut service = setup_test_service();
    let recorded: Recorded = Rc::default();
    service.register_observer(Box::new(RecordingObserver(Rc::clone(&recorded))));

    service.borrow_book(1, "alice").expect("borrow");
    drop(service.borrow_book(1, "bob"));
    drop(service.return_book(1, "bob"));
    service.return_book(1, "alice").expect("return");

    let recorded = recorded.borrow();
    assert_eq!(recorded.len(), 2);
    assert_eq!(
        recorded[0],
        (
            1,
            BookState::Available,
            BookState::Borrowed("alice".to_string()),
            LoanEvent::Borrow("alice".to_string())
        )
    );
    assert_eq!(
        recorded[1],
        (
            1,
            BookState::Borrowed("alice".to_string()),
            BookState::Available,
            LoanEvent::Return("alice".to_string())
        )
    );
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = LibraryConfig::with_data_dir(dir.path());

    let mut service = LibraryService::with_records(
        &config,
        vec![Member::new("alice", "pw-a", "Alice")],
        vec![Book::new(1, "Go in Action", "Kennedy"), Book::new(2, "Programming Rust", "Blandy")],
    );
    service.register_member(Member::new("bob", "pw-b", "Bob")).expect("register");
    service.borrow_book(2, "bob").expect("borrow");
    service.save().expect("save");

    let mut reloaded = LibraryService::new(&config);
    reloaded.load().expect("load");

    assert_eq!(reloaded.members(), service.members());
    assert_eq!(reloaded.get_all_books(), service.get_all_books());
    reloaded.return_book(2, "bob").expect("borrower survives reload");
}

#[test]
fn test_load_replaces_existing_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = LibraryConfig::with_data_dir(dir.path());
    fs::write(config.members_path(), "zed,pw,Zed\n").expect("members");
    fs::write(config.books_path(), "7,Dune,Herbert,true,zed\n").expect("books");

    let mut service = LibraryService::with_records(
        &config,
        vec![Member::new("alice", "pw-a", "Alice")],
        vec![Book::new(1, "Go in Action", "Kennedy")],
    );
    service.load().expect("load");

    assert_eq!(service.members(), [Member::new("zed", "pw", "Zed")].as_slice());
    assert_eq!(
        service.get_all_books(),
        [Book::with_state(7, "Dune", "Herbert", BookState::Borrowed("zed".to_string()))].as_slice()
    );
}

#[test]
fn test_failed_load_keeps_current_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = LibraryConfig::with_data_dir(dir.path());
    fs::write(config.members_path(), "zed,pw,Zed\n").expect("members");

    let mut service = setup_test_service_at(&config);
    let result = service.load();

    assert!(matches!(result, Err(LibraryError::Persistence { .. })));
    assert_eq!(service.members().len(), 2);
    assert_eq!(service.get_all_books().len(), 3);
}

#[test]
fn test_malformed_books_keep_current_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = LibraryConfig::with_data_dir(dir.path());
    fs::write(config.members_path(), "zed,pw,Zed\n").expect("members");
    fs::write(config.books_path(), "7,Dune,Herbert,false,null\n8,Emma,Austen\n").expect("books");

    let mut service = setup_test_service_at(&config);
    service.borrow_book(2, "bob").expect("borrow");
    let members_before = service.members().to_vec();
    let books_before = service.get_all_books().to_vec();

    let result = service.load();

    assert!(matches!(result, Err(LibraryError::MalformedRecord { line: 2, .. })));
    assert_eq!(service.members(), members_before.as_slice());
    assert_eq!(service.get_all_books(), books_before.as_slice());
    assert!(service.login("zed", "pw").is_err());
}

#[test]
fn test_null_member_id_survives_save_and_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = LibraryConfig::with_data_dir(dir.path());

    let mut service = setup_test_service_at(&config);
    service.register_member(Member::new("null", "pw", "Name")).expect("register null");
    service.borrow_book(1, "null").expect("borrow as null");
    service.save().expect("save");

    let mut reloaded = LibraryService::new(&config);
    reloaded.load().expect("load");

    assert_eq!(reloaded.get_all_books(), service.get_all_books());
    let mine: Vec<u32> = reloaded.get_my_borrowed_books("null").iter().map(|b| b.no()).collect();
    assert_eq!(mine, vec![1]);
    reloaded.return_book(1, "null").expect("null returns its book");
}

#[test]
fn test_failed_save_keeps_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = LibraryConfig::with_data_dir(dir.path().join("missing-dir"));

    let mut service = setup_test_service_at(&config);
    service.borrow_book(1, "alice").expect("borrow");
    let result = service.save();

    assert!(matches!(result, Err(LibraryError::Persistence { .. })));
    assert_eq!(service.get_my_borrowed_books("alice").len(), 1);
}

/// Same records as `setup_test_service`, persisted under `config`
fn setup_test_service_at(config: &LibraryConfig) -> LibraryService {
    let template = setup_test_service();
    LibraryService::with_records(
        config,
        template.members().to_vec(),
        template.get_all_books().to_vec(),
    )
}
