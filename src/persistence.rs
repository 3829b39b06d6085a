//! Flat-file persistence for the record store.
//!
//! Two plain-text resources, one record per line, comma separated, no header
//! and no escaping:
//!
//! ```text
//! members.txt   id,password,name
//! books.txt     no,title,author,borrowed,borrower
//! ```
//!
//! `borrowed` is `true` or `false`. An absent borrower is written as `null`;
//! the borrower field is only read back when `borrowed` is `true`, and then
//! verbatim, so `null` and the empty string remain valid member ids. Values
//! containing a comma cannot be represented.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    book::Book,
    book_state::BookState,
    config::LibraryConfig,
    error::{LibraryError, Result},
    member::Member,
};

/// Field separator used by both resources
pub const FIELD_DELIMITER: char = ',';

/// Token written in the borrower column of an unborrowed book
pub const ABSENT_BORROWER: &str = "null";

/// Number of fields in a member line
const MEMBER_FIELDS: usize = 3;

/// Number of fields in a book line
const BOOK_FIELDS: usize = 5;

/// Reads and writes members and books as delimited text files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatFileStore {
    /// Members resource
    members_path: PathBuf,
    /// Books resource
    books_path: PathBuf,
}

impl FlatFileStore {
    /// Store backed by the two given files
    pub fn new(members_path: impl Into<PathBuf>, books_path: impl Into<PathBuf>) -> Self {
        Self { members_path: members_path.into(), books_path: books_path.into() }
    }

    /// Store backed by the files named in `config`
    #[must_use]
    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::new(config.members_path(), config.books_path())
    }

    /// Members resource path
    #[must_use]
    pub fn members_path(&self) -> &Path {
        &self.members_path
    }

    /// Books resource path
    #[must_use]
    pub fn books_path(&self) -> &Path {
        &self.books_path
    }

    /// Overwrite both resources with the given collections
    ///
    /// Members are written first, then books. A failure part-way leaves
    /// whatever was already written in place.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Persistence` if either file cannot be created or written
    pub fn save(&self, members: &[Member], books: &[Book]) -> Result<()> {
        write_lines(&self.members_path, members.iter().map(encode_member))?;
        write_lines(&self.books_path, books.iter().map(encode_book))?;

        tracing::debug!(
            members = members.len(),
            books = books.len(),
            members_path = %self.members_path.display(),
            books_path = %self.books_path.display(),
            "saved records"
        );
        Ok(())
    }

    /// Read both resources
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Persistence` if either file cannot be opened or read,
    /// and `LibraryError::MalformedRecord` if a line has the wrong field count,
    /// a non-numeric book number, or an invalid borrowed flag
    pub fn load(&self) -> Result<(Vec<Member>, Vec<Book>)> {
        let member_text = read_file(&self.members_path)?;
        let book_text = read_file(&self.books_path)?;

        let members = records(&member_text)
            .map(|(line_no, line)| decode_member(&self.members_path, line_no, line))
            .collect::<Result<Vec<_>>>()?;
        let books = records(&book_text)
            .map(|(line_no, line)| decode_book(&self.books_path, line_no, line))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(members = members.len(), books = books.len(), "loaded records");
        Ok((members, books))
    }

    /// Create the data directory and empty resources where they do not exist yet
    ///
    /// Returns `true` if any file was created.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Persistence` if a directory or file cannot be created
    pub fn initialize(&self) -> Result<bool> {
        let mut created = false;
        for path in [&self.members_path, &self.books_path] {
            if path.exists() {
                continue;
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| LibraryError::persistence(parent, e))?;
            }
            File::create(path).map_err(|e| LibraryError::persistence(path, e))?;
            tracing::info!(path = %path.display(), "created empty resource");
            created = true;
        }
        Ok(created)
    }
}

/// Truncate `path` and write one line per item
fn write_lines(path: &Path, lines: impl Iterator<Item = String>) -> Result<()> {
    let mut file = File::create(path).map_err(|e| LibraryError::persistence(path, e))?;
    for line in lines {
        writeln!(file, "{line}").map_err(|e| LibraryError::persistence(path, e))?;
    }
    file.flush().map_err(|e| LibraryError::persistence(path, e))
}

/// Read a whole resource into memory
fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| LibraryError::persistence(path, e))
}

/// Non-blank lines paired with their 1-based line numbers
fn records(text: &str) -> impl Iterator<Item = (usize, &str)> {
    (1..).zip(text.lines()).filter(|(_, line)| !line.trim().is_empty())
}

/// `id,password,name`
fn encode_member(member: &Member) -> String {
    format!("{},{},{}", member.id(), member.password(), member.name())
}

/// `no,title,author,borrowed,borrower`
fn encode_book(book: &Book) -> String {
    format!(
        "{},{},{},{},{}",
        book.no(),
        book.title(),
        book.author(),
        book.is_borrowed(),
        book.borrower().unwrap_or(ABSENT_BORROWER)
    )
}

/// Split a line and check the field count
fn split_fields<'a>(
    path: &Path,
    line_no: usize,
    line: &'a str,
    expected: usize,
) -> Result<Vec<&'a str>> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() == expected {
        Ok(fields)
    } else {
        Err(LibraryError::malformed(
            path,
            line_no,
            format!("expected {expected} fields, found {}", fields.len()),
        ))
    }
}

/// Parse a members line
fn decode_member(path: &Path, line_no: usize, line: &str) -> Result<Member> {
    match split_fields(path, line_no, line, MEMBER_FIELDS)?.as_slice() {
        [id, password, name] => Ok(Member::new(*id, *password, *name)),
        _ => Err(LibraryError::malformed(path, line_no, "member line lost its fields")),
    }
}

/// Parse a books line
fn decode_book(path: &Path, line_no: usize, line: &str) -> Result<Book> {
    let fields = split_fields(path, line_no, line, BOOK_FIELDS)?;
    let [no, title, author, flag, holder] = fields.as_slice() else {
        return Err(LibraryError::malformed(path, line_no, "book line lost its fields"));
    };

    let no: u32 = no.parse().map_err(|e| {
        LibraryError::malformed(path, line_no, format!("invalid book number {no:?}: {e}"))
    })?;

    let state = match *flag {
        "false" => BookState::Available,
        "true" => BookState::Borrowed((*holder).to_string()),
        other => {
            return Err(LibraryError::malformed(
                path,
                line_no,
                format!("borrowed flag must be true or false, found {other:?}"),
            ));
        }
    };

    Ok(Book::with_state(no, *title, *author, state))
}
