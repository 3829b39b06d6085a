//! Where the library keeps its files and which account is privileged.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, Result};

/// Default id of the privileged account
pub const DEFAULT_ADMIN_ID: &str = "admin";

/// Library configuration, loadable from a JSON file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory holding both record files
    pub data_dir: PathBuf,
    /// File name of the members resource
    pub members_file: String,
    /// File name of the books resource
    pub books_file: String,
    /// Id of the single privileged account
    pub admin_id: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            members_file: "members.txt".to_string(),
            books_file: "books.txt".to_string(),
            admin_id: DEFAULT_ADMIN_ID.to_string(),
        }
    }
}

impl LibraryConfig {
    /// Default configuration rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), ..Self::default() }
    }

    /// Read a configuration from a JSON file; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Config` if the file cannot be read or is not valid JSON
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            LibraryError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| LibraryError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Full path of the members resource
    #[must_use]
    pub fn members_path(&self) -> PathBuf {
        self.data_dir.join(&self.members_file)
    }

    /// Full path of the books resource
    #[must_use]
    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(&self.books_file)
    }
}
