use std::fmt;

use serde::Serialize;

/// A registered library member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Unique login id
    id: String,
    /// Plaintext password, compared verbatim on login
    #[serde(skip_serializing)]
    password: String,
    /// Display name
    name: String,
}

impl Member {
    /// Create a member from its three fields
    pub fn new(
        id: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), password: password.into(), name: name.into() }
    }

    /// Unique login id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Stored password
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-sensitive exact comparison against the stored password
    #[must_use]
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
