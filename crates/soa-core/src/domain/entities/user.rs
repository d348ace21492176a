//! User entity.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// A user record as stored by the DAO layer.
///
/// The service layer treats this as an opaque value: it is returned to
/// callers exactly as the DAO produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier assigned by the backing store.
    pub id: UserId,

    /// User's first name.
    pub first_name: String,

    /// User's last name.
    pub last_name: String,
}

impl User {
    /// Creates a new user record.
    #[must_use]
    pub fn new(id: impl Into<UserId>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Returns "first last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
