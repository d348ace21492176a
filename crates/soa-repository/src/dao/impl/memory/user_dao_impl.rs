//! In-memory implementation of [`UserDao`].

use crate::dao::UserDao;
use async_trait::async_trait;
use shaku::Component;
use soa_core::{SoaResult, User};
use tracing::debug;

/// User DAO backed by a fixed, ordered list of users.
///
/// The list is supplied at construction and never mutated, so every call
/// returns the same users in insertion order.
#[derive(Component, Clone, Default)]
#[shaku(interface = UserDao)]
pub struct InMemoryUserDao {
    users: Vec<User>,
}

impl InMemoryUserDao {
    /// Creates a DAO holding `users` in the given order.
    #[must_use]
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Returns the number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if no users are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDao for InMemoryUserDao {
    async fn get_users(&self) -> SoaResult<Vec<User>> {
        debug!("Reading {} users from memory", self.users.len());
        Ok(self.users.clone())
    }
}

impl std::fmt::Debug for InMemoryUserDao {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryUserDao")
            .field("users", &self.users.len())
            .finish()
    }
}
