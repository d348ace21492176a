//! UserDao trait — low-level user data access abstraction.
//!
//! Implementations connect directly to a single data source and own the
//! creation and persistence of [`User`] records.

use async_trait::async_trait;
use soa_core::{Interface, SoaResult, User};

/// Low-level user data access object.
#[async_trait]
pub trait UserDao: Interface + Send + Sync {
    /// Returns all users, in the store's natural order.
    ///
    /// An empty store yields an empty `Vec`, not an error.
    async fn get_users(&self) -> SoaResult<Vec<User>>;
}
