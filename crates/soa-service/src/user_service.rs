//! User service trait definition.

use async_trait::async_trait;
use soa_core::{Interface, SoaResult, User};

/// Diagnostic line emitted on every `get_users` call, before the DAO is hit.
pub const GET_USERS_BANNER: &str = "----------- GET USER -----------";

/// Diagnostic line emitted on every `alert` call.
pub const ALERT_BANNER: &str = "----------- ALERT -----------";

/// User service trait.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Lists all users exactly as the DAO returns them.
    async fn get_users(&self) -> SoaResult<Vec<User>>;

    /// Emits the alert diagnostic. Does nothing else.
    ///
    /// The result only reports failures of the surrounding transaction.
    async fn alert(&self) -> SoaResult<()>;
}
