//! Transaction boundary around a [`UserService`].

use crate::user_service::UserService;
use async_trait::async_trait;
use soa_core::{in_transaction, SoaResult, TransactionDefinition, TransactionManager, User};
use std::sync::Arc;
use std::time::Duration;

/// Transaction name used for `get_users` calls.
pub const GET_USERS_TRANSACTION: &str = "UserService.get_users";

/// Transaction name used for `alert` calls.
pub const ALERT_TRANSACTION: &str = "UserService.alert";

pub(crate) fn get_users_definition(timeout: Option<Duration>) -> TransactionDefinition {
    TransactionDefinition::new(GET_USERS_TRANSACTION)
        .read_only()
        .with_timeout(timeout)
}

pub(crate) fn alert_definition(timeout: Option<Duration>) -> TransactionDefinition {
    TransactionDefinition::new(ALERT_TRANSACTION).with_timeout(timeout)
}

/// Runs every call of the wrapped service in its own transaction.
///
/// ```text
/// Transactional::new(Arc::new(UserServiceImpl::new(dao)), manager)
/// ```
pub struct Transactional<S: ?Sized> {
    inner: Arc<S>,
    transaction_manager: Arc<dyn TransactionManager>,
    timeout: Option<Duration>,
}

impl<S: UserService + ?Sized> Transactional<S> {
    /// Wraps `inner` so each call runs in a transaction from `transaction_manager`.
    pub fn new(inner: Arc<S>, transaction_manager: Arc<dyn TransactionManager>) -> Self {
        Self {
            inner,
            transaction_manager,
            timeout: None,
        }
    }

    /// Bounds every call by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl<S: UserService + ?Sized + 'static> UserService for Transactional<S> {
    async fn get_users(&self) -> SoaResult<Vec<User>> {
        let definition = get_users_definition(self.timeout);
        in_transaction(self.transaction_manager.as_ref(), &definition, || {
            self.inner.get_users()
        })
        .await
    }

    async fn alert(&self) -> SoaResult<()> {
        let definition = alert_definition(self.timeout);
        in_transaction(self.transaction_manager.as_ref(), &definition, || self.inner.alert()).await
    }
}

impl<S: ?Sized> std::fmt::Debug for Transactional<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transactional")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
