//! User service implementations.

use crate::transactional::{alert_definition, get_users_definition};
use crate::user_service::{UserService, ALERT_BANNER, GET_USERS_BANNER};
use async_trait::async_trait;
use shaku::Component;
use soa_core::telemetry::DIAGNOSTIC_TARGET;
use soa_core::{in_transaction, SoaResult, TransactionManager, User};
use soa_repository::UserDao;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

async fn fetch_users<D: UserDao + ?Sized>(user_dao: &D) -> SoaResult<Vec<User>> {
    info!(target: DIAGNOSTIC_TARGET, "{}", GET_USERS_BANNER);
    debug!("Delegating to UserDao::get_users");
    user_dao.get_users().await
}

fn raise_alert() {
    info!(target: DIAGNOSTIC_TARGET, "{}", ALERT_BANNER);
}

/// Generic user service implementation (non-DI).
///
/// Holds no transaction logic; wrap it in [`crate::Transactional`] to get a
/// transaction per call.
pub struct UserServiceImpl<D: UserDao + ?Sized> {
    user_dao: Arc<D>,
}

impl<D: UserDao + ?Sized> UserServiceImpl<D> {
    /// Creates a new user service over `user_dao`.
    pub fn new(user_dao: Arc<D>) -> Self {
        Self { user_dao }
    }
}

#[async_trait]
impl<D: UserDao + ?Sized + 'static> UserService for UserServiceImpl<D> {
    async fn get_users(&self) -> SoaResult<Vec<User>> {
        fetch_users(self.user_dao.as_ref()).await
    }

    async fn alert(&self) -> SoaResult<()> {
        raise_alert();
        Ok(())
    }
}

impl<D: UserDao + ?Sized> std::fmt::Debug for UserServiceImpl<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl").finish_non_exhaustive()
    }
}

/// Concrete user service component for Shaku DI.
///
/// Receives its DAO and transaction manager by injection and opens one
/// transaction per call.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceComponent {
    #[shaku(inject)]
    user_dao: Arc<dyn UserDao>,
    #[shaku(inject)]
    transaction_manager: Arc<dyn TransactionManager>,
    transaction_timeout: Option<Duration>,
}

#[async_trait]
impl UserService for UserServiceComponent {
    async fn get_users(&self) -> SoaResult<Vec<User>> {
        let definition = get_users_definition(self.transaction_timeout);
        in_transaction(self.transaction_manager.as_ref(), &definition, || {
            fetch_users(self.user_dao.as_ref())
        })
        .await
    }

    async fn alert(&self) -> SoaResult<()> {
        let definition = alert_definition(self.transaction_timeout);
        in_transaction(self.transaction_manager.as_ref(), &definition, || async {
            raise_alert();
            Ok(())
        })
        .await
    }
}

impl std::fmt::Debug for UserServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceComponent")
            .field("transaction_timeout", &self.transaction_timeout)
            .finish_non_exhaustive()
    }
}
