//! MySQL implementation of [`UserDao`].

use crate::dao::UserDao;
use crate::transaction::MySqlTransactionConnection;
use crate::DatabasePoolInterface;
use async_trait::async_trait;
use shaku::Component;
use soa_core::{SoaError, SoaResult, User, UserId};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

const SELECT_USERS: &str = r#"
    SELECT id, first_name, last_name
    FROM users
    ORDER BY id
"#;

/// MySQL user DAO.
///
/// Queries run on the connection of the current MySQL transaction when
/// called inside one, and on a pooled connection otherwise.
#[derive(Component, Clone)]
#[shaku(interface = UserDao)]
pub struct MySqlUserDaoImpl {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlUserDaoImpl {
    /// Creates a new MySQL user DAO.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[async_trait]
impl UserDao for MySqlUserDaoImpl {
    async fn get_users(&self) -> SoaResult<Vec<User>> {
        let query = sqlx::query_as::<_, UserRow>(SELECT_USERS);

        let rows = if let Some(connection) = MySqlTransactionConnection::current() {
            debug!("Querying all users in the current transaction");
            let mut guard = connection.lock().await;
            let tx = guard
                .as_mut()
                .ok_or_else(|| SoaError::transaction("Transaction completed before the query ran"))?;
            let rows = query.fetch_all(&mut **tx).await?;
            rows
        } else {
            debug!("Querying all users");
            query.fetch_all(self.pool.inner()).await?
        };

        Ok(rows.into_iter().map(User::from).collect())
    }
}

impl std::fmt::Debug for MySqlUserDaoImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserDaoImpl").finish_non_exhaustive()
    }
}
