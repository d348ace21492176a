//! MySQL-backed transaction manager.

use crate::DatabasePoolInterface;
use async_trait::async_trait;
use shaku::Component;
use soa_core::{
    current_transaction_resource, SoaError, SoaResult, Transaction, TransactionDefinition, TransactionId,
    TransactionManager, TransactionResource,
};
use sqlx::MySql;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Opens one MySQL transaction per unit of work.
#[derive(Component, Clone)]
#[shaku(interface = TransactionManager)]
pub struct MySqlTransactionManager {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlTransactionManager {
    /// Creates a new MySQL transaction manager.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for MySqlTransactionManager {
    async fn begin(&self, definition: &TransactionDefinition) -> SoaResult<Box<dyn Transaction>> {
        let inner = self
            .pool
            .inner()
            .begin()
            .await
            .map_err(|e| SoaError::Transaction(format!("Failed to begin {}: {}", definition.name, e)))?;

        let tx = MySqlTransaction {
            id: TransactionId::new(),
            name: definition.name.clone(),
            connection: Arc::new(MySqlTransactionConnection {
                inner: Mutex::new(Some(inner)),
            }),
        };

        // MySQL fixes the access mode before BEGIN, so read_only is advisory here.
        debug!(
            transaction_id = %tx.id,
            name = %tx.name,
            read_only = definition.read_only,
            "MySQL transaction started"
        );
        Ok(Box::new(tx))
    }
}

impl std::fmt::Debug for MySqlTransactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlTransactionManager").finish_non_exhaustive()
    }
}

/// The connection of an open MySQL transaction, shared with the DAOs that
/// run inside it.
pub(crate) struct MySqlTransactionConnection {
    inner: Mutex<Option<sqlx::Transaction<'static, MySql>>>,
}

impl MySqlTransactionConnection {
    /// Returns the connection of the MySQL transaction the current task runs
    /// in, if any.
    pub(crate) fn current() -> Option<Arc<Self>> {
        current_transaction_resource()?.downcast::<Self>().ok()
    }

    /// Locks the connection. `None` inside the guard means the transaction
    /// has already completed.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, Option<sqlx::Transaction<'static, MySql>>> {
        self.inner.lock().await
    }
}

/// An open MySQL transaction. SQLx rolls it back if it is dropped unfinished.
struct MySqlTransaction {
    id: TransactionId,
    name: String,
    connection: Arc<MySqlTransactionConnection>,
}

impl MySqlTransaction {
    async fn take(&self, action: &str) -> SoaResult<sqlx::Transaction<'static, MySql>> {
        self.connection.lock().await.take().ok_or_else(|| {
            SoaError::Transaction(format!(
                "cannot {} transaction {}: already completed",
                action, self.id
            ))
        })
    }
}

#[async_trait]
impl Transaction for MySqlTransaction {
    fn id(&self) -> TransactionId {
        self.id
    }

    async fn commit(&mut self) -> SoaResult<()> {
        let tx = self.take("commit").await?;
        tx.commit()
            .await
            .map_err(|e| SoaError::Transaction(format!("Commit of {} failed: {}", self.name, e)))?;
        debug!(transaction_id = %self.id, name = %self.name, "MySQL transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> SoaResult<()> {
        let tx = self.take("roll back").await?;
        tx.rollback()
            .await
            .map_err(|e| SoaError::Transaction(format!("Rollback of {} failed: {}", self.name, e)))?;
        debug!(transaction_id = %self.id, name = %self.name, "MySQL transaction rolled back");
        Ok(())
    }

    fn resource(&self) -> Option<TransactionResource> {
        Some(Arc::clone(&self.connection) as TransactionResource)
    }
}
