//! Explicit transaction boundary.
//!
//! Callers open a transaction through a [`TransactionManager`], run their
//! work, and then commit or roll back depending on the outcome. The
//! [`in_transaction`] helper does all three steps:
//!
//! ```text
//! begin ──► work ──► Ok  ──► commit   ──► Ok(value)
//!                └─► Err ──► rollback ──► Err(original error)
//! ```
//!
//! While the work runs, the transaction's [`TransactionResource`] is
//! available to it through [`current_transaction_resource`], so a DAO can
//! issue its queries on the connection the transaction holds.

use crate::{Component, Interface, SoaError, SoaResult, TransactionId};
use async_trait::async_trait;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Describes the transaction a unit of work should run in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDefinition {
    /// Name used in logs, usually `Type.method`.
    pub name: String,
    /// Hint that the work performs no writes.
    pub read_only: bool,
    /// Upper bound on how long the work may run before it is rolled back.
    pub timeout: Option<Duration>,
}

impl TransactionDefinition {
    /// Creates a read-write definition with no timeout.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            read_only: false,
            timeout: None,
        }
    }

    /// Marks the transaction as read-only.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Sets the timeout, or clears it when `None`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Type-erased handle to whatever an open transaction runs on.
///
/// Backends downcast it to their own connection type.
pub type TransactionResource = Arc<dyn Any + Send + Sync>;

tokio::task_local! {
    static CURRENT_RESOURCE: Option<TransactionResource>;
}

/// Returns the resource of the transaction the current task is running in,
/// if any.
#[must_use]
pub fn current_transaction_resource() -> Option<TransactionResource> {
    CURRENT_RESOURCE.try_with(Clone::clone).ok().flatten()
}

/// An open transaction.
///
/// Implementations must roll back when dropped without `commit` having
/// succeeded. Completing a transaction twice is an error.
#[async_trait]
pub trait Transaction: Send {
    /// Returns the transaction ID.
    fn id(&self) -> TransactionId;

    /// Commits the transaction.
    async fn commit(&mut self) -> SoaResult<()>;

    /// Rolls the transaction back.
    async fn rollback(&mut self) -> SoaResult<()>;

    /// Returns the resource work should run on, if the backend has one.
    fn resource(&self) -> Option<TransactionResource> {
        None
    }
}

/// Opens transactions against some transactional resource.
#[async_trait]
pub trait TransactionManager: Interface + Send + Sync {
    /// Begins a new transaction.
    async fn begin(&self, definition: &TransactionDefinition) -> SoaResult<Box<dyn Transaction>>;
}

/// Runs `work` inside a transaction opened on `manager`.
///
/// - If `begin` fails, `work` is never run and the error is returned.
/// - If `work` succeeds, the transaction is committed; a commit failure is
///   returned instead of the value.
/// - If `work` fails, the transaction is rolled back and the original error
///   is returned unchanged. A rollback failure is only logged.
/// - If `definition.timeout` elapses first, the transaction is rolled back
///   and [`SoaError::Timeout`] is returned.
///
/// `work` runs with the transaction's resource visible through
/// [`current_transaction_resource`].
pub async fn in_transaction<T, F, Fut>(
    manager: &dyn TransactionManager,
    definition: &TransactionDefinition,
    work: F,
) -> SoaResult<T>
where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = SoaResult<T>> + Send,
    T: Send,
{
    let mut tx = manager.begin(definition).await?;
    let tx_id = tx.id();
    let scoped = CURRENT_RESOURCE.scope(tx.resource(), work());

    let outcome = match definition.timeout {
        Some(limit) => match tokio::time::timeout(limit, scoped).await {
            Ok(result) => result,
            Err(_) => {
                warn!(transaction_id = %tx_id, name = %definition.name, ?limit, "Transaction timed out");
                Err(SoaError::Timeout(definition.name.clone()))
            }
        },
        None => scoped.await,
    };

    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(
                    transaction_id = %tx_id,
                    name = %definition.name,
                    error = %rollback_err,
                    "Rollback failed; returning original error"
                );
            }
            Err(err)
        }
    }
}

/// Transaction manager with no underlying resource.
///
/// Used with the in-memory DAO: it only tracks and logs transaction
/// lifecycles.
#[derive(Component, Default)]
#[shaku(interface = TransactionManager)]
pub struct LoggingTransactionManager {}

impl LoggingTransactionManager {
    /// Creates a new logging transaction manager.
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl TransactionManager for LoggingTransactionManager {
    async fn begin(&self, definition: &TransactionDefinition) -> SoaResult<Box<dyn Transaction>> {
        let tx = LoggingTransaction {
            id: TransactionId::new(),
            name: definition.name.clone(),
            completed: false,
        };
        debug!(
            transaction_id = %tx.id,
            name = %tx.name,
            read_only = definition.read_only,
            "Transaction started"
        );
        Ok(Box::new(tx))
    }
}

impl std::fmt::Debug for LoggingTransactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingTransactionManager").finish()
    }
}

struct LoggingTransaction {
    id: TransactionId,
    name: String,
    completed: bool,
}

impl LoggingTransaction {
    fn complete(&mut self, action: &str) -> SoaResult<()> {
        if self.completed {
            return Err(SoaError::Transaction(format!(
                "cannot {} transaction {}: already completed",
                action, self.id
            )));
        }
        self.completed = true;
        Ok(())
    }
}

#[async_trait]
impl Transaction for LoggingTransaction {
    fn id(&self) -> TransactionId {
        self.id
    }

    async fn commit(&mut self) -> SoaResult<()> {
        self.complete("commit")?;
        debug!(transaction_id = %self.id, name = %self.name, "Transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> SoaResult<()> {
        self.complete("roll back")?;
        debug!(transaction_id = %self.id, name = %self.name, "Transaction rolled back");
        Ok(())
    }
}

impl Drop for LoggingTransaction {
    fn drop(&mut self) {
        if !self.completed {
            warn!(transaction_id = %self.id, name = %self.name, "Transaction dropped without completion, rolled back");
        }
    }
}
