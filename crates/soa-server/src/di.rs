//! Dependency injection modules using Shaku.
//!
//! One module per DAO backend:
//! - `InMemoryModule`: users seeded from configuration, logging transactions
//! - `MySqlModule`: users read from MySQL, one SQL transaction per call

use shaku::{module, HasComponent};
use soa_config::{AppConfig, DaoBackend, DaoConfig, TransactionConfig};
use soa_core::{LoggingTransactionManager, SoaResult};
use soa_repository::{
    create_pool, DatabasePool, DatabasePoolInterface, DatabasePoolParameters, InMemoryUserDao,
    InMemoryUserDaoParameters, MySqlTransactionManager, MySqlUserDaoImpl,
};
use soa_service::{UserService, UserServiceComponent, UserServiceComponentParameters};
use std::sync::Arc;
use tracing::info;

module! {
    pub InMemoryModule {
        components = [
            InMemoryUserDao,
            LoggingTransactionManager,
            UserServiceComponent,
        ],
        providers = [],
    }
}

module! {
    pub MySqlModule {
        components = [
            DatabasePool,
            MySqlUserDaoImpl,
            MySqlTransactionManager,
            UserServiceComponent,
        ],
        providers = [],
    }
}

/// Builds the in-memory module.
#[must_use]
pub fn build_in_memory_module(dao: &DaoConfig, transaction: &TransactionConfig) -> Arc<InMemoryModule> {
    let module = InMemoryModule::builder()
        .with_component_parameters::<InMemoryUserDao>(InMemoryUserDaoParameters {
            users: dao.seed_users.clone(),
        })
        .with_component_parameters::<UserServiceComponent>(UserServiceComponentParameters {
            transaction_timeout: transaction.timeout(),
        })
        .build();

    Arc::new(module)
}

/// Builds the MySQL module around an existing pool.
#[must_use]
pub fn build_mysql_module(pool: &DatabasePool, transaction: &TransactionConfig) -> Arc<MySqlModule> {
    let module = MySqlModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: pool.inner().clone(),
        })
        .with_component_parameters::<UserServiceComponent>(UserServiceComponentParameters {
            transaction_timeout: transaction.timeout(),
        })
        .build();

    Arc::new(module)
}

/// The resolved module for the configured backend.
pub enum ServiceModule {
    /// In-memory backend.
    InMemory(Arc<InMemoryModule>),
    /// MySQL backend.
    MySql(Arc<MySqlModule>),
}

impl ServiceModule {
    /// Builds the module selected by `config.dao.backend`.
    ///
    /// For MySQL this connects the pool and, if configured, runs migrations.
    pub async fn from_config(config: &AppConfig) -> SoaResult<Self> {
        info!("DAO backend: {}", config.dao.backend);

        match config.dao.backend {
            DaoBackend::Memory => Ok(Self::InMemory(build_in_memory_module(
                &config.dao,
                &config.transaction,
            ))),
            DaoBackend::MySql => {
                let pool = create_pool(&config.database).await?;
                pool.health_check().await?;
                if config.database.run_migrations {
                    pool.run_migrations().await?;
                }
                Ok(Self::MySql(build_mysql_module(&pool, &config.transaction)))
            }
        }
    }

    /// Resolves the user service.
    #[must_use]
    pub fn user_service(&self) -> Arc<dyn UserService> {
        match self {
            Self::InMemory(module) => module.resolve(),
            Self::MySql(module) => module.resolve(),
        }
    }

    /// Releases backend resources.
    pub async fn shutdown(&self) {
        if let Self::MySql(module) = self {
            let pool: Arc<dyn DatabasePoolInterface> = module.resolve();
            pool.close().await;
        }
    }
}

impl std::fmt::Debug for ServiceModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InMemory(_) => f.write_str("ServiceModule::InMemory"),
            Self::MySql(_) => f.write_str("ServiceModule::MySql"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soa_core::{User, UserId};

    fn dao_config(users: Vec<User>) -> DaoConfig {
        DaoConfig {
            backend: DaoBackend::Memory,
            seed_users: users,
        }
    }

    #[tokio::test]
    async fn test_in_memory_module_resolves_service() {
        let users = vec![User::new(2, "Barbara", "Liskov"), User::new(1, "Alan", "Turing")];
        let module = build_in_memory_module(&dao_config(users.clone()), &TransactionConfig::default());

        let service: Arc<dyn UserService> = module.resolve();

        assert_eq!(service.get_users().await.unwrap(), users);
        assert!(service.alert().await.is_ok());
    }

    #[tokio::test]
    async fn test_in_memory_module_empty_seed() {
        let module = build_in_memory_module(&dao_config(Vec::new()), &TransactionConfig::default());
        let service: Arc<dyn UserService> = module.resolve();

        assert!(service.get_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_service_module_from_default_config() {
        let mut config = AppConfig::default();
        config.dao.seed_users = vec![User::new(5, "Grace", "Hopper")];
        config.transaction.timeout_secs = Some(10);

        let module = ServiceModule::from_config(&config).await.unwrap();
        assert!(matches!(module, ServiceModule::InMemory(_)));

        let users = module.user_service().get_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, UserId::new(5));

        module.shutdown().await;
    }
}
