//! Application run loop.

use crate::di::ServiceModule;
use soa_config::AppConfig;
use soa_core::SoaResult;
use tracing::info;

/// Resolves the user service for `config`, lists users, and raises an alert.
pub async fn run(config: AppConfig) -> SoaResult<()> {
    let module = ServiceModule::from_config(&config).await?;
    let user_service = module.user_service();

    let outcome = async {
        let users = user_service.get_users().await?;
        info!("Retrieved {} users", users.len());
        for user in &users {
            info!(user_id = %user.id, "{}", user.full_name());
        }

        user_service.alert().await
    }
    .await;

    module.shutdown().await;
    outcome
}
