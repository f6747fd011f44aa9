//! Usuarios API
//!
//! User registration plus short-lived JWT sessions:
//! - account creation and listing
//! - login with username and password
//! - session-gated dashboard and user detail

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};

use api::state::{AppState, UserServiceTrait};
use config::StorageBackend;
use infrastructure::auth::{JwtConfig, JwtService};
use infrastructure::user::{InMemoryUserRepository, PostgresUserRepository, UserService};

/// Create the application state from the loaded configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    info!("Storage backend: {:?}", config.storage.backend);

    let user_service: Arc<dyn UserServiceTrait> = match config.storage.backend {
        StorageBackend::Memory => {
            let repository = Arc::new(InMemoryUserRepository::new());
            Arc::new(UserService::new(repository))
        }
        StorageBackend::Postgres => {
            let repository = Arc::new(create_postgres_repository(&config.storage.database_url)?);
            Arc::new(UserService::new(repository))
        }
    };

    let jwt_service = JwtService::new(&JwtConfig::new(config.auth.jwt_secret.clone()))
        .map_err(|e| anyhow::anyhow!("Invalid JWT configuration: {}", e))?;

    Ok(AppState::new(user_service, Arc::new(jwt_service)))
}

/// Build a lazily connected repository and prepare its schema in the background
///
/// Connection failures are logged; requests fail with store errors until the
/// database becomes reachable.
fn create_postgres_repository(database_url: &str) -> anyhow::Result<PostgresUserRepository> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_lazy(database_url)
        .map_err(|e| anyhow::anyhow!("Invalid database URL: {}", e))?;

    let repository = PostgresUserRepository::new(pool);
    let bootstrap = repository.clone();

    tokio::spawn(async move {
        match bootstrap.ensure_schema().await {
            Ok(()) => info!("Connected to PostgreSQL"),
            Err(e) => error!(error = %e, "Error connecting to PostgreSQL"),
        }
    });

    Ok(repository)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, StorageConfig};

    fn memory_config() -> AppConfig {
        AppConfig {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                ..StorageConfig::default()
            },
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_memory_state_starts_empty() {
        let state = create_app_state_with_config(&memory_config()).await.unwrap();

        assert_eq!(state.user_service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_state_uses_configured_secret() {
        let mut config = memory_config();
        config.auth = AuthConfig {
            jwt_secret: "another-secret".to_string(),
        };

        let state = create_app_state_with_config(&config).await.unwrap();
        let claim = infrastructure::auth::IdentityClaim::new("u1", "alice");
        let token = state.token_authority.issue(&claim).unwrap();

        let default_jwt = JwtService::new(&JwtConfig::default()).unwrap();
        assert!(infrastructure::auth::TokenAuthority::verify(&default_jwt, &token).is_err());
        assert_eq!(state.token_authority.verify(&token).unwrap(), claim);
    }

    #[tokio::test]
    async fn test_empty_secret_is_rejected() {
        let mut config = memory_config();
        config.auth.jwt_secret = String::new();

        assert!(create_app_state_with_config(&config).await.is_err());
    }
}
