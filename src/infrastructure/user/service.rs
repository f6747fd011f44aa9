//! User service for registration, lookup and credential checks

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{validate_email, validate_required, User, UserId, UserRepository};
use crate::domain::DomainError;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub nombre: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// User service backed by a credential store
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Register a new user
    ///
    /// The username is checked for uniqueness before the insert; the store
    /// still rejects a duplicate that slips in between.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_required("nombre", &request.nombre)
            .and_then(|_| validate_required("username", &request.username))
            .and_then(|_| validate_email(&request.email))
            .and_then(|_| validate_required("password", &request.password))
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.username_exists(&request.username).await? {
            debug!(username = %request.username, "Username already taken");
            return Err(DomainError::conflict("El nombre de usuario ya existe"));
        }

        let user = User::new(
            UserId::generate(),
            request.nombre,
            request.username,
            request.email,
            request.password,
        );

        let created = self.repository.create(user).await?;
        info!(user_id = %created.id(), username = %created.username(), "User created");

        Ok(created)
    }

    /// Find the user matching both username and password exactly
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        self.repository.find_by_credentials(username, password).await
    }

    /// Get a user by ID
    ///
    /// An identifier that cannot name any stored user is reported as not found.
    pub async fn get(&self, id: &str) -> Result<User, DomainError> {
        let not_found = || DomainError::not_found("Usuario no encontrado");

        let user_id = UserId::new(id).map_err(|_| not_found())?;

        self.repository.get(&user_id).await?.ok_or_else(not_found)
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }

    /// Count users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}
