//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
    /// Index for username -> user ID lookup
    username_index: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            username_index: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a repository with initial users
    pub fn with_users(users: Vec<User>) -> Self {
        let mut users_map = HashMap::new();
        let mut username_map = HashMap::new();

        for user in users {
            let id = user.id().as_str().to_string();
            username_map.insert(user.username().to_string(), id.clone());
            users_map.insert(id, user);
        }

        Self {
            users: Arc::new(RwLock::new(users_map)),
            username_index: Arc::new(RwLock::new(username_map)),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(id.as_str()).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        // Index guard is released before taking the users lock; `create` locks users first.
        let user_id = self.username_index.read().await.get(username).cloned();

        match user_id {
            Some(id) => Ok(self.users.read().await.get(&id).cloned()),
            None => Ok(None),
        }
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        Ok(self
            .get_by_username(username)
            .await?
            .filter(|user| user.matches_credentials(username, password)))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let mut username_index = self.username_index.write().await;

        let id = user.id().as_str().to_string();
        let username = user.username().to_string();

        if users.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "El usuario con ID '{}' ya existe",
                id
            )));
        }

        if username_index.contains_key(&username) {
            return Err(DomainError::conflict("El nombre de usuario ya existe"));
        }

        if users.values().any(|u| u.email() == user.email()) {
            return Err(DomainError::conflict("El email ya está registrado"));
        }

        username_index.insert(username, id.clone());
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by_key(|u| u.created_at());

        Ok(result)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let users = self.users.read().await;
        Ok(users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(id: &str, username: &str) -> User {
        User::new(
            UserId::new(id).unwrap(),
            "Test User",
            username,
            format!("{}@example.com", username),
            "secret",
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("u1", "alice");

        repo.create(user.clone()).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().username(), "alice");
    }

    #[tokio::test]
    async fn test_get_missing() {
        let repo = InMemoryUserRepository::new();
        let id = UserId::new("nobody").unwrap();

        assert!(repo.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_username() {
        let repo = InMemoryUserRepository::with_users(vec![create_test_user("u1", "alice")]);

        let retrieved = repo.get_by_username("alice").await.unwrap();
        assert_eq!(retrieved.unwrap().id().as_str(), "u1");
        assert!(repo.get_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_credentials() {
        let repo = InMemoryUserRepository::with_users(vec![create_test_user("u1", "alice")]);

        let found = repo.find_by_credentials("alice", "secret").await.unwrap();
        assert_eq!(found.unwrap().id().as_str(), "u1");

        assert!(repo
            .find_by_credentials("alice", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .find_by_credentials("bob", "secret")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_username_uniqueness() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("u1", "alice")).await.unwrap();

        let dup = User::new(
            UserId::new("u2").unwrap(),
            "Other",
            "alice",
            "other@example.com",
            "x",
        );
        let result = repo.create(dup).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_email_uniqueness() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("u1", "alice")).await.unwrap();

        let other = User::new(
            UserId::new("u2").unwrap(),
            "Other",
            "alice2",
            "alice@example.com",
            "x",
        );
        let result = repo.create(other).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("u1", "user1")).await.unwrap();
        repo.create(create_test_user("u2", "user2")).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_username_exists_default_method() {
        let repo = InMemoryUserRepository::with_users(vec![create_test_user("u1", "alice")]);

        assert!(repo.username_exists("alice").await.unwrap());
        assert!(!repo.username_exists("bob").await.unwrap());
    }
}
