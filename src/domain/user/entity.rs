//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_user_id, UserValidationError};

/// User identifier - alphanumeric, hyphens and underscores, max 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        validate_user_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user record
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: UserId,
    /// Display name
    nombre: String,
    /// Login name, unique
    username: String,
    /// Contact address, unique
    email: String,
    /// Stored as given and compared by exact equality on login
    #[serde(skip_serializing)]
    password: String,
    created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(
        id: UserId,
        nombre: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::restore(id, nombre, username, email, password, Utc::now())
    }

    /// Rebuild a user from persisted fields
    pub fn restore(
        id: UserId,
        nombre: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            nombre: nombre.into(),
            username: username.into(),
            email: email.into(),
            password: password.into(),
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn nombre(&self) -> &str {
        &self.nombre
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Exact credential match, as the login contract requires
    pub fn matches_credentials(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::new(
            UserId::new("u1").unwrap(),
            "Alice",
            "alice",
            "alice@example.com",
            "secret",
        )
    }

    #[test]
    fn test_user_id_validation() {
        assert!(UserId::new("u1").is_ok());
        assert!(UserId::new("").is_err());
        assert!(UserId::new("not valid").is_err());
    }

    #[test]
    fn test_generated_ids_are_valid_and_unique() {
        let a = UserId::generate();
        let b = UserId::generate();

        assert!(UserId::new(a.as_str()).is_ok());
        assert_ne!(a, b);
    }

    #[test]
    fn test_matches_credentials_is_exact() {
        let user = alice();

        assert!(user.matches_credentials("alice", "secret"));
        assert!(!user.matches_credentials("alice", "Secret"));
        assert!(!user.matches_credentials("Alice", "secret"));
        assert!(!user.matches_credentials("alice", "secret "));
    }

    #[test]
    fn test_password_is_never_serialized() {
        let json = serde_json::to_value(alice()).unwrap();

        assert_eq!(json["id"], "u1");
        assert_eq!(json["nombre"], "Alice");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["email"], "alice@example.com");
        assert!(json.get("password").is_none());
    }
}
