//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str = "SELECT id, nombre, username, email, password, created_at FROM usuarios";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `usuarios` table when it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS usuarios (
                id          TEXT PRIMARY KEY,
                nombre      TEXT NOT NULL,
                username    TEXT NOT NULL UNIQUE,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                created_at  TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create usuarios table: {}", e)))?;

        Ok(())
    }

    async fn fetch_one_where(
        &self,
        clause: &str,
        binds: &[&str],
        context: &str,
    ) -> Result<Option<User>, DomainError> {
        let sql = format!("{} WHERE {}", SELECT_COLUMNS, clause);
        let mut query = sqlx::query(&sql);

        for value in binds {
            query = query.bind(*value);
        }

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to {}: {}", context, e)))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("id = $1", &[id.as_str()], "get user")
            .await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("username = $1", &[username], "get user by username")
            .await
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        self.fetch_one_where(
            "username = $1 AND password = $2",
            &[username, password],
            "find user by credentials",
        )
        .await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO usuarios (id, nombre, username, email, password, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.nombre())
        .bind(user.username())
        .bind(user.email())
        .bind(user.password())
        .bind(user.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &user))?;

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let sql = format!("{} ORDER BY created_at", SELECT_COLUMNS);

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuarios")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

/// Translate unique-constraint violations into conflicts
fn map_insert_error(err: sqlx::Error, user: &User) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();

            return if constraint.contains("username") {
                DomainError::conflict("El nombre de usuario ya existe")
            } else if constraint.contains("email") {
                DomainError::conflict("El email ya está registrado")
            } else {
                DomainError::conflict(format!(
                    "El usuario con ID '{}' ya existe",
                    user.id().as_str()
                ))
            };
        }
    }

    DomainError::storage(format!("Failed to create user: {}", err))
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let id: String = column(row, "id")?;
    let nombre: String = column(row, "nombre")?;
    let username: String = column(row, "username")?;
    let email: String = column(row, "email")?;
    let password: String = column(row, "password")?;
    let created_at: DateTime<Utc> = column(row, "created_at")?;

    let user_id = UserId::new(id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(User::restore(
        user_id, nombre, username, email, password, created_at,
    ))
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::storage(format!("Failed to read column '{}': {}", name, e)))
}
