//! User infrastructure module
//!
//! Credential store implementations (in-memory and PostgreSQL) and the user
//! service that registers, lists and authenticates users.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, UserService};
