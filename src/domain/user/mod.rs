//! User domain
//!
//! Domain types and the repository trait for registered users.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{validate_email, validate_required, validate_user_id, UserValidationError};

#[cfg(test)]
pub use repository::MockUserRepository;
