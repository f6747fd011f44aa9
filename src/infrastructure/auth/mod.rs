//! Authentication infrastructure module
//!
//! This module provides JWT session token management.

mod error;
mod jwt;

pub use error::TokenError;
pub use jwt::{
    IdentityClaim, JwtClaims, JwtConfig, JwtService, TokenAuthority, DEFAULT_JWT_SECRET,
    TOKEN_TTL_SECONDS,
};
