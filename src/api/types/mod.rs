//! Request and response types shared by the API handlers

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType, LOGIN_REDIRECT};
pub use json::Json;
