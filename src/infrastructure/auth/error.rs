use thiserror::Error;

/// Failures of token issuance and verification
///
/// Verification failures are deliberately coarse: a malformed token, a bad
/// signature and an expired token all surface as `InvalidToken`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("No token provided")]
    Unauthenticated,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}
