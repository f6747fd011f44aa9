//! Session gate for protected routes

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::auth::{IdentityClaim, TokenError};

/// Extractor that admits a request only if it carries a valid session token
///
/// The token is read from the `Authorization` header, `<scheme> <token>`.
/// Handlers receive the verified identity.
#[derive(Debug, Clone)]
pub struct RequireSession(pub IdentityClaim);

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).inspect_err(|e| {
            debug!(reason = %e, "Session rejected before verification");
        })?;

        let claim = state.token_authority.verify(token).inspect_err(|e| {
            debug!(reason = %e, "Session token rejected");
        })?;

        debug!(user_id = %claim.user_id, "Session verified");

        Ok(RequireSession(claim))
    }
}

/// Take the token out of the `Authorization` header
///
/// The header is split on whitespace and the second field is the token; the
/// scheme name itself is not checked.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(TokenError::Unauthenticated)?;

    let value = value.to_str().map_err(|_| TokenError::InvalidToken)?;

    value
        .split_whitespace()
        .nth(1)
        .ok_or(TokenError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        let headers = headers_with("Bearer eyJhbGciOiJIUzI1NiJ9.test");
        assert_eq!(extract_token(&headers), Ok("eyJhbGciOiJIUzI1NiJ9.test"));
    }

    #[test]
    fn test_missing_header_is_unauthenticated() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), Err(TokenError::Unauthenticated));
    }

    #[test]
    fn test_scheme_is_not_validated() {
        let headers = headers_with("Token abc.def.ghi");
        assert_eq!(extract_token(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_header_without_second_field() {
        let headers = headers_with("Bearer");
        assert_eq!(extract_token(&headers), Err(TokenError::InvalidToken));

        let headers = headers_with("abc.def.ghi");
        assert_eq!(extract_token(&headers), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_extra_whitespace_is_tolerated() {
        let headers = headers_with("Bearer    abc.def.ghi   trailing");
        assert_eq!(extract_token(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_non_ascii_header_is_invalid() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );

        assert_eq!(extract_token(&headers), Err(TokenError::InvalidToken));
    }
}
