//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;
use crate::infrastructure::auth::TokenError;

/// Where clients should send the user to sign in again
pub const LOGIN_REDIRECT: &str = "/login";

/// Error categories exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    AuthenticationError,
    NotFoundError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::AuthenticationError => write!(f, "authentication_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// Error body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Client-side route to follow, e.g. back to login after a rejected token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                message: message.into(),
                error_type,
                code: None,
                redirect: None,
            },
        }
    }

    /// Add error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.code = Some(code.into());
        self
    }

    /// Add a redirect hint
    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.response.redirect = Some(redirect.into());
        self
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    /// Authentication error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ApiErrorType::AuthenticationError, message)
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }

    /// Map a domain error, hiding store faults behind `fault_message`
    ///
    /// The underlying fault is only written to the log.
    pub fn from_domain(err: DomainError, fault_message: &str) -> Self {
        if err.is_store_fault() {
            error!(error = %err, "{}", fault_message);
            return Self::internal(fault_message);
        }

        err.into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Conflict { message } => Self::bad_request(message).with_code("conflict"),
            DomainError::Storage { .. } => {
                error!(error = %err, "Unhandled store fault");
                Self::internal("Error interno del servidor")
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Unauthenticated => Self::unauthorized("No se proporcionó un token"),
            TokenError::InvalidToken => {
                Self::unauthorized("Token inválido o expirado").with_redirect(LOGIN_REDIRECT)
            }
            TokenError::Signing(reason) => {
                error!(%reason, "Token signing failed");
                Self::internal("Error al generar el token")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.response.error_type, self.response.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("El nombre de usuario ya existe");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error_type, ApiErrorType::InvalidRequestError);
        assert_eq!(err.response.message, "El nombre de usuario ya existe");
    }

    #[test]
    fn test_domain_error_conversion() {
        let api_err: ApiError = DomainError::not_found("Usuario no encontrado").into();
        assert_eq!(api_err.status, StatusCode::NOT_FOUND);
        assert_eq!(api_err.response.message, "Usuario no encontrado");

        let api_err: ApiError = DomainError::conflict("El nombre de usuario ya existe").into();
        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_err.response.code.as_deref(), Some("conflict"));
    }

    #[test]
    fn test_store_fault_detail_is_hidden() {
        let err = ApiError::from_domain(
            DomainError::storage("password authentication failed for user postgres"),
            "Error al obtener usuarios",
        );

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.response.message, "Error al obtener usuarios");
        assert!(!err.to_string().contains("postgres"));
    }

    #[test]
    fn test_from_domain_passes_client_errors_through() {
        let err = ApiError::from_domain(
            DomainError::not_found("Usuario no encontrado"),
            "Error al obtener el detalle del usuario",
        );

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.response.message, "Usuario no encontrado");
    }

    #[test]
    fn test_token_errors() {
        let missing: ApiError = TokenError::Unauthenticated.into();
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing.response.message, "No se proporcionó un token");
        assert!(missing.response.redirect.is_none());

        let invalid: ApiError = TokenError::InvalidToken.into();
        assert_eq!(invalid.status, StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.response.message, "Token inválido o expirado");
        assert_eq!(invalid.response.redirect.as_deref(), Some(LOGIN_REDIRECT));

        let signing: ApiError = TokenError::Signing("bad key".to_string()).into();
        assert_eq!(signing.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_serialization() {
        let err: ApiError = TokenError::InvalidToken.into();
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["message"], "Token inválido o expirado");
        assert_eq!(json["type"], "authentication_error");
        assert_eq!(json["redirect"], "/login");
        assert!(json.get("code").is_none());
    }
}
