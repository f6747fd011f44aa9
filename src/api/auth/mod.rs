//! Authentication API endpoints
//!
//! Login issues a short-lived session token; the dashboard echoes back the
//! identity carried by a valid token.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::RequireSession;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::auth::IdentityClaim;

/// Where a freshly logged-in client should go next
pub const DASHBOARD_REDIRECT: &str = "/dashboard";

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/dashboard", get(dashboard))
}

/// Login request
///
/// Absent fields are treated as empty strings and simply fail to match.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub redirect: String,
}

/// A message plus the identity of the caller's session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub message: String,
    pub data: IdentityClaim,
}

/// Login with username and password
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(&request.username, &request.password)
        .await
        .map_err(|e| ApiError::from_domain(e, "Error al iniciar sesión"))?
        .ok_or_else(|| {
            info!(username = %request.username, "Login rejected");
            ApiError::unauthorized("Credenciales inválidas")
        })?;

    let token = state.token_authority.issue(&IdentityClaim::from_user(&user))?;

    info!(user_id = %user.id(), "Login succeeded");

    Ok(Json(LoginResponse {
        token,
        redirect: DASHBOARD_REDIRECT.to_string(),
    }))
}

/// Session introspection
///
/// GET /dashboard
pub async fn dashboard(RequireSession(claim): RequireSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        message: "Acceso autorizado".to_string(),
        data: claim,
    })
}
