//! User registration and lookup endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::auth::SessionResponse;
use crate::api::middleware::RequireSession;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::User;
use crate::infrastructure::user::CreateUserRequest;

/// Create the users router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/usuarios", get(list_users).post(create_user))
        .route("/detail/{id}", get(user_detail))
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    #[serde(default, alias = "name")]
    pub nombre: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<CreateUserBody> for CreateUserRequest {
    fn from(body: CreateUserBody) -> Self {
        Self {
            nombre: body.nombre,
            username: body.username,
            email: body.email,
            password: body.password,
        }
    }
}

/// Registration response
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub usuario: User,
}

/// Register a user
///
/// POST /usuarios
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    let usuario = state
        .user_service
        .create(body.into())
        .await
        .map_err(|e| ApiError::from_domain(e, "Error al crear el usuario"))?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "Usuario creado".to_string(),
            usuario,
        }),
    ))
}

/// List every registered user
///
/// GET /usuarios
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .user_service
        .list()
        .await
        .map_err(|e| ApiError::from_domain(e, "Error al obtener usuarios"))?;

    Ok(Json(users))
}

/// Describe one user to an authenticated caller
///
/// GET /detail/{id}
pub async fn user_detail(
    RequireSession(claim): RequireSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = state
        .user_service
        .get(&id)
        .await
        .map_err(|e| ApiError::from_domain(e, "Error al obtener el detalle del usuario"))?;

    Ok(Json(SessionResponse {
        message: format!(
            "Información del detalle para el ID {} nombre de usuario: {}",
            id,
            user.username()
        ),
        data: claim,
    }))
}
