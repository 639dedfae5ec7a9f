//! Authentication endpoints: register, login, me

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use inkstone_core::auth::{EmailAddress, Password, Username};

use crate::auth::{password, token, Claims};
use crate::db::repos::{NewUser, User, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::AuthUser;
use crate::http::server::AppState;

/// Every account this service issues is an admin account. There is no
/// public self-service tier; registration exists for the site owner.
const REGISTERED_ROLE: &str = "admin";

/// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of a user: everything except the password hash.
#[derive(Serialize)]
pub struct UserBody {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<User> for UserBody {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
        }
    }
}

#[derive(Serialize)]
pub struct UserResponse {
    pub user: UserBody,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserBody,
}

/// POST /api/auth/register
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let username = Username::new(&req.username)?;
    let email = EmailAddress::new(&req.email)?;
    let pass = Password::new(req.password)?;

    let repo = UserRepo::new(&state.pool);
    if repo.find_by_email(email.as_str()).await?.is_some() {
        return Err(ApiError::BadRequest("Email already in use".into()));
    }

    let password_hash = password::hash(pass.as_str()).await?;
    let user = repo
        .create(NewUser {
            username: username.into_string(),
            email: email.into_string(),
            password_hash,
            role: REGISTERED_ROLE.into(),
        })
        .await?;

    tracing::info!(user_id = user.id, "registered user");
    Ok((StatusCode::CREATED, Json(UserResponse { user: user.into() })))
}

/// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(user) = UserRepo::new(&state.pool).find_by_email(&req.email).await? else {
        return Err(ApiError::InvalidCredentials);
    };

    if !password::verify(&user.password, &req.password).await? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = token::sign(
        user.id,
        &user.email,
        &user.role,
        &state.config.jwt_secret,
        state.config.jwt_ttl,
    )?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// GET /api/auth/me
///
/// Echoes the verified claims. The token carries no username, so the
/// response reports the fixed admin display name.
async fn me(AuthUser(claims): AuthUser) -> Json<UserResponse> {
    let Claims {
        id, email, role, ..
    } = claims;

    Json(UserResponse {
        user: UserBody {
            id,
            username: "Admin".into(),
            email,
            role,
        },
    })
}

/// Auth routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}
