//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for registration, login, logout and the current
//! user's profile.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{Duration, Utc};
use marketplace_core::domain::{AuthSession, NewUser, ProfileUpdate, Role, User};
use marketplace_core::ports::PortError;
use marketplace_core::util::{is_valid_email, is_valid_password, MIN_PASSWORD_LEN};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::middleware::{session_token, CurrentUser, SESSION_COOKIE};
use crate::web::{port_error, state::AppState};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `student` or `instructor`.
    pub role: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: String,
    pub role: String,
    pub bio: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar: user.avatar,
            role: user.role.to_string(),
            bio: user.bio,
        }
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Creates a login session and returns the `Set-Cookie` value for it.
async fn open_session(state: &AppState, user_id: &str) -> Result<String, (StatusCode, String)> {
    let ttl = Duration::hours(state.config.session_ttl_hours);
    let session = AuthSession {
        token: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        expires_at: Utc::now() + ttl,
    };
    let cookie = format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        session.token,
        ttl.num_seconds()
    );

    state.sessions.save(session).await.map_err(|e| {
        error!("Failed to create auth session: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session".to_string())
    })?;
    Ok(cookie)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new student or instructor account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserView),
        (status = 400, description = "Invalid email, password or role"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Validate the input
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Name is required".to_string()));
    }
    if !is_valid_email(&req.email) {
        return Err((StatusCode::BAD_REQUEST, "Invalid email address".to_string()));
    }
    if !is_valid_password(&req.password) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Password must be at least {} characters long", MIN_PASSWORD_LEN),
        ));
    }
    let role = match req.role.parse::<Role>() {
        Ok(role @ (Role::Student | Role::Instructor)) => role,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "Role must be student or instructor".to_string(),
            ))
        }
    };

    // 2. Hash the password
    let hashed_password = state.passwords.hash(&req.password).map_err(|e| {
        error!("Failed to hash password: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password".to_string())
    })?;

    // 3. Create the user
    let user = state
        .users
        .create(NewUser {
            name,
            email: req.email,
            hashed_password,
            role,
        })
        .await
        .map_err(|e| match e {
            PortError::Conflict(_) => (
                StatusCode::CONFLICT,
                "User with this email already exists".to_string(),
            ),
            other => port_error(other, "Failed to create user"),
        })?;

    // 4. Log the new user in
    let cookie = open_session(&state, &user.id).await?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(UserView::from(user)),
    ))
}

/// POST /auth/login - Login with an existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = UserView),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let invalid = || (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string());

    // 1. Get user by email
    let creds = state.users.find_by_email(&req.email).await.map_err(|e| {
        warn!("Login for unknown email: {:?}", e);
        invalid()
    })?;

    // 2. Verify password
    if !state.passwords.verify(&req.password, &creds.hashed_password) {
        return Err(invalid());
    }

    // 3. Open a session
    let cookie = open_session(&state, &creds.user.id).await?;
    info!("User {} logged in", creds.user.id);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserView::from(creds.user)),
    ))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Extract session token
    let token = session_token(&headers)
        .ok_or((StatusCode::UNAUTHORIZED, "No session found".to_string()))?;

    // 2. Drop the learning session of whoever owned the token
    if let Ok(session) = state.sessions.load(token).await {
        state.learning.end(&session.user_id).await;
    }

    // 3. Delete the login session
    state
        .sessions
        .clear(token)
        .await
        .map_err(|e| port_error(e, "Failed to logout"))?;

    // 4. Clear cookie
    let cookie = format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    );

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}

/// GET /auth/me - The logged-in user's profile
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserView),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<UserView>, (StatusCode, String)> {
    let user = state
        .users
        .find_by_id(&current.user_id)
        .await
        .map_err(|e| port_error(e, "Failed to load user"))?;
    Ok(Json(user.into()))
}

/// PATCH /auth/me - Update name, avatar or bio
#[utoipa::path(
    patch,
    path = "/auth/me",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserView),
        (status = 400, description = "Empty name"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<Json<UserView>, (StatusCode, String)> {
    if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err((StatusCode::BAD_REQUEST, "Name cannot be empty".to_string()));
    }

    let update = ProfileUpdate {
        name: req.name.map(|n| n.trim().to_string()),
        avatar: req.avatar,
        bio: req.bio,
    };
    let user = state
        .users
        .update_profile(&current.user_id, update)
        .await
        .map_err(|e| port_error(e, "Failed to update profile"))?;
    Ok(Json(user.into()))
}
