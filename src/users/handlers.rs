use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::{
    dto::{LoginRequest, LoginResponse, SignupRequest},
    repo::{NewUser, User},
    services::{normalize_email, validate_signup},
};
use crate::{
    auth::{
        password::{hash_password, verify_password},
        RequireAdmin, Role,
    },
    db::is_unique_violation,
    error::AppError,
    response::ApiResponse,
    state::AppState,
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/get-all-users-email", get(get_all_users_email))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<ApiResponse<User>, AppError> {
    let Json(mut req) = payload?;
    let role = match validate_signup(&mut req) {
        Ok(role) => role,
        Err(e) => {
            warn!(email = %req.email, error = %e, "signup rejected");
            return Err(e);
        }
    };

    if User::find_by_email(&state.db, &req.email)
        .await
        .map_err(lookup_failed)?
        .is_some()
    {
        warn!(email = %req.email, "email already registered");
        return Err(AppError::Conflict("Email ID already exists".into()));
    }
    if User::find_by_phone(&state.db, &req.phone)
        .await
        .map_err(lookup_failed)?
        .is_some()
    {
        warn!(phone = %req.phone, "phone already registered");
        return Err(AppError::Conflict("Phone number already exists".into()));
    }

    let hash = hash_password(&req.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        AppError::internal("Failed to hash the password")
    })?;

    let new = NewUser {
        username: &req.username,
        email: &req.email,
        phone: &req.phone,
        password_hash: &hash,
        role: role.as_str(),
    };
    let user = match User::create(&state.db, &new).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %req.email, "signup lost race on unique constraint");
            return Err(AppError::Conflict("Email ID or phone number already exists".into()));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(AppError::internal("Failed to create user"));
        }
    };

    info!(user_id = user.id, email = %user.email, role = %user.role, "user registered");
    Ok(ApiResponse::ok("User created successfully", user))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let Json(req) = payload?;
    let email = normalize_email(&req.email);

    let user = match User::find_by_email(&state.db, &email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %email, "login unknown email");
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }
        Err(e) => return Err(lookup_failed(e)),
    };

    let ok = verify_password(&req.password, &user.password_hash).map_err(|e| {
        error!(error = %e, user_id = user.id, "verify_password failed");
        AppError::internal("Failed to verify password")
    })?;
    if !ok {
        warn!(email = %email, user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let role = Role::parse(&user.role).ok_or_else(|| {
        error!(user_id = user.id, role = %user.role, "stored role is not recognised");
        AppError::internal("Failed to generate token")
    })?;
    let token = state.jwt.sign(&user.email, role).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::internal("Failed to generate token")
    })?;

    info!(user_id = user.id, "login successful");
    Ok(ApiResponse::ok("Login successful", LoginResponse { token, user }))
}

#[instrument(skip(state))]
pub async fn get_all_users_email(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<Vec<String>>, AppError> {
    let emails = User::list_emails(&state.db).await.map_err(|e| {
        error!(error = %e, "list user emails failed");
        AppError::bad_request_with("Failed to get users email", e)
    })?;
    Ok(ApiResponse::ok(
        "All users email details were retrieved successfully",
        emails,
    ))
}

fn lookup_failed(e: anyhow::Error) -> AppError {
    error!(error = %e, "user lookup failed");
    AppError::internal("Failed to look up user")
}
