use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::{
    dto::{CreateProfileRequest, UpdateProfileRequest},
    repo::Profile,
};
use crate::{
    auth::{RequireEitherRole, RequireUser},
    db::{is_foreign_key_violation, is_unique_violation},
    error::AppError,
    response::ApiResponse,
    state::AppState,
    users::repo::User,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/createprofile", post(create_profile))
        .route("/getprofile/:id", get(get_profile))
        .route("/get-all-profile-details", get(get_all_profiles))
        .route("/delete-profile/:id", delete(delete_profile))
        .route("/update-profile/:id", put(update_profile))
}

#[instrument(skip(state, payload))]
pub async fn create_profile(
    State(state): State<AppState>,
    RequireUser(caller): RequireUser,
    payload: Result<Json<CreateProfileRequest>, JsonRejection>,
) -> Result<ApiResponse<Profile>, AppError> {
    let Json(req) = payload?;
    let (owner, fields) = match req.validate() {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "profile rejected");
            return Err(e);
        }
    };

    let user_id = match owner {
        Some(id) => id,
        None => match User::find_by_email(&state.db, &caller.email).await {
            Ok(Some(user)) => user.id,
            Ok(None) => {
                warn!(email = %caller.email, "token email has no account");
                return Err(AppError::bad_request_with(
                    "Failed to create profile",
                    "user_id is required when the caller has no account",
                ));
            }
            Err(e) => {
                error!(error = %e, "resolve caller account failed");
                return Err(AppError::internal_with("Failed to create profile", e));
            }
        },
    };

    let profile = match Profile::create(&state.db, &fields.owned_by(user_id)).await {
        Ok(p) => p,
        Err(e) if is_unique_violation(&e) => {
            warn!(user_id, "profile already exists");
            return Err(AppError::Conflict("Profile already exists for this user".into()));
        }
        Err(e) if is_foreign_key_violation(&e) => {
            warn!(user_id, "profile for unknown user");
            return Err(AppError::bad_request_with(
                "Failed to create profile",
                format!("no user with id {user_id}"),
            ));
        }
        Err(e) => {
            error!(error = %e, user_id, "insert profile failed");
            return Err(AppError::internal_with("Failed to create profile", e));
        }
    };

    info!(user_id, by = %caller.email, "profile created");
    Ok(ApiResponse::ok("Profile created successfully", profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    RequireEitherRole(_who): RequireEitherRole,
    id: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<Profile>, AppError> {
    let Path(user_id) = id?;
    match Profile::find(&state.db, user_id).await {
        Ok(Some(profile)) => Ok(ApiResponse::ok("Profile detail retrieved successfully", profile)),
        Ok(None) => Err(AppError::bad_request_with(
            "Failed to get profile details",
            format!("no profile for user id {user_id}"),
        )),
        Err(e) => {
            error!(error = %e, user_id, "find profile failed");
            Err(AppError::bad_request_with("Failed to get profile details", e))
        }
    }
}

#[instrument(skip(state))]
pub async fn get_all_profiles(
    State(state): State<AppState>,
    RequireEitherRole(_who): RequireEitherRole,
) -> Result<ApiResponse<Vec<Profile>>, AppError> {
    let profiles = Profile::list(&state.db).await.map_err(|e| {
        error!(error = %e, "list profiles failed");
        AppError::bad_request_with("Failed to get all profile details", e)
    })?;
    Ok(ApiResponse::ok(
        "All profile details were retrieved successfully",
        profiles,
    ))
}

/// Any caller with the `user` role may remove any profile.
#[instrument(skip(state))]
pub async fn delete_profile(
    State(state): State<AppState>,
    RequireUser(caller): RequireUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<Profile>, AppError> {
    let Path(user_id) = id?;
    match Profile::delete(&state.db, user_id).await {
        Ok(Some(profile)) => {
            info!(user_id, by = %caller.email, "profile deleted");
            Ok(ApiResponse::ok("Profile detail deleted successfully", profile))
        }
        Ok(None) => Err(AppError::bad_request_with(
            "Failed to delete a profile detail",
            format!("no profile for user id {user_id}"),
        )),
        Err(e) => {
            error!(error = %e, user_id, "delete profile failed");
            Err(AppError::bad_request_with("Failed to delete a profile detail", e))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(caller): RequireUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<ApiResponse<Profile>, AppError> {
    let Path(user_id) = id?;
    let Json(req) = payload?;

    let existing = match Profile::find(&state.db, user_id).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            warn!(user_id, "update of unknown profile");
            return Err(AppError::bad_request_with(
                "Failed to update profile details",
                format!("no profile for user id {user_id}"),
            ));
        }
        Err(e) => {
            error!(error = %e, user_id, "find profile failed");
            return Err(AppError::bad_request_with("Failed to update profile details", e));
        }
    };

    match Profile::update(&state.db, &req.merge_into(existing)).await {
        Ok(Some(profile)) => {
            info!(user_id, by = %caller.email, "profile updated");
            Ok(ApiResponse::ok("Profile details were updated successfully", profile))
        }
        Ok(None) => Err(AppError::bad_request_with(
            "Failed to update profile details",
            format!("no profile for user id {user_id}"),
        )),
        Err(e) => {
            error!(error = %e, user_id, "update profile failed");
            Err(AppError::bad_request_with("Failed to update profile details", e))
        }
    }
}
