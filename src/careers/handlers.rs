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
    dto::{CreateCareerRequest, UpdateCareerRequest},
    repo::{self, Career},
};
use crate::{
    auth::{RequireAdmin, RequireEitherRole},
    error::AppError,
    response::ApiResponse,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/createcareer", post(create_career))
        .route("/getcareerdetail/:id", get(get_career))
        .route("/get-all-career-details", get(get_all_careers))
        .route("/updatecareer/:id", put(update_career))
        .route("/deletecareer/:id", delete(delete_career))
}

#[instrument(skip(state, payload))]
pub async fn create_career(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    payload: Result<Json<CreateCareerRequest>, JsonRejection>,
) -> Result<ApiResponse<Career>, AppError> {
    let Json(req) = payload?;
    let new = match req.validate() {
        Ok(new) => new,
        Err(e) => {
            warn!(error = %e, "career rejected");
            return Err(e);
        }
    };

    let career = repo::insert(&state.db, &new).await.map_err(|e| {
        error!(error = %e, "insert career failed");
        AppError::internal_with("Failed to create career post", e)
    })?;
    info!(job_id = career.job_id, by = %admin.email, "career created");

    // The row stays even when delivery fails; the caller still sees an error.
    let body = serde_json::to_value(&career).map_err(|e| {
        error!(error = %e, "serialize career failed");
        AppError::internal("Failed to serialize career post")
    })?;
    if let Err(e) = state.notifier.notify(&body).await {
        let detail = format!("{e:#}");
        error!(error = %detail, job_id = career.job_id, "webhook notification failed");
        return Err(AppError::internal("Error sending webhook notification"));
    }

    Ok(ApiResponse::ok("Career post created successfully", career))
}

#[instrument(skip(state))]
pub async fn get_career(
    State(state): State<AppState>,
    RequireEitherRole(_who): RequireEitherRole,
    id: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<Career>, AppError> {
    let Path(job_id) = id?;
    match repo::find(&state.db, job_id).await {
        Ok(Some(career)) => Ok(ApiResponse::ok("Career detail retrieved successfully", career)),
        Ok(None) => Err(AppError::bad_request_with(
            "Failed to get career details",
            format!("no career with job id {job_id}"),
        )),
        Err(e) => {
            error!(error = %e, job_id, "find career failed");
            Err(AppError::bad_request_with("Failed to get career details", e))
        }
    }
}

#[instrument(skip(state))]
pub async fn get_all_careers(
    State(state): State<AppState>,
    RequireEitherRole(_who): RequireEitherRole,
) -> Result<ApiResponse<Vec<Career>>, AppError> {
    let careers = repo::list(&state.db).await.map_err(|e| {
        error!(error = %e, "list careers failed");
        AppError::bad_request_with("Failed to get all career details", e)
    })?;
    Ok(ApiResponse::ok(
        "All career details were retrieved successfully",
        careers,
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_career(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateCareerRequest>, JsonRejection>,
) -> Result<ApiResponse<Career>, AppError> {
    let Path(job_id) = id?;
    let Json(req) = payload?;

    let existing = match repo::find(&state.db, job_id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            warn!(job_id, "update of unknown career");
            return Err(AppError::bad_request_with(
                "Failed to update career details",
                format!("no career with job id {job_id}"),
            ));
        }
        Err(e) => {
            error!(error = %e, job_id, "find career failed");
            return Err(AppError::bad_request_with("Failed to update career details", e));
        }
    };
    let merged = req.merge_into(existing)?;

    match repo::update(&state.db, &merged).await {
        Ok(Some(career)) => {
            info!(job_id, by = %admin.email, "career updated");
            Ok(ApiResponse::ok("Career details were updated successfully", career))
        }
        Ok(None) => Err(AppError::bad_request_with(
            "Failed to update career details",
            format!("no career with job id {job_id}"),
        )),
        Err(e) => {
            error!(error = %e, job_id, "update career failed");
            Err(AppError::bad_request_with("Failed to update career details", e))
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_career(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    id: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<Career>, AppError> {
    let Path(job_id) = id?;
    match repo::delete(&state.db, job_id).await {
        Ok(Some(career)) => {
            info!(job_id, by = %admin.email, "career deleted");
            Ok(ApiResponse::ok("Career detail deleted successfully", career))
        }
        Ok(None) => Err(AppError::bad_request_with(
            "Failed to delete a career detail",
            format!("no career with job id {job_id}"),
        )),
        Err(e) => {
            error!(error = %e, job_id, "delete career failed");
            Err(AppError::bad_request_with("Failed to delete a career detail", e))
        }
    }
}
