use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::InitialSetupInput;
use crate::routes::{json_body, AppState};

#[derive(Debug, Serialize)]
pub struct SetupResponse {
    pub status: &'static str,
}

pub async fn complete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<InitialSetupInput>, JsonRejection>,
) -> AppResult<Json<SetupResponse>> {
    let input = json_body(body)?;

    state
        .setup
        .complete_initial_setup(user.id(), &input)
        .map_err(|e| match e {
            AppError::NotFound(msg) => AppError::Unprocessable(msg),
            e => e,
        })?;

    Ok(Json(SetupResponse { status: "ok" }))
}
