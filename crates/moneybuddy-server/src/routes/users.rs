use axum::{extract::State, Extension, Json};

use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::models::UserProfile;
use crate::routes::AppState;

pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<UserProfile>> {
    let profile = state.users.get_profile(user.id())?;
    Ok(Json(profile))
}
