use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::routes::AppState;

/// Identity of the caller, attached to every request by [`attach_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// There is no authentication yet: every request acts as the configured
/// placeholder user.
pub async fn attach_user(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    request
        .extensions_mut()
        .insert(CurrentUser(state.config.default_user_id.clone()));
    next.run(request).await
}
