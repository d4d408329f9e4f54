mod categories;
mod expenses;
mod setup;
mod users;

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    middleware,
    routing::{get, post, put},
    Json, Router,
};

use crate::auth::middleware::attach_user;
use crate::config::Config;
use crate::db::{DbPool, SqliteTxManager};
use crate::error::{AppError, AppResult};
use crate::repositories::sqlite::{
    SqliteCategoryStore, SqliteExpenseStore, SqliteFixedCostStore, SqliteUserStore,
};
use crate::services::{CategoryService, ExpenseService, InitialSetupService, UserService};

pub type SetupService = InitialSetupService<SqliteTxManager, SqliteUserStore, SqliteFixedCostStore>;
pub type ProfileService = UserService<SqliteTxManager, SqliteUserStore, SqliteFixedCostStore>;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub expenses: Arc<ExpenseService>,
    pub categories: Arc<CategoryService>,
    pub setup: Arc<SetupService>,
    pub users: Arc<ProfileService>,
}

impl AppState {
    /// Wires every service to the SQLite stores behind `pool`.
    pub fn new(config: Config, pool: DbPool) -> Self {
        let category_store = Arc::new(SqliteCategoryStore::new(pool.clone()));
        let expense_store = Arc::new(SqliteExpenseStore::new(pool.clone()));
        let tx_manager = SqliteTxManager::new(pool);

        Self {
            config,
            expenses: Arc::new(ExpenseService::new(expense_store, category_store.clone())),
            categories: Arc::new(CategoryService::new(category_store)),
            setup: Arc::new(InitialSetupService::new(
                tx_manager.clone(),
                SqliteUserStore,
                SqliteFixedCostStore,
            )),
            users: Arc::new(UserService::new(
                tx_manager,
                SqliteUserStore,
                SqliteFixedCostStore,
            )),
        }
    }
}

/// Unwraps a JSON body, turning axum's rejection into a 400 with its reason.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

async fn health() -> &'static str {
    "ok"
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/{id}",
            put(expenses::update).delete(expenses::delete),
        )
        .route("/categories", get(categories::list))
        .route("/setup", post(setup::complete))
        .route("/user/me", get(users::me))
        .route_layer(middleware::from_fn_with_state(state.clone(), attach_user));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
}
