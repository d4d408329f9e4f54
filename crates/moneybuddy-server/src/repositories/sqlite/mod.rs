mod categories;
mod expenses;
mod fixed_costs;
mod users;

pub use categories::SqliteCategoryStore;
pub use expenses::SqliteExpenseStore;
pub use fixed_costs::SqliteFixedCostStore;
pub use users::SqliteUserStore;

fn now_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
