pub mod categories;
pub mod expenses;
pub mod setup;
pub mod status;
pub mod tx;
pub mod users;
pub mod validation;

pub use categories::CategoryService;
pub use expenses::ExpenseService;
pub use setup::InitialSetupService;
pub use users::UserService;
