use crate::error::{AppError, AppResult};
use crate::models::UserProfile;
use crate::repositories::{FixedCostStore, UserStore};

use super::tx::{Transaction, TxManager};

/// Read side of the user settings written by the initial setup.
pub struct UserService<M, U, F> {
    tx_manager: M,
    users: U,
    fixed_costs: F,
}

impl<M, U, F> UserService<M, U, F>
where
    M: TxManager,
    U: UserStore<M::Tx>,
    F: FixedCostStore<M::Tx>,
{
    pub fn new(tx_manager: M, users: U, fixed_costs: F) -> Self {
        Self {
            tx_manager,
            users,
            fixed_costs,
        }
    }

    /// Settings and fixed costs read from one snapshot.
    pub fn get_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        let tx = self.tx_manager.begin_read()?;

        let read = self.users.get_by_id(&tx, user_id).and_then(|user| match user {
            Some(user) => Ok(Some(UserProfile {
                fixed_costs: self.fixed_costs.list_by_user(&tx, user_id)?,
                id: user.id,
                income: user.income,
                saving_goal: user.saving_goal,
            })),
            None => Ok(None),
        });

        match read {
            Ok(Some(profile)) => {
                tx.commit()?;
                Ok(profile)
            }
            Ok(None) => {
                finish_read(tx, user_id);
                Err(AppError::NotFound("user not found".into()))
            }
            Err(err) => {
                finish_read(tx, user_id);
                Err(err)
            }
        }
    }
}

/// Ends a read that is not going to be reported as a success. A rollback
/// failure is logged and never replaces the caller's error.
fn finish_read<T: Transaction>(tx: T, user_id: &str) {
    if let Err(rollback_err) = tx.rollback() {
        tracing::warn!(user_id, "rollback after profile read failed: {rollback_err}");
    }
}
