use crate::error::{AppError, AppResult};
use crate::models::InitialSetupInput;
use crate::repositories::{FixedCostStore, UserStore};

use super::tx::{Transaction, TxManager};

/// Saves a user's income and saving goal and replaces their fixed costs in a
/// single transaction.
pub struct InitialSetupService<M, U, F> {
    tx_manager: M,
    users: U,
    fixed_costs: F,
}

impl<M, U, F> InitialSetupService<M, U, F>
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

    /// Either every step commits or the transaction is rolled back and the
    /// failing step's error is returned as is.
    pub fn complete_initial_setup(&self, user_id: &str, input: &InitialSetupInput) -> AppResult<()> {
        validate(input)?;

        let tx = self.tx_manager.begin()?;

        match self.apply(&tx, user_id, input) {
            Ok(()) => {
                tx.commit()?;
                tracing::debug!(user_id, fixed_costs = input.fixed_costs.len(), "initial setup committed");
                Ok(())
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!(user_id, "rollback after failed setup also failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }

    fn apply(&self, tx: &M::Tx, user_id: &str, input: &InitialSetupInput) -> AppResult<()> {
        match self.users.get_by_id(tx, user_id)? {
            None => self
                .users
                .create(tx, user_id, input.income, input.saving_goal)?,
            Some(_) => self
                .users
                .update_settings(tx, user_id, input.income, input.saving_goal)?,
        }

        self.fixed_costs.delete_all_by_user(tx, user_id)?;
        self.fixed_costs.bulk_create(tx, user_id, &input.fixed_costs)?;
        Ok(())
    }
}

fn validate(input: &InitialSetupInput) -> AppResult<()> {
    if input.income <= 0 {
        return Err(AppError::validation("income must be greater than 0"));
    }
    if input.saving_goal < 0 {
        return Err(AppError::validation(
            "saving_goal must be greater than or equal to 0",
        ));
    }
    for cost in &input.fixed_costs {
        if cost.amount <= 0 {
            return Err(AppError::validation("fixed_cost.amount must be greater than 0"));
        }
        if cost.name.is_empty() {
            return Err(AppError::validation("fixed_cost.name must be provided"));
        }
    }
    Ok(())
}
