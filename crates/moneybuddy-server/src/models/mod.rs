use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle state of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Planned,
    Confirmed,
}

impl ExpenseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseStatus::Planned => "planned",
            ExpenseStatus::Confirmed => "confirmed",
        }
    }

    /// Case-insensitive parse. Returns `None` for anything but the two known states.
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "planned" => Some(ExpenseStatus::Planned),
            "confirmed" => Some(ExpenseStatus::Confirmed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub amount: i64,
    pub memo: String,
    pub spent_at: DateTime<Utc>,
    pub status: ExpenseStatus,
    pub category: Category,
}

/// Request body for `POST /expenses`. Numeric fields are optional so that an
/// omitted value can be told apart from an explicit invalid one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateExpenseInput {
    pub amount: Option<i64>,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub spent_at: String,
    pub status: Option<String>,
}

/// Request body for `PUT /expenses/{id}`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExpenseInput {
    #[serde(skip)]
    pub id: i64,
    pub amount: Option<i64>,
    pub category_id: Option<i64>,
    pub memo: Option<String>,
    pub spent_at: Option<String>,
    pub status: Option<String>,
}

/// Validated field set handed to the expense store on create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub amount: i64,
    pub category_id: i64,
    pub memo: String,
    pub spent_at: DateTime<Utc>,
    /// `None` lets the store apply its default.
    pub status: Option<ExpenseStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub income: i64,
    pub saving_goal: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedCost {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub amount: i64,
}

/// Omitted or zero fields are left for setup validation to report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedCostInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub amount: i64,
}

/// Request body for `POST /setup`. Omitted numbers read as 0 and a missing or
/// null `fixedCosts` as an empty list, so range errors come from validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialSetupInput {
    #[serde(default)]
    pub income: i64,
    #[serde(default)]
    pub saving_goal: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fixed_costs: Vec<FixedCostInput>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub income: i64,
    pub saving_goal: i64,
    pub fixed_costs: Vec<FixedCost>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accepts_any_case() {
        assert_eq!(ExpenseStatus::normalize("PlAnNeD"), Some(ExpenseStatus::Planned));
        assert_eq!(ExpenseStatus::normalize("CONFIRMED"), Some(ExpenseStatus::Confirmed));
        assert_eq!(ExpenseStatus::normalize("draft"), None);
        assert_eq!(ExpenseStatus::normalize(""), None);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ExpenseStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
    }

    #[test]
    fn setup_input_uses_camel_case_keys() {
        let input: InitialSetupInput = serde_json::from_str(
            r#"{"income":300000,"savingGoal":50000,"fixedCosts":[{"name":"rent","amount":80000}]}"#,
        )
        .unwrap();
        assert_eq!(input.saving_goal, 50000);
        assert_eq!(input.fixed_costs[0].name, "rent");
    }

    #[test]
    fn setup_input_fills_omitted_fields_with_zero_values() {
        let input: InitialSetupInput =
            serde_json::from_str(r#"{"income":300000,"fixedCosts":[]}"#).unwrap();
        assert_eq!(input.saving_goal, 0);

        let input: InitialSetupInput =
            serde_json::from_str(r#"{"savingGoal":1000,"fixedCosts":null}"#).unwrap();
        assert_eq!(input.income, 0);
        assert!(input.fixed_costs.is_empty());

        let input: InitialSetupInput =
            serde_json::from_str(r#"{"income":1,"fixedCosts":[{"name":null}]}"#).unwrap();
        assert_eq!(
            input.fixed_costs,
            vec![FixedCostInput {
                name: String::new(),
                amount: 0,
            }]
        );
    }

    #[test]
    fn setup_input_still_rejects_wrong_types() {
        assert!(serde_json::from_str::<InitialSetupInput>(r#"{"income":"bad"}"#).is_err());
        assert!(serde_json::from_str::<InitialSetupInput>(r#"{"fixedCosts":{}}"#).is_err());
    }
}
