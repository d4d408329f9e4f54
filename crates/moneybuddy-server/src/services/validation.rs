//! Syntactic checks on expense input. Each function fails with
//! [`AppError::Validation`] carrying a message that is safe to return to clients.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{AppError, AppResult};
use crate::models::ExpenseStatus;

/// Ceiling for a single expense amount.
pub const MAX_AMOUNT: i64 = 1_000_000_000;
/// Maximum memo length in characters.
pub const MEMO_MAX_LEN: usize = 5000;

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Unix seconds of 0001-01-01T00:00:00Z, the "unset" timestamp.
const ZERO_TIME_UNIX: i64 = -62_135_596_800;

pub fn amount(raw: Option<i64>) -> AppResult<i64> {
    let amount = raw.ok_or_else(|| AppError::validation("amount must be provided"))?;
    check_amount(amount)
}

pub fn check_amount(amount: i64) -> AppResult<i64> {
    if amount <= 0 {
        return Err(AppError::validation("amount must be greater than 0"));
    }
    if amount > MAX_AMOUNT {
        return Err(AppError::validation("amount exceeds maximum allowed"));
    }
    Ok(amount)
}

pub fn category_id(raw: Option<i64>) -> AppResult<i64> {
    let id = raw.ok_or_else(|| AppError::validation("category_id must be provided"))?;
    check_category_id(id)
}

pub fn check_category_id(id: i64) -> AppResult<i64> {
    if id <= 0 {
        return Err(AppError::validation("category_id must be greater than 0"));
    }
    Ok(id)
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date, the latter
/// read as midnight UTC.
pub fn spent_at(raw: &str) -> AppResult<DateTime<Utc>> {
    if raw.is_empty() {
        return Err(AppError::validation("spent_at must be provided"));
    }

    let parsed = match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(_) => NaiveDate::parse_from_str(raw, DATE_ONLY_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
            .ok_or_else(|| AppError::validation("spent_at is invalid"))?,
    };

    if is_zero_time(&parsed) {
        return Err(AppError::validation("spent_at must be a non-zero time"));
    }
    Ok(parsed)
}

fn is_zero_time(ts: &DateTime<Utc>) -> bool {
    ts.timestamp() == ZERO_TIME_UNIX && ts.timestamp_subsec_nanos() == 0
}

pub fn memo(memo: &str) -> AppResult<()> {
    if memo.chars().count() > MEMO_MAX_LEN {
        return Err(AppError::validation("memo exceeds maximum length"));
    }
    Ok(())
}

/// `None` or an empty string means the caller did not ask for a status.
pub fn status(raw: Option<&str>) -> AppResult<Option<ExpenseStatus>> {
    match raw {
        None | Some("") => Ok(None),
        Some(s) => ExpenseStatus::normalize(s)
            .map(Some)
            .ok_or_else(|| AppError::validation("status must be 'planned' or 'confirmed'")),
    }
}
