use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, IntoParams)]
pub struct RegistryListParams {
    /// Substring match on connector id or display name
    pub q: Option<String>,
    /// Exact category filter
    pub category: Option<String>,
}

/// Reject empty or whitespace-only required string fields
pub fn validate_required(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
