use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use validator::ValidationErrors;

/// Error taxonomy shared by every service. Callers can map each variant to
/// a transport-level outcome without inspecting strings.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed on `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("conflict on unique field `{field}`")]
    Conflict { field: String },

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    /// Collapses `validator` derive output into a single `Validation` error.
    pub fn from_validation_errors(errors: &ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "payload".to_string());
        AppError::Validation {
            field,
            message: common::format_validation_errors(errors),
        }
    }

    /// Turns a unique-index violation into `Conflict { field }`; any other
    /// database failure passes through unchanged.
    pub fn conflict_on_unique(err: DbErr, field: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict {
                field: field.to_string(),
            },
            _ => AppError::Db(err),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict { .. })
    }
}

/// Pagination bounds shared by every list and report operation.
pub fn check_limit(limit: u64) -> Result<(), AppError> {
    if !(1..=1000).contains(&limit) {
        return Err(AppError::validation(
            "limit",
            "limit must be between 1 and 1000",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_bounds_are_inclusive() {
        assert!(check_limit(1).is_ok());
        assert!(check_limit(1000).is_ok());
        assert!(check_limit(0).is_err());
        assert!(check_limit(1001).is_err());
    }

    #[test]
    fn non_unique_db_errors_pass_through() {
        let err = AppError::conflict_on_unique(DbErr::Custom("boom".into()), "email");
        assert!(matches!(err, AppError::Db(_)));
    }
}
