pub mod auth;
pub mod bookings;
pub mod health;
pub mod services;

use crate::errors::AppError;
use crate::models::Flash;

/// Banner for a failed mutation. Validation and not-found messages are shown as-is;
/// anything else is logged and replaced by `generic`.
pub(crate) fn failure_flash(err: AppError, generic: &str) -> Flash {
    match err {
        AppError::Validation(_) | AppError::NotFound(_) => Flash::danger(err.user_message()),
        other => {
            tracing::error!(error = %other, "admin action failed");
            Flash::danger(generic)
        }
    }
}

/// Positive integer ids only, as posted by the admin forms.
pub(crate) fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_must_be_positive_integers() {
        assert_eq!(parse_id("7"), Some(7));
        assert_eq!(parse_id(" 12 "), Some(12));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-3"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn test_store_failures_get_generic_banner() {
        let flash = failure_flash(
            AppError::Database(rusqlite::Error::InvalidQuery),
            "Failed to save service.",
        );
        assert_eq!(flash, Flash::danger("Failed to save service."));

        let flash = failure_flash(
            AppError::Validation("Service name is required".into()),
            "Failed to save service.",
        );
        assert_eq!(flash.message, "Service name is required");
    }
}
