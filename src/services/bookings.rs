use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::BookingStatus;

/// Sets a booking's status. Unknown status values and unknown ids leave every row unchanged.
///
/// Transitions are not restricted: a completed booking may go back to pending.
pub fn update_status(
    conn: &Connection,
    booking_id: i64,
    requested: &str,
) -> Result<BookingStatus, AppError> {
    let status = BookingStatus::parse(requested).ok_or_else(|| {
        tracing::warn!(booking_id, requested, "rejected booking status");
        AppError::Validation("Invalid booking status".to_string())
    })?;

    if !queries::update_booking_status(conn, booking_id, status)? {
        return Err(AppError::NotFound("Booking".to_string()));
    }

    tracing::info!(booking_id, status = %status, "booking status updated");
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::NewBooking;
    use chrono::{NaiveDate, NaiveTime};

    fn seed(conn: &Connection) -> i64 {
        queries::create_booking(
            conn,
            &NewBooking {
                full_name: "Ana Cruz".to_string(),
                email: "ana@example.com".to_string(),
                phone: "+15551234567".to_string(),
                therapist_name: None,
                booking_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
                booking_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
                total_amount: 80.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_confirm_then_bogus_keeps_confirmed() {
        let conn = db::init_db(":memory:").unwrap();
        let id = seed(&conn);

        assert_eq!(update_status(&conn, id, "confirmed").unwrap(), BookingStatus::Confirmed);

        let err = update_status(&conn, id, "bogus").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let booking = queries::get_booking(&conn, id).unwrap().unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_padded_status_is_rejected() {
        let conn = db::init_db(":memory:").unwrap();
        let id = seed(&conn);

        let err = update_status(&conn, id, " confirmed ").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid booking status"));

        let booking = queries::get_booking(&conn, id).unwrap().unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
    }

    #[test]
    fn test_any_transition_is_allowed() {
        let conn = db::init_db(":memory:").unwrap();
        let id = seed(&conn);

        for status in ["completed", "pending", "cancelled", "confirmed", "pending"] {
            update_status(&conn, id, status).unwrap();
            let booking = queries::get_booking(&conn, id).unwrap().unwrap();
            assert_eq!(booking.status.as_str(), status);
        }
    }

    #[test]
    fn test_only_status_changes() {
        let conn = db::init_db(":memory:").unwrap();
        let id = seed(&conn);
        let before = queries::get_booking(&conn, id).unwrap().unwrap();

        update_status(&conn, id, "cancelled").unwrap();
        let after = queries::get_booking(&conn, id).unwrap().unwrap();

        assert_eq!(after.status, BookingStatus::Cancelled);
        assert_eq!(after.full_name, before.full_name);
        assert_eq!(after.email, before.email);
        assert_eq!(after.booking_date, before.booking_date);
        assert_eq!(after.booking_time, before.booking_time);
        assert_eq!(after.total_amount, before.total_amount);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn test_unknown_booking_is_not_found() {
        let conn = db::init_db(":memory:").unwrap();
        let err = update_status(&conn, 42, "confirmed").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
