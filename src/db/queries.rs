use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{Booking, BookingStatus, NewBooking, Service, ServiceInput};

// ── Bookings ──

const BOOKING_COLUMNS: &str = "id, full_name, email, phone, therapist_name, booking_date, booking_time, total_amount, status, created_at";

pub fn create_booking(conn: &Connection, booking: &NewBooking) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO bookings (full_name, email, phone, therapist_name, booking_date, booking_time, total_amount)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            booking.full_name,
            booking.email,
            booking.phone,
            booking.therapist_name,
            booking.booking_date,
            booking.booking_time,
            booking.total_amount,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_bookings(
    conn: &Connection,
    status_filter: Option<BookingStatus>,
) -> rusqlite::Result<Vec<Booking>> {
    let mut stmt = match status_filter {
        Some(_) => conn.prepare(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE status = ?1 ORDER BY created_at DESC, id DESC"
        ))?,
        None => conn.prepare(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC, id DESC"
        ))?,
    };

    let rows = match status_filter {
        Some(status) => stmt.query_map(params![status], parse_booking_row)?,
        None => stmt.query_map([], parse_booking_row)?,
    };

    let bookings = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(bookings)
}

pub fn get_booking(conn: &Connection, id: i64) -> rusqlite::Result<Option<Booking>> {
    conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        parse_booking_row,
    )
    .optional()
}

/// Returns `false` when no booking has the given id.
pub fn update_booking_status(
    conn: &Connection,
    id: i64,
    status: BookingStatus,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1 WHERE id = ?2",
        params![status, id],
    )?;
    Ok(count > 0)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BookingCounts {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub cancelled: i64,
    pub completed: i64,
}

impl BookingCounts {
    pub fn for_status(&self, status: BookingStatus) -> i64 {
        match status {
            BookingStatus::Pending => self.pending,
            BookingStatus::Confirmed => self.confirmed,
            BookingStatus::Cancelled => self.cancelled,
            BookingStatus::Completed => self.completed,
        }
    }
}

pub fn count_bookings_by_status(conn: &Connection) -> rusqlite::Result<BookingCounts> {
    let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM bookings GROUP BY status")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, BookingStatus>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = BookingCounts::default();
    for row in rows {
        let (status, count) = row?;
        counts.total += count;
        match status {
            BookingStatus::Pending => counts.pending = count,
            BookingStatus::Confirmed => counts.confirmed = count,
            BookingStatus::Cancelled => counts.cancelled = count,
            BookingStatus::Completed => counts.completed = count,
        }
    }
    Ok(counts)
}

fn parse_booking_row(row: &Row) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        therapist_name: row.get(4)?,
        booking_date: row.get(5)?,
        booking_time: row.get(6)?,
        total_amount: row.get(7)?,
        status: row.get(8)?,
        created_at: row.get(9)?,
    })
}

// ── Services ──

pub fn list_services(conn: &Connection) -> rusqlite::Result<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, icon_image, created_at FROM services ORDER BY name COLLATE NOCASE ASC, id ASC",
    )?;
    let rows = stmt.query_map([], parse_service_row)?;
    let services = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(services)
}

pub fn get_service(conn: &Connection, id: i64) -> rusqlite::Result<Option<Service>> {
    conn.query_row(
        "SELECT id, name, description, icon_image, created_at FROM services WHERE id = ?1",
        params![id],
        parse_service_row,
    )
    .optional()
}

/// Outer `None` means the service does not exist; inner `None` means it has no icon.
pub fn get_service_icon(conn: &Connection, id: i64) -> rusqlite::Result<Option<Option<String>>> {
    conn.query_row(
        "SELECT icon_image FROM services WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .optional()
}

pub fn insert_service(
    conn: &Connection,
    input: &ServiceInput,
    icon_image: Option<&str>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO services (name, description, icon_image) VALUES (?1, ?2, ?3)",
        params![input.name, input.description, icon_image],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Updates name and description, leaving the icon untouched.
pub fn update_service(conn: &Connection, id: i64, input: &ServiceInput) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE services SET name = ?1, description = ?2 WHERE id = ?3",
        params![input.name, input.description, id],
    )?;
    Ok(count > 0)
}

pub fn update_service_with_icon(
    conn: &Connection,
    id: i64,
    input: &ServiceInput,
    icon_image: &str,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE services SET name = ?1, description = ?2, icon_image = ?3 WHERE id = ?4",
        params![input.name, input.description, icon_image, id],
    )?;
    Ok(count > 0)
}

pub fn delete_service(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM services WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_service_row(row: &Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        icon_image: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::{NaiveDate, NaiveTime};

    fn sample_booking(name: &str) -> NewBooking {
        NewBooking {
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "+15551234567".to_string(),
            therapist_name: Some("Maria".to_string()),
            booking_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            booking_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            total_amount: 1250.0,
        }
    }

    #[test]
    fn test_create_and_read_booking() {
        let conn = db::init_db(":memory:").unwrap();
        let id = create_booking(&conn, &sample_booking("Ana")).unwrap();

        let booking = get_booking(&conn, id).unwrap().unwrap();
        assert_eq!(booking.full_name, "Ana");
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.booking_time, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(booking.therapist_name.as_deref(), Some("Maria"));
    }

    #[test]
    fn test_update_status_touches_only_target_row() {
        let conn = db::init_db(":memory:").unwrap();
        let first = create_booking(&conn, &sample_booking("Ana")).unwrap();
        let second = create_booking(&conn, &sample_booking("Ben")).unwrap();

        assert!(update_booking_status(&conn, first, BookingStatus::Completed).unwrap());

        assert_eq!(get_booking(&conn, first).unwrap().unwrap().status, BookingStatus::Completed);
        assert_eq!(get_booking(&conn, second).unwrap().unwrap().status, BookingStatus::Pending);
    }

    #[test]
    fn test_update_status_on_missing_booking_returns_false() {
        let conn = db::init_db(":memory:").unwrap();
        assert!(!update_booking_status(&conn, 99, BookingStatus::Confirmed).unwrap());
    }

    #[test]
    fn test_list_bookings_filters_and_counts() {
        let conn = db::init_db(":memory:").unwrap();
        let a = create_booking(&conn, &sample_booking("Ana")).unwrap();
        create_booking(&conn, &sample_booking("Ben")).unwrap();
        create_booking(&conn, &sample_booking("Cy")).unwrap();
        update_booking_status(&conn, a, BookingStatus::Cancelled).unwrap();

        assert_eq!(list_bookings(&conn, None).unwrap().len(), 3);
        let cancelled = list_bookings(&conn, Some(BookingStatus::Cancelled)).unwrap();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, a);

        let counts = count_bookings_by_status(&conn).unwrap();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.for_status(BookingStatus::Cancelled), 1);
        assert_eq!(counts.completed, 0);
    }

    #[test]
    fn test_newest_bookings_come_first() {
        let conn = db::init_db(":memory:").unwrap();
        let first = create_booking(&conn, &sample_booking("Ana")).unwrap();
        let second = create_booking(&conn, &sample_booking("Ben")).unwrap();

        let ids: Vec<i64> = list_bookings(&conn, None).unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn test_services_are_listed_by_name() {
        let conn = db::init_db(":memory:").unwrap();
        for name in ["Swedish Massage", "aromatherapy", "Body Scrub"] {
            insert_service(&conn, &ServiceInput::new(name, "").unwrap(), None).unwrap();
        }

        let names: Vec<String> = list_services(&conn).unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["aromatherapy", "Body Scrub", "Swedish Massage"]);
    }

    #[test]
    fn test_service_update_keeps_icon_unless_replaced() {
        let conn = db::init_db(":memory:").unwrap();
        let input = ServiceInput::new("Facial", "30 min").unwrap();
        let id = insert_service(&conn, &input, Some("services/old.png")).unwrap();

        let renamed = ServiceInput::new("Deluxe Facial", "45 min").unwrap();
        assert!(update_service(&conn, id, &renamed).unwrap());
        let service = get_service(&conn, id).unwrap().unwrap();
        assert_eq!(service.name, "Deluxe Facial");
        assert_eq!(service.icon_image.as_deref(), Some("services/old.png"));

        assert!(update_service_with_icon(&conn, id, &renamed, "services/new.png").unwrap());
        assert_eq!(
            get_service_icon(&conn, id).unwrap(),
            Some(Some("services/new.png".to_string()))
        );
    }

    #[test]
    fn test_delete_service_removes_row() {
        let conn = db::init_db(":memory:").unwrap();
        let id = insert_service(&conn, &ServiceInput::new("Sauna", "").unwrap(), None).unwrap();

        assert_eq!(get_service_icon(&conn, id).unwrap(), Some(None));
        assert!(delete_service(&conn, id).unwrap());
        assert!(get_service(&conn, id).unwrap().is_none());
        assert!(!delete_service(&conn, id).unwrap());
    }
}
