use std::sync::Arc;

use askama::Template;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::Form;
use chrono::Utc;
use serde::Deserialize;

use crate::auth::AdminSession;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BookingStatus, Flash};
use crate::services::bookings;
use crate::state::AppState;
use crate::templates::{BookingsPage, StatusTab, STATUS_ACTIONS};
use crate::views::BookingRow;

use super::{failure_flash, parse_id};

// GET /admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
}

pub async fn bookings_page(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Query(query): Query<BookingsQuery>,
) -> Result<Html<String>, AppError> {
    let filter = query.status.as_deref().and_then(BookingStatus::parse);
    render_bookings(&state, &session, filter, None)
}

// POST /admin/bookings
#[derive(Deserialize)]
pub struct BookingActionForm {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub booking_id: String,
    #[serde(default)]
    pub status: String,
}

pub async fn bookings_action(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Form(form): Form<BookingActionForm>,
) -> Result<Html<String>, AppError> {
    let flash = match form.action.as_str() {
        "update_status" => match parse_id(&form.booking_id) {
            Some(id) => {
                let result = state
                    .conn()
                    .and_then(|db| bookings::update_status(&db, id, &form.status));
                match result {
                    Ok(_) => Flash::success("Booking status updated successfully!"),
                    Err(e) => failure_flash(e, "Failed to update booking status."),
                }
            }
            None => Flash::danger("Invalid booking id"),
        },
        other => {
            tracing::warn!(action = other, "unknown booking action");
            Flash::danger("Unknown action")
        }
    };

    render_bookings(&state, &session, None, Some(flash))
}

fn render_bookings(
    state: &AppState,
    session: &AdminSession,
    filter: Option<BookingStatus>,
    flash: Option<Flash>,
) -> Result<Html<String>, AppError> {
    let (bookings, counts) = {
        let db = state.conn()?;
        (
            queries::list_bookings(&db, filter)?,
            queries::count_bookings_by_status(&db)?,
        )
    };

    let now = Utc::now().naive_utc();
    let page = BookingsPage {
        admin: session.username.clone(),
        flash,
        bookings: bookings
            .iter()
            .map(|b| BookingRow::new(b, &state.config.currency_symbol, now))
            .collect(),
        tabs: StatusTab::all(&counts, filter),
        counts,
        actions: STATUS_ACTIONS,
    };
    Ok(Html(page.render()?))
}
