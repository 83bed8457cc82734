use askama::Template;

use crate::db::queries::BookingCounts;
use crate::models::{BookingStatus, Flash};
use crate::views::{BookingRow, ServiceRow};

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub error: Option<String>,
    pub username: String,
}

pub struct StatusTab {
    pub label: &'static str,
    pub href: String,
    pub count: i64,
    pub active: bool,
}

impl StatusTab {
    pub fn all(counts: &BookingCounts, filter: Option<BookingStatus>) -> Vec<StatusTab> {
        let mut tabs = vec![StatusTab {
            label: "All",
            href: "/admin/bookings".to_string(),
            count: counts.total,
            active: filter.is_none(),
        }];
        tabs.extend(BookingStatus::ALL.into_iter().map(|status| StatusTab {
            label: status.label(),
            href: format!("/admin/bookings?status={status}"),
            count: counts.for_status(status),
            active: filter == Some(status),
        }));
        tabs
    }
}

pub struct StatusAction {
    pub status: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

pub const STATUS_ACTIONS: &[StatusAction] = &[
    StatusAction {
        status: "confirmed",
        label: "Confirm",
        icon: "check-circle text-success",
    },
    StatusAction {
        status: "completed",
        label: "Complete",
        icon: "check-all text-info",
    },
    StatusAction {
        status: "cancelled",
        label: "Cancel",
        icon: "x-circle text-danger",
    },
    StatusAction {
        status: "pending",
        label: "Mark Pending",
        icon: "hourglass-split text-warning",
    },
];

#[derive(Template)]
#[template(path = "bookings.html")]
pub struct BookingsPage {
    pub admin: String,
    pub flash: Option<Flash>,
    pub bookings: Vec<BookingRow>,
    pub counts: BookingCounts,
    pub tabs: Vec<StatusTab>,
    pub actions: &'static [StatusAction],
}

#[derive(Template)]
#[template(path = "services.html")]
pub struct ServicesPage {
    pub admin: String,
    pub flash: Option<Flash>,
    pub services: Vec<ServiceRow>,
}
