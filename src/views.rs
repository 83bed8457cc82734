//! Formatting helpers and row view-models for the admin templates.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{Booking, Service};
use crate::services::assets::AssetStore;

const EXCERPT_CHARS: usize = 100;

pub fn time_ago(then: NaiveDateTime, now: NaiveDateTime) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 30 {
        plural(days, "day")
    } else {
        format_date(then.date())
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// `Jun 5, 2025`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `2:30 PM`
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Currency symbol, thousands separators, two decimals: `$1,250.00`.
pub fn format_price(amount: f64, symbol: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{:02}", cents % 100)
}

pub fn excerpt(text: &str) -> String {
    if text.chars().count() > EXCERPT_CHARS {
        let cut: String = text.chars().take(EXCERPT_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

pub struct BookingRow {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub therapist: String,
    pub date: String,
    pub time: String,
    pub amount: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub status_badge: &'static str,
    pub created: String,
}

impl BookingRow {
    pub fn new(booking: &Booking, currency: &str, now: NaiveDateTime) -> Self {
        Self {
            id: booking.id,
            full_name: booking.full_name.clone(),
            email: booking.email.clone(),
            phone: booking.phone.clone(),
            therapist: booking
                .therapist_name
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            date: format_date(booking.booking_date),
            time: format_time(booking.booking_time),
            amount: format_price(booking.total_amount, currency),
            status: booking.status.as_str(),
            status_label: booking.status.label(),
            status_badge: booking.status.badge(),
            created: time_ago(booking.created_at, now),
        }
    }
}

pub struct ServiceRow {
    pub id: i64,
    pub name: String,
    pub excerpt: String,
    pub icon_url: Option<String>,
    pub created: String,
}

impl ServiceRow {
    pub fn new(service: &Service, assets: &dyn AssetStore, now: NaiveDateTime) -> Self {
        Self {
            id: service.id,
            name: service.name.clone(),
            excerpt: excerpt(service.description.as_deref().unwrap_or("")),
            icon_url: service.icon_image.as_deref().map(|p| assets.public_url(p)),
            created: time_ago(service.created_at, now),
        }
    }
}
