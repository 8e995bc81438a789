// SPDX-License-Identifier: MIT

//! Shared helpers for date/time handling.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// The current calendar date in UTC. All "today" semantics (the due-today
/// view, new-task defaults, deferral) are anchored here.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
