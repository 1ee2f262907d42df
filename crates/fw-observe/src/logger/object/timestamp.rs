use time::{OffsetDateTime, error::Format, macros::format_description};

use crate::logger::object::timezone::get_or_detect_local_offset;

/// Formats a point in time as a log timestamp (`YYYY-MM-DD HH:MM:SS`).
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, Format> {
    at.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
}

/// Current local time as a log timestamp.
///
/// Returns `None` when the time cannot be formatted; the caller drops the
/// log line rather than writing a partial one.
pub fn local_timestamp() -> Option<String> {
    let local = OffsetDateTime::now_utc().to_offset(get_or_detect_local_offset());
    format_timestamp(local).ok()
}
