//! The fixed calendar table used to bucket records by month.

use time::Month;

/// Short labels for the twelve calendar months, indexed 0 (January) to 11 (December).
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The zero-based index of `month`, e.g. January is 0 and December is 11.
pub fn month_index(month: Month) -> usize {
    u8::from(month) as usize - 1
}

/// Convert a zero-based month index into a [Month].
///
/// Returns `None` for any index outside `0..=11`.
pub fn month_from_index(index: u8) -> Option<Month> {
    Month::try_from(index.checked_add(1)?).ok()
}

/// The short label for `month`, e.g. "Jan".
pub fn month_label(month: Month) -> &'static str {
    MONTH_LABELS[month_index(month)]
}
