//! Human-readable game time, e.g. `"1 hr, 2 min, 5 sec"`.

use crate::types::Millis;

/// Format `ms` as `h hr, m min, s sec`.
///
/// Seconds are rounded to the nearest whole second. Leading zero units are
/// dropped, but `sec` is always shown, so zero is `"0 sec"`. Hours are not
/// rolled into days.
pub fn format_duration(ms: Millis) -> String {
    let total_secs = ms.saturating_add(500) / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{} hr, {} min, {} sec", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{} min, {} sec", minutes, seconds)
    } else {
        format!("{} sec", seconds)
    }
}
