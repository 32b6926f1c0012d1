use std::time::Duration;

/// Formats a playback position as `m:ss`.
pub fn format_time(time: Duration) -> String {
    let total_secs = time.as_secs();
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Fraction of the progress bar to the left of the pointer, suitable for seeking.
///
/// The result is not clamped. Returns `None` for a bar with no width.
pub fn seek_fraction(pointer_x: f64, bar_left: f64, bar_width: f64) -> Option<f64> {
    if bar_width <= 0.0 || !bar_width.is_finite() {
        return None;
    }
    Some((pointer_x - bar_left) / bar_width)
}
