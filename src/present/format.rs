use crate::error::{DashboardError, Result};

const SUFFIXES: [&str; 6] = ["", "K", "M", "G", "T", "P"];

/// Abbreviate a magnitude for a KPI card: divide by 1000 while |value| is at
/// least 1000, then print two decimals and the matching suffix.
///
/// Values that would need a suffix past "P" are `OutOfRange`.
pub fn kpi_card_format(num: f64) -> Result<String> {
    let mut value = num;
    let mut place = 0;
    while value.abs() >= 1000.0 {
        place += 1;
        if place >= SUFFIXES.len() {
            return Err(DashboardError::OutOfRange(num));
        }
        value /= 1000.0;
    }
    Ok(format!("{:.2}{}", value, SUFFIXES[place]))
}
