//! Number and timestamp formatting for report output

use chrono::NaiveDateTime;

/// Format a number with thousands separators
///
/// # Examples
///
/// ```
/// use pocreport::util::format::format_number;
///
/// assert_eq!(format_number(999), "999");
/// assert_eq!(format_number(1_234_567), "1,234,567");
/// ```
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (count, c) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}

/// Wall-clock time of day for the console (`HH:MM:SS`)
pub fn format_clock(time: &NaiveDateTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Timestamp for CSV rows
///
/// Date and time are joined with `T` so the field holds no whitespace,
/// e.g. `2024-03-05T14:07:09`.
pub fn format_csv_timestamp(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M:%S")
        .to_string()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("T")
}
