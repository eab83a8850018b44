//! Issue date parsing.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, DATE_YMD};

/// Parse an issuance date as the extraction layer writes it.
///
/// Accepts DD/MM/AAAA (also with '.' or '-' separators) and ISO AAAA-MM-DD,
/// optionally followed by a time component.
pub fn parse_issue_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Some(caps) = DATE_DMY.captures(s) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = DATE_YMD.captures(s) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}
