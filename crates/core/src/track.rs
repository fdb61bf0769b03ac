//! Track field rules.

use chrono::NaiveDate;

use crate::error::CoreError;

/// Check that a track name is not blank.
pub fn validate_track_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Track name must not be empty".into()));
    }
    Ok(())
}

/// When both dates are present the end must not precede the start.
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(CoreError::Validation(format!(
                "end_date {end} is before start_date {start}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 1, d)
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(validate_date_range(date(10), date(9)).is_err());
    }

    #[test]
    fn open_or_ordered_ranges_pass() {
        assert!(validate_date_range(date(1), date(1)).is_ok());
        assert!(validate_date_range(None, date(1)).is_ok());
        assert!(validate_date_range(date(1), None).is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(validate_track_name("").is_err());
        assert!(validate_track_name("Trilha 1").is_ok());
    }
}
