//! Serde helpers for request bodies submitted by HTML forms.

use chrono::{DateTime, NaiveDate};
use serde::{de, Deserialize, Deserializer};

/// Deserialize an optional date, treating `""` (and whitespace) as absent.
///
/// Form inputs submit an empty string instead of omitting the field. Accepts
/// a plain `YYYY-MM-DD` date or an RFC 3339 timestamp, of which only the
/// date part is kept. Use together with `#[serde(default)]`.
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = trimmed.parse::<NaiveDate>() {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| de::Error::custom(format!("invalid date '{trimmed}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "optional_date")]
        start_date: Option<NaiveDate>,
    }

    fn parse(json: &str) -> Result<Body, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn empty_string_is_absent() {
        assert_eq!(parse(r#"{"start_date": ""}"#).unwrap().start_date, None);
        assert_eq!(parse(r#"{"start_date": "  "}"#).unwrap().start_date, None);
    }

    #[test]
    fn missing_and_null_are_absent() {
        assert_eq!(parse("{}").unwrap().start_date, None);
        assert_eq!(parse(r#"{"start_date": null}"#).unwrap().start_date, None);
    }

    #[test]
    fn plain_date_and_timestamp_are_accepted() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(
            parse(r#"{"start_date": "2024-03-01"}"#).unwrap().start_date,
            expected
        );
        assert_eq!(
            parse(r#"{"start_date": "2024-03-01T00:00:00.000Z"}"#)
                .unwrap()
                .start_date,
            expected
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse(r#"{"start_date": "tomorrow"}"#).is_err());
    }
}
