//! Version marker parsing and ordering
//!
//! Markers are ISO-8601 timestamps as returned by the API in
//! `version_created`. They may carry a `Z`, an explicit offset, or no offset
//! at all; offset-less values are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Formats with an explicit offset, tried after RFC 3339
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Formats without an offset (assumed UTC)
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a marker into a UTC instant. Returns None for empty or unparseable input.
pub fn parse_marker(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A parsed version marker that remembers its original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMarker {
    raw: String,
    instant: DateTime<Utc>,
}

impl VersionMarker {
    /// Parse a marker, keeping the text exactly as written
    pub fn parse(raw: &str) -> Option<Self> {
        parse_marker(raw).map(|instant| Self {
            raw: raw.to_string(),
            instant,
        })
    }

    /// The marker text exactly as stored
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The marker normalized to UTC
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// True if this marker is strictly later than `other`
    pub fn is_newer_than(&self, other: &VersionMarker) -> bool {
        self.instant > other.instant
    }
}

impl std::fmt::Display for VersionMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_zulu() {
        let dt = parse_marker("2024-03-01T00:00:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_offset_normalizes_to_utc() {
        let dt = parse_marker("2024-03-01T10:00:00+10:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_without_offset_is_utc() {
        let naive = parse_marker("2024-03-01T00:00:00").unwrap();
        let zulu = parse_marker("2024-03-01T00:00:00Z").unwrap();
        assert_eq!(naive, zulu);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let dt = parse_marker("2023-11-20T05:12:33.123456Z").unwrap();
        assert_eq!(dt.timestamp(), Utc.with_ymd_and_hms(2023, 11, 20, 5, 12, 33).unwrap().timestamp());
        assert!(parse_marker("2023-11-20T05:12:33.5").is_some());
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_marker("2024-03-01").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_marker("").is_none());
        assert!(parse_marker("   ").is_none());
        assert!(parse_marker("not a date").is_none());
        assert!(parse_marker("2024-13-45T00:00:00Z").is_none());
    }

    #[test]
    fn test_marker_keeps_exact_text() {
        let marker = VersionMarker::parse("  2024-03-01T00:00:00Z\n").unwrap();
        assert_eq!(marker.as_str(), "  2024-03-01T00:00:00Z\n");
        assert_eq!(marker.to_string(), "2024-03-01T00:00:00Z");
    }

    #[test]
    fn test_marker_ordering_across_offsets() {
        let earlier = VersionMarker::parse("2024-03-01T09:00:00+10:00").unwrap();
        let later = VersionMarker::parse("2024-03-01T00:00:00Z").unwrap();
        assert!(later.is_newer_than(&earlier));
        assert!(!earlier.is_newer_than(&later));
        assert!(!later.is_newer_than(&later.clone()));
    }
}
