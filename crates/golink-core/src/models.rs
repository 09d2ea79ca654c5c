//! Data models for golink
//!
//! A `Link` maps a short, case-insensitive name to a destination URL and
//! carries a last-modified timestamp and a visit counter.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Textual form of `Link::date`: local time with numeric offset.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// A named shortcut to a URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    /// Normalized lookup key
    pub name: String,
    /// Destination URL
    pub url: String,
    /// When this link was created or last updated
    pub date: String,
    /// Number of redirects served since the last create or update
    pub visits: u64,
}

impl Link {
    /// Create a new link with zero visits, stamped with the current time
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: normalize_name(name),
            url: url.trim().to_string(),
            date: timestamp(),
            visits: 0,
        }
    }

    /// Point the link at a new URL. An update counts as a fresh link.
    pub fn reset(&mut self, url: &str) {
        self.url = url.trim().to_string();
        self.date = timestamp();
        self.visits = 0;
    }

    /// Count one successful redirect
    pub fn record_visit(&mut self) {
        self.visits = self.visits.saturating_add(1);
    }

    /// Whether this link is addressed by `name` (normalized before comparing)
    pub fn matches(&self, name: &str) -> bool {
        normalize_name(&self.name) == normalize_name(name)
    }
}

/// Trim surrounding whitespace and lower-case a link name
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Current local time in `DATE_FORMAT`
pub fn timestamp() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_link_new_normalizes() {
        let link = Link::new("  GitHub ", "  https://github.com  ");
        assert_eq!(link.name, "github");
        assert_eq!(link.url, "https://github.com");
        assert_eq!(link.visits, 0);
    }

    #[test]
    fn test_link_new_keeps_url_case() {
        let link = Link::new("docs", "https://Example.com/Path");
        assert_eq!(link.url, "https://Example.com/Path");
    }

    #[test]
    fn test_reset_clears_visits() {
        let mut link = Link::new("docs", "https://old.example.com");
        link.visits = 7;
        link.reset(" https://new.example.com ");
        assert_eq!(link.url, "https://new.example.com");
        assert_eq!(link.visits, 0);
    }

    #[test]
    fn test_record_visit() {
        let mut link = Link::new("docs", "https://example.com");
        link.record_visit();
        link.record_visit();
        assert_eq!(link.visits, 2);
    }

    #[test]
    fn test_matches_ignores_case_and_whitespace() {
        let link = Link::new("mail", "https://mail.example.com");
        assert!(link.matches("MAIL"));
        assert!(link.matches(" mail\t"));
        assert!(!link.matches("mailbox"));
    }

    #[test]
    fn test_timestamp_parses_back() {
        let ts = timestamp();
        assert!(DateTime::parse_from_str(&ts, DATE_FORMAT).is_ok());
    }

    #[test]
    fn test_link_json_field_names() {
        let link = Link {
            name: "docs".to_string(),
            url: "https://docs.rs".to_string(),
            date: "2024-03-01T09:15:00+0100".to_string(),
            visits: 3,
        };
        let value = serde_json::to_value(&link).unwrap();
        assert_eq!(value["name"], "docs");
        assert_eq!(value["url"], "https://docs.rs");
        assert_eq!(value["date"], "2024-03-01T09:15:00+0100");
        assert_eq!(value["visits"], 3);
    }

    #[test]
    fn test_negative_visits_rejected() {
        let json = r#"{"name":"a","url":"u","date":"d","visits":-1}"#;
        assert!(serde_json::from_str::<Link>(json).is_err());
    }
}
