//! Shared query parameter types for API handlers.

use bulletin_core::pagination::PageRequest;
use bulletin_core::types::Timestamp;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AppError;

/// Page-number pagination parameters (`?page=&size=`).
///
/// Both are taken as raw strings: anything missing, unparseable or
/// non-positive falls back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub size: Option<String>,
}

impl PageParams {
    pub fn to_page_request(&self) -> PageRequest {
        PageRequest::new(lenient_i64(&self.page), lenient_i64(&self.size))
    }
}

fn lenient_i64(value: &Option<String>) -> Option<i64> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

/// Query parameters for `GET /events`.
#[derive(Debug, Default, Deserialize)]
pub struct EventListParams {
    pub channel: Option<String>,
    /// RFC 3339 timestamp; events scheduled before it are excluded.
    pub since: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

impl EventListParams {
    /// Parse `since`, rejecting anything that is not RFC 3339.
    pub fn since(&self) -> Result<Option<Timestamp>, AppError> {
        self.since
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                DateTime::parse_from_rfc3339(s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| AppError::BadRequest(format!("Invalid 'since' timestamp: {e}")))
            })
            .transpose()
    }
}

/// Tag autocomplete parameters (`?query=&limit=`, or the same as a JSON body).
#[derive(Debug, Deserialize)]
pub struct TagSuggestParams {
    #[serde(default)]
    pub query: String,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn params(since: Option<&str>) -> EventListParams {
        EventListParams {
            since: since.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn since_accepts_offsets() {
        let since = params(Some("2025-12-24T10:00:00+01:00")).since().unwrap();
        assert_eq!(since, Some(Utc.with_ymd_and_hms(2025, 12, 24, 9, 0, 0).unwrap()));
    }

    #[test]
    fn blank_since_is_absent() {
        assert_eq!(params(Some(" ")).since().unwrap(), None);
        assert_eq!(params(None).since().unwrap(), None);
    }

    #[test]
    fn malformed_since_is_bad_request() {
        assert_matches!(params(Some("yesterday")).since(), Err(AppError::BadRequest(_)));
    }

    #[test]
    fn unparseable_page_falls_back_to_defaults() {
        let page = PageParams {
            page: Some("two".into()),
            size: Some("-3".into()),
        };
        assert_eq!(page.to_page_request(), PageRequest::default());

        let page = PageParams {
            page: Some("2".into()),
            size: Some("5".into()),
        };
        assert_eq!(page.to_page_request(), PageRequest { page: 2, size: 5 });
    }
}
