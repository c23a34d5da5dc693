//! Flights

use chrono::NaiveDate;

use crate::error::{DashboardError, Result};
use crate::list::{QueryState, ResourceProfile};
use crate::source::ApiRequest;
use crate::types::Record;

pub const PATH: &str = "/flights";

/// Server-side filters kept in navigation state
pub const FILTER_KEYS: &[&str] = &["date_from", "date_to", "airline"];

pub fn profile() -> ResourceProfile {
    ResourceProfile::new("flights")
        .with_alternate_id("flight_no")
        .with_search(&["flight_no", "dep_airport", "arr_airport", "airline"])
}

pub fn page_request(query: &QueryState) -> ApiRequest {
    ApiRequest::get(PATH).with_params(query.api_params())
}

/// Check the date range of the filter form
///
/// Empty dates are allowed; present ones must be ISO dates and the range
/// must not be inverted.
pub fn validate_range(date_from: &str, date_to: &str) -> Result<()> {
    let parse = |label: &str, value: &str| -> Result<Option<NaiveDate>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| DashboardError::Validation(format!("{label} must be YYYY-MM-DD")))
    };
    let from = parse("From date", date_from)?;
    let to = parse("To date", date_to)?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(DashboardError::Validation(
                "From date is after To date".to_string(),
            ));
        }
    }
    Ok(())
}

/// "BLR → DEL" style route label
pub fn route_label(record: &Record) -> String {
    format!(
        "{} → {}",
        record.text("dep_airport").unwrap_or_else(|| "?".to_string()),
        record.text("arr_airport").unwrap_or_else(|| "?".to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_carries_filters() {
        let query = QueryState::new(1, 100).with_filter("airline", "IndiGo");
        let request = page_request(&query);
        assert_eq!(request.path, "/flights");
        assert_eq!(request.param("airline"), Some("IndiGo"));
        assert_eq!(request.param("limit"), Some("100"));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("", "").is_ok());
        assert!(validate_range("2025-01-01", "2025-01-31").is_ok());
        assert!(validate_range("2025-13-01", "").is_err());
        let err = validate_range("2025-02-01", "2025-01-01").unwrap_err();
        assert_eq!(err.user_message(), "From date is after To date");
    }

    #[test]
    fn test_route_label() {
        let flight = Record::new().with("dep_airport", "BLR").with("arr_airport", "DEL");
        assert_eq!(route_label(&flight), "BLR → DEL");
    }
}
