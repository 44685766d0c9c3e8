//! Request and response models for trip planning

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::route::RouteOutcome;

/// One incoming trip-planning request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    /// City the trip takes place in
    pub location: String,
    /// Free-text user interests
    pub interests: String,
    /// Free-text dietary preferences
    pub dietary_preferences: String,
}

/// A provider coordinate token in `lng,lat` form.
///
/// The geocoding and driving-directions APIs exchange coordinates as opaque
/// `lng,lat` strings; this newtype validates the shape once at the provider
/// boundary and keeps positional order meaningful downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate(String);

impl Coordinate {
    /// Parse a provider token, requiring exactly two comma-separated floats.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let mut parts = token.split(',');
        let lng = parts.next()?.trim();
        let lat = parts.next()?.trim();
        if parts.next().is_some() {
            return None;
        }
        if lng.parse::<f64>().is_err() || lat.parse::<f64>().is_err() {
            return None;
        }
        Some(Self(format!("{lng},{lat}")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Weather section of the response: a report string or an error message
#[derive(Debug, Clone, Serialize)]
pub struct WeatherSection {
    pub report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Itinerary section of the response: generated text or an error message
#[derive(Debug, Clone, Serialize)]
pub struct ItinerarySection {
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The combined planning result returned to the caller.
///
/// Each section carries its own data or error; a failure in one never
/// suppresses the others.
#[derive(Debug, Serialize)]
pub struct TripPlan {
    pub weather: WeatherSection,
    pub itinerary: ItinerarySection,
    pub route: RouteOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_trip_request_deserializes_from_api_body() {
        let body = r#"{
            "location": "苏州",
            "interests": "history, gardens",
            "dietary_preferences": "local snacks"
        }"#;
        let request: TripRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.location, "苏州");
        assert_eq!(request.interests, "history, gardens");
        assert_eq!(request.dietary_preferences, "local snacks");
    }

    #[rstest]
    #[case("120.619585,31.299379")]
    #[case("120.6,31.3")]
    #[case(" 120.6 , 31.3 ")]
    fn test_coordinate_accepts_valid_tokens(#[case] token: &str) {
        assert!(Coordinate::from_token(token).is_some());
    }

    #[rstest]
    #[case("")]
    #[case("120.6")]
    #[case("120.6,31.3,15.0")]
    #[case("east,north")]
    fn test_coordinate_rejects_invalid_tokens(#[case] token: &str) {
        assert!(Coordinate::from_token(token).is_none());
    }

    #[test]
    fn test_coordinate_display_round_trips() {
        let coord = Coordinate::from_token("120.619585,31.299379").unwrap();
        assert_eq!(coord.to_string(), "120.619585,31.299379");
        assert_eq!(coord.as_str(), "120.619585,31.299379");
    }
}
