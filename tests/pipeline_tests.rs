//! Cross-module pipeline tests
//!
//! Drives extraction, validation and route assembly together, without any
//! network access.

use serde_json::json;

use daytrip::extract::{extract_places, validate_places};
use daytrip::models::Coordinate;
use daytrip::route::{RouteOutcome, annotate_route, waypoints_param};
use daytrip::{DaytripError, itinerary};

/// A short generated itinerary carrying two marked stops.
const TWO_STOP_ITINERARY: &str = "\
### Perfect one-day itinerary

# Lunch
【狐爸生煎】
- Dining time: 12:00
- Recommended dishes: pan-fried buns

# Afternoon
【观前街】
- Visiting time: 14:00
- About: the old shopping street
";

#[test]
fn test_two_stop_scenario_extracts_in_order() {
    let places = extract_places(TWO_STOP_ITINERARY);
    assert_eq!(places, vec!["狐爸生煎", "观前街"]);
    assert!(validate_places(&places, 16).is_ok());
}

#[test]
fn test_two_stop_scenario_builds_degenerate_waypoints() {
    // With exactly two resolved coordinates the waypoint list is empty and
    // origin/destination are the first and last tokens.
    let coordinates = vec![
        Coordinate::from_token("120.622,31.305").unwrap(),
        Coordinate::from_token("120.619,31.299").unwrap(),
    ];
    assert_eq!(waypoints_param(&coordinates), "");
    assert_eq!(coordinates.first().unwrap().as_str(), "120.622,31.305");
    assert_eq!(coordinates.last().unwrap().as_str(), "120.619,31.299");
}

#[test]
fn test_extraction_order_flows_into_route_annotation() {
    let places = extract_places(TWO_STOP_ITINERARY);
    let annotated = annotate_route(json!({ "status": "1", "route": {} }), &places);

    assert_eq!(annotated["locations"], json!(["狐爸生煎", "观前街"]));
    let legs = annotated["legs"].as_array().unwrap();
    assert_eq!(legs.len(), 1);
    assert_eq!(legs[0]["start_location"], "狐爸生煎");
    assert_eq!(legs[0]["end_location"], "观前街");
}

#[test]
fn test_prompt_markers_match_what_the_extractor_scans_for() {
    // The coupling between template and extractor is the marker pair; the
    // template's own slot placeholders must round-trip through extraction.
    let prompt = itinerary::build_prompt("苏州", "gardens", "noodles");
    let places = extract_places(&prompt);
    assert!(places.contains(&"Attraction 1".to_string()));
    assert!(places.contains(&"Restaurant 2".to_string()));
}

#[test]
fn test_no_markers_yields_validation_failure_not_a_panic() {
    let places = extract_places("A plain paragraph without any marked stops.");
    assert!(places.is_empty());

    let err = validate_places(&places, 16).unwrap_err();
    assert_eq!(err.kind(), "insufficient-input");

    let outcome = RouteOutcome::failure(&err, places);
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["error"]["kind"], "insufficient-input");
    assert_eq!(value["locations"], json!([]));
}

#[test]
fn test_route_failure_payload_carries_kind_for_callers() {
    let err = DaytripError::transport("connection reset by peer");
    let outcome = RouteOutcome::failure(&err, vec!["甲地".to_string(), "乙地".to_string()]);

    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["error"]["kind"], "transport");
    assert!(
        value["error"]["message"]
            .as_str()
            .unwrap()
            .contains("connection reset")
    );
    assert_eq!(value["locations"], json!(["甲地", "乙地"]));
}
