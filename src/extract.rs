//! Place-name extraction from generated itinerary text
//!
//! The generator instructs the model to wrap every attraction and restaurant
//! name in `【` `】`. Extraction scans for those markers; validation turns a
//! violated convention into a typed error instead of letting an empty list
//! leak downstream.

use crate::{DaytripError, Result};

const MARK_OPEN: char = '【';
const MARK_CLOSE: char = '】';

/// Extract marked place names from itinerary text.
///
/// Names are trimmed, names of one character or less are discarded, and
/// duplicates are dropped first-occurrence-wins so the list preserves the
/// itinerary's visiting order.
#[must_use]
pub fn extract_places(text: &str) -> Vec<String> {
    let mut places: Vec<String> = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(MARK_OPEN) {
        rest = &rest[start + MARK_OPEN.len_utf8()..];
        let Some(end) = rest.find(MARK_CLOSE) else {
            break;
        };
        let name = rest[..end].trim();
        if name.chars().count() > 1 && !places.iter().any(|p| p.as_str() == name) {
            places.push(name.to_string());
        }
        rest = &rest[end + MARK_CLOSE.len_utf8()..];
    }

    places
}

/// Validate an extracted place list against the marker-convention contract.
///
/// Fewer than two names means the route cannot be planned at all; more than
/// `max_places` means the model ignored the convention and bracketed far more
/// than the template asks for.
pub fn validate_places(places: &[String], max_places: usize) -> Result<()> {
    if places.len() < 2 {
        return Err(DaytripError::insufficient_input(format!(
            "could not extract enough places from the itinerary (found {}, need at least 2)",
            places.len()
        )));
    }

    if places.len() > max_places {
        return Err(DaytripError::malformed(format!(
            "itinerary marked {} places, more than the accepted maximum of {max_places}",
            places.len()
        )));
    }

    Ok(())
}
