//! Geocoding and driving-route planning against the AMap APIs
//!
//! Each place name is resolved with a two-pass query (city-prefixed address
//! first, bare name second), scoped to the configured city. Resolution is
//! all-or-nothing: any unresolved name fails the whole route with a payload
//! naming every failed place. A successful route is the provider document
//! augmented with the ordered `locations` list and a `legs` array pairing
//! consecutive place names.

use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use crate::config::{AmapConfig, PlannerConfig};
use crate::models::Coordinate;
use crate::{DaytripError, Result};

/// Separator between intermediate waypoints in the route request
const WAYPOINT_SEPARATOR: &str = "|";

/// Outcome of route planning: the annotated provider document, or a
/// structured failure carrying the attempted place list.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RouteOutcome {
    Planned(Value),
    Failed(RouteFailure),
}

/// Structured route failure payload
#[derive(Debug, Serialize)]
pub struct RouteFailure {
    pub error: RouteError,
    /// The full place list the route was attempted for, in order
    pub locations: Vec<String>,
}

/// Tagged error inside a route failure payload
#[derive(Debug, Serialize)]
pub struct RouteError {
    /// Stable machine-readable kind (`transport`, `not-found`, ...)
    pub kind: String,
    pub message: String,
    /// Names that failed both geocoding passes, when that is the cause
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

impl RouteOutcome {
    /// Build a failure outcome from a component error.
    #[must_use]
    pub fn failure(error: &DaytripError, locations: Vec<String>) -> Self {
        RouteOutcome::Failed(RouteFailure {
            error: RouteError {
                kind: error.kind().to_string(),
                message: error.to_string(),
                failed: Vec::new(),
            },
            locations,
        })
    }

    #[must_use]
    pub fn is_planned(&self) -> bool {
        matches!(self, RouteOutcome::Planned(_))
    }
}

/// Planner for multi-waypoint driving routes
pub struct RoutePlanner {
    http: ClientWithMiddleware,
    key: String,
    base_url: String,
    city: String,
    city_prefix: String,
}

impl RoutePlanner {
    pub fn new(amap: &AmapConfig, planner: &PlannerConfig, http: ClientWithMiddleware) -> Self {
        Self {
            http,
            key: amap.key.clone(),
            base_url: amap.base_url.clone(),
            city: planner.city.clone(),
            city_prefix: planner.city_prefix.clone(),
        }
    }

    /// Plan a driving route visiting the given places in order.
    ///
    /// Never returns an error: every failure becomes a structured
    /// `RouteOutcome::Failed`.
    #[instrument(skip(self, places), fields(place_count = places.len()))]
    pub async fn plan(&self, places: &[String]) -> RouteOutcome {
        if places.len() < 2 {
            return RouteOutcome::failure(
                &DaytripError::insufficient_input(
                    "at least two places are required to plan a route",
                ),
                places.to_vec(),
            );
        }

        let coordinates = match self.resolve_all(places).await {
            Ok(coordinates) => coordinates,
            Err(outcome) => return *outcome,
        };

        if coordinates.len() < 2 {
            return RouteOutcome::failure(
                &DaytripError::insufficient_input(
                    "could not resolve enough coordinates to plan a route",
                ),
                places.to_vec(),
            );
        }

        self.request_route(&coordinates, places).await
    }

    /// Resolve every place to a coordinate, collecting failures.
    ///
    /// All-or-nothing: one unresolved place fails the whole set.
    async fn resolve_all(
        &self,
        places: &[String],
    ) -> std::result::Result<Vec<Coordinate>, Box<RouteOutcome>> {
        let mut coordinates = Vec::with_capacity(places.len());
        let mut failed = Vec::new();

        for place in places {
            match self.resolve(place).await {
                Some(coordinate) => coordinates.push(coordinate),
                None => failed.push(place.clone()),
            }
        }

        if failed.is_empty() {
            Ok(coordinates)
        } else {
            let message = format!(
                "could not geocode the following places: {}",
                failed.join(", ")
            );
            warn!(%message, "route planning aborted");
            Err(Box::new(RouteOutcome::Failed(RouteFailure {
                error: RouteError {
                    kind: "not-found".to_string(),
                    message,
                    failed,
                },
                locations: places.to_vec(),
            })))
        }
    }

    /// Two-pass resolution for one place name.
    ///
    /// Transport and parse errors on a pass count the same as "no
    /// candidates": try the next pass, then give up on the name.
    async fn resolve(&self, place: &str) -> Option<Coordinate> {
        let prefixed = format!("{}{}", self.city_prefix, place);
        match self.geocode(&prefixed).await {
            Ok(Some(coordinate)) => {
                debug!(place, %coordinate, "resolved on primary pass");
                return Some(coordinate);
            }
            Ok(None) => debug!(place, "no candidates on primary pass"),
            Err(e) => warn!(place, error = %e, "primary geocoding pass failed"),
        }

        match self.geocode(place).await {
            Ok(Some(coordinate)) => {
                debug!(place, %coordinate, "resolved on fallback pass");
                Some(coordinate)
            }
            Ok(None) => {
                warn!(place, "no candidates on fallback pass");
                None
            }
            Err(e) => {
                warn!(place, error = %e, "fallback geocoding pass failed");
                None
            }
        }
    }

    /// One geocoding query. `Ok(None)` means the provider answered but had
    /// no candidate for the address.
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>> {
        let url = format!("{}/geocode/geo", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("key", self.key.as_str()),
                ("address", address),
                ("city", self.city.as_str()),
                ("extensions", "all"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DaytripError::transport(format!(
                "geocoding request failed with HTTP status {}",
                response.status()
            )));
        }

        let body: GeocodeResponse = response.json().await?;
        if body.status != "1" {
            return Ok(None);
        }
        let Some(candidate) = body.geocodes.first() else {
            return Ok(None);
        };

        if let Some(formatted) = &candidate.formatted_address {
            debug!(address, formatted, "geocode candidate");
        }

        let coordinate = Coordinate::from_token(&candidate.location).ok_or_else(|| {
            DaytripError::malformed(format!("bad coordinate token: {}", candidate.location))
        })?;
        Ok(Some(coordinate))
    }

    /// Issue the driving-route request and annotate the result.
    async fn request_route(&self, coordinates: &[Coordinate], places: &[String]) -> RouteOutcome {
        let origin = &coordinates[0];
        let destination = &coordinates[coordinates.len() - 1];
        let waypoints = waypoints_param(coordinates);

        debug!(%origin, %destination, waypoints, "requesting driving route");

        let url = format!("{}/direction/driving", self.base_url);
        let response = match self
            .http
            .get(&url)
            .query(&[
                ("key", self.key.as_str()),
                ("origin", origin.as_str()),
                ("destination", destination.as_str()),
                ("waypoints", waypoints.as_str()),
                ("extensions", "all"),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return RouteOutcome::failure(&e.into(), places.to_vec()),
        };

        if !response.status().is_success() {
            return RouteOutcome::failure(
                &DaytripError::transport(format!(
                    "route request failed with HTTP status {}",
                    response.status()
                )),
                places.to_vec(),
            );
        }

        let document: Value = match response.json().await {
            Ok(document) => document,
            Err(e) => return RouteOutcome::failure(&e.into(), places.to_vec()),
        };

        if document["status"] != json!("1") {
            let info = document["info"].as_str().unwrap_or("no info");
            return RouteOutcome::failure(
                &DaytripError::not_found(format!(
                    "route provider returned status {} ({info})",
                    document["status"]
                )),
                places.to_vec(),
            );
        }

        RouteOutcome::Planned(annotate_route(document, places))
    }
}

/// Intermediate waypoints between origin and destination, joined by the
/// provider separator. Empty when there are fewer than three coordinates.
#[must_use]
pub fn waypoints_param(coordinates: &[Coordinate]) -> String {
    if coordinates.len() < 3 {
        return String::new();
    }
    coordinates[1..coordinates.len() - 1]
        .iter()
        .map(Coordinate::as_str)
        .collect::<Vec<_>>()
        .join(WAYPOINT_SEPARATOR)
}

/// Attach the ordered place list and leg-level name annotations to a
/// successful provider document.
///
/// Annotation stays at the leg level: consecutive place pairs. Provider
/// `steps` are left untouched since their count has no relation to the
/// number of places.
#[must_use]
pub fn annotate_route(mut document: Value, places: &[String]) -> Value {
    document["locations"] = json!(places);
    let legs: Vec<Value> = places
        .windows(2)
        .map(|pair| {
            json!({
                "start_location": pair[0],
                "end_location": pair[1],
            })
        })
        .collect();
    document["legs"] = json!(legs);
    document
}

/// AMap geocoding response
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    geocodes: Vec<GeocodeCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    location: String,
    formatted_address: Option<String>,
}
