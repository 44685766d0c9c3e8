//! Request orchestration
//!
//! Runs the pipeline strictly in sequence: weather, itinerary generation,
//! place extraction, route planning. A failure in one stage never aborts the
//! rest; each response section carries its own data or error.

use reqwest_middleware::ClientWithMiddleware;
use tracing::{info, instrument, warn};

use crate::config::DaytripConfig;
use crate::extract;
use crate::itinerary::ItineraryGenerator;
use crate::models::{ItinerarySection, TripPlan, TripRequest, WeatherSection};
use crate::route::{RouteOutcome, RoutePlanner};
use crate::weather::WeatherClient;

/// The trip-planning pipeline with its injected components
pub struct TripPlanner {
    weather: WeatherClient,
    generator: ItineraryGenerator,
    router: RoutePlanner,
    max_places: usize,
}

impl TripPlanner {
    pub fn new(config: &DaytripConfig, http: ClientWithMiddleware) -> Self {
        Self {
            weather: WeatherClient::new(&config.amap, http.clone()),
            generator: ItineraryGenerator::new(&config.llm, http.clone()),
            router: RoutePlanner::new(&config.amap, &config.planner, http),
            max_places: config.planner.max_places,
        }
    }

    /// Run the whole pipeline for one request.
    #[instrument(skip(self, request), fields(location = %request.location))]
    pub async fn plan(&self, request: &TripRequest) -> TripPlan {
        let weather = match self.weather.current_report(&request.location).await {
            Ok(report) => WeatherSection {
                report: Some(report),
                error: None,
            },
            Err(e) => {
                warn!(error = %e, "weather lookup failed");
                WeatherSection {
                    report: None,
                    error: Some(e.to_string()),
                }
            }
        };

        let (itinerary, places) = match self
            .generator
            .generate(
                &request.location,
                &request.interests,
                &request.dietary_preferences,
            )
            .await
        {
            Ok(text) => {
                let places = extract::extract_places(&text);
                info!(places = places.len(), "extracted marked places");
                (
                    ItinerarySection {
                        text: Some(text),
                        error: None,
                    },
                    places,
                )
            }
            Err(e) => {
                warn!(error = %e, "itinerary generation failed");
                (
                    ItinerarySection {
                        text: None,
                        error: Some(e.to_string()),
                    },
                    Vec::new(),
                )
            }
        };

        let route = match extract::validate_places(&places, self.max_places) {
            Ok(()) => self.router.plan(&places).await,
            Err(e) => {
                warn!(error = %e, "place validation failed");
                RouteOutcome::failure(&e, places)
            }
        };

        TripPlan {
            weather,
            itinerary,
            route,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::http_client;
    use std::time::Duration;

    /// A planner whose providers are unreachable: every outbound call fails
    /// fast, which exercises the never-abort-early contract end to end.
    fn offline_planner() -> TripPlanner {
        let mut config = DaytripConfig::default();
        config.amap.key = "test".to_string();
        config.amap.base_url = "http://127.0.0.1:9".to_string();
        config.llm.api_key = "test".to_string();
        config.llm.base_url = "http://127.0.0.1:9".to_string();
        let http = http_client(Duration::from_secs(1), 0).unwrap();
        TripPlanner::new(&config, http)
    }

    #[tokio::test]
    async fn test_every_section_reports_independently() {
        let request = TripRequest {
            location: "苏州".to_string(),
            interests: "gardens".to_string(),
            dietary_preferences: "noodles".to_string(),
        };

        let plan = offline_planner().plan(&request).await;

        // Weather failed but did not stop the rest
        assert!(plan.weather.report.is_none());
        assert!(plan.weather.error.is_some());

        // Itinerary failed, so no places could be extracted
        assert!(plan.itinerary.text.is_none());
        assert!(plan.itinerary.error.is_some());

        // ... which surfaces as an explicit insufficient-input route failure
        match plan.route {
            RouteOutcome::Failed(failure) => {
                assert_eq!(failure.error.kind, "insufficient-input");
                assert!(failure.error.message.contains("found 0"));
                assert!(failure.locations.is_empty());
            }
            RouteOutcome::Planned(_) => panic!("expected route failure"),
        }
    }

    #[tokio::test]
    async fn test_plan_serializes_with_all_sections() {
        let request = TripRequest {
            location: "苏州".to_string(),
            interests: "gardens".to_string(),
            dietary_preferences: "noodles".to_string(),
        };

        let plan = offline_planner().plan(&request).await;
        let value = serde_json::to_value(&plan).unwrap();

        assert!(value.get("weather").is_some());
        assert!(value.get("itinerary").is_some());
        assert_eq!(value["route"]["error"]["kind"], "insufficient-input");
    }
}
