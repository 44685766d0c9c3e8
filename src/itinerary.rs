//! Itinerary generation through a chat-completion model
//!
//! Builds the fixed day-plan prompt and submits it as a single-turn,
//! non-streaming completion. The prompt instructs the model to wrap every
//! attraction and restaurant name in `【` `】`; that marker convention is the
//! contract the place extractor depends on.

use std::time::Duration;

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::config::LlmConfig;
use crate::{DaytripError, Result};

/// System prompt sent with every generation request
const SYSTEM_PROMPT: &str =
    "You are a professional travel planner who designs sensible and fun one-day itineraries.";

/// Completions can take a while; this replaces the shared client's short
/// per-request bound for the generation call only.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for a DeepSeek-style OpenAI-compatible chat-completion endpoint
pub struct ItineraryGenerator {
    http: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    model: String,
}

impl ItineraryGenerator {
    pub fn new(config: &LlmConfig, http: ClientWithMiddleware) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        }
    }

    /// Generate itinerary text for one trip request.
    #[instrument(skip(self, interests, dietary_preferences))]
    pub async fn generate(
        &self,
        location: &str,
        interests: &str,
        dietary_preferences: &str,
    ) -> Result<String> {
        let prompt = build_prompt(location, interests, dietary_preferences);
        debug!(prompt_chars = prompt.len(), "submitting completion request");

        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "stream": false,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(COMPLETION_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "completion request failed");
            return Err(DaytripError::transport(format!(
                "chat completion failed with HTTP status {}",
                response.status()
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DaytripError::malformed("completion response contained no choices"))?;

        debug!(text_chars = text.len(), "completion received");
        Ok(text)
    }

    /// Reachability probe used by the deployment self-check: lists models,
    /// which any OpenAI-compatible endpoint answers.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(DaytripError::transport(format!(
                "chat-completion provider health check failed: {}",
                response.status()
            )))
        }
    }
}

/// Build the day-plan prompt for one trip request.
///
/// The template fixes the section structure (morning, lunch, afternoon,
/// dinner, optional evening, transportation summary) and requires the `【】`
/// markers around every extractable name.
#[must_use]
pub fn build_prompt(location: &str, interests: &str, dietary_preferences: &str) -> String {
    format!(
        "Based on the following information, plan a perfect one-day trip:\n\
         Location: {location}\n\
         Interests: {interests}\n\
         Dietary preferences: {dietary_preferences}\n\
         \n\
         Produce the itinerary in exactly this format:\n\
         \n\
         ### Perfect one-day itinerary\n\
         \n\
         # Morning\n\
         【Attraction 1】\n\
         - Visiting time: [specific time]\n\
         - About: [short introduction]\n\
         - Getting there: [how to arrive]\n\
         \n\
         【Attraction 2】\n\
         - Visiting time: [specific time]\n\
         - About: [short introduction]\n\
         - Getting there: [how to arrive]\n\
         \n\
         # Lunch\n\
         【Restaurant 1】\n\
         - Dining time: [specific time]\n\
         - Recommended dishes: [signature dishes]\n\
         - Getting there: [how to arrive]\n\
         \n\
         # Afternoon\n\
         【Attraction 3】\n\
         - Visiting time: [specific time]\n\
         - About: [short introduction]\n\
         - Getting there: [how to arrive]\n\
         \n\
         【Attraction 4】\n\
         - Visiting time: [specific time]\n\
         - About: [short introduction]\n\
         - Getting there: [how to arrive]\n\
         \n\
         # Dinner\n\
         【Restaurant 2】\n\
         - Dining time: [specific time]\n\
         - Recommended dishes: [signature dishes]\n\
         - Getting there: [how to arrive]\n\
         \n\
         # Evening (optional)\n\
         【Attraction 5】\n\
         - Visiting time: [specific time]\n\
         - About: [short introduction]\n\
         - Getting there: [how to arrive]\n\
         \n\
         # Transportation summary\n\
         - Overall transport advice for the city\n\
         - Cover public transport, taxis and walking\n\
         - Recommend useful transport apps or passes\n\
         \n\
         Rules:\n\
         1. Wrap EVERY attraction and restaurant name in 【】 so the names can be extracted for route planning.\n\
         2. Keep the schedule realistic, accounting for travel time.\n\
         3. Keep stops reasonably close together to avoid needless back-and-forth.\n\
         4. Make transport advice concrete and practical.\n\
         5. Recommend local specialties and must-see attractions."
    )
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_request_fields() {
        let prompt = build_prompt("苏州", "gardens and history", "local snacks");
        assert!(prompt.contains("Location: 苏州"));
        assert!(prompt.contains("Interests: gardens and history"));
        assert!(prompt.contains("Dietary preferences: local snacks"));
    }

    #[test]
    fn test_prompt_fixes_section_structure() {
        let prompt = build_prompt("苏州", "a", "b");
        for section in [
            "# Morning",
            "# Lunch",
            "# Afternoon",
            "# Dinner",
            "# Evening (optional)",
            "# Transportation summary",
        ] {
            assert!(prompt.contains(section), "missing section {section}");
        }
    }

    #[test]
    fn test_prompt_demands_marker_convention() {
        let prompt = build_prompt("苏州", "a", "b");
        assert!(prompt.contains("Wrap EVERY attraction and restaurant name in 【】"));
        // Template slots themselves use the markers the extractor scans for
        assert!(prompt.contains("【Attraction 1】"));
        assert!(prompt.contains("【Restaurant 2】"));
    }

    #[test]
    fn test_completion_response_parses() {
        let body = r####"{
            "id": "cmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "### Perfect one-day itinerary" }, "finish_reason": "stop" }
            ],
            "usage": { "prompt_tokens": 10, "completion_tokens": 20 }
        }"####;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content,
            "### Perfect one-day itinerary"
        );
    }
}
