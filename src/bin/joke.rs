//! Random joke demo
//!
//! Fetches one safe-mode joke and prints it inside a framed text box.

use std::time::Duration;

use anyhow::{Context, Result};
use daytrip::client::http_client;
use serde::Deserialize;

const JOKE_URL: &str = "https://v2.jokeapi.dev/joke/Any?safe-mode";
const MIN_BOX_WIDTH: usize = 40;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JokeResponse {
    Single { joke: String },
    Twopart { setup: String, delivery: String },
}

impl JokeResponse {
    fn text(self) -> String {
        match self {
            JokeResponse::Single { joke } => joke,
            JokeResponse::Twopart { setup, delivery } => format!("{setup}\n{delivery}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let http = http_client(Duration::from_secs(5), 3)?;

    let response = http
        .get(JOKE_URL)
        .send()
        .await
        .context("Failed to fetch a joke")?;
    let joke: JokeResponse = response
        .json()
        .await
        .context("Failed to parse the joke response")?;

    println!("🤣 Random joke 🤣");
    println!("{}", framed(&joke.text()));

    Ok(())
}

/// Render text inside a box of `─` and `│` characters.
fn framed(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_BOX_WIDTH);

    let mut out = String::new();
    out.push_str(&format!("┌{}┐\n", "─".repeat(width + 2)));
    for line in &lines {
        let padding = width - line.chars().count();
        out.push_str(&format!("│ {}{} │\n", line, " ".repeat(padding)));
    }
    out.push_str(&format!("└{}┘", "─".repeat(width + 2)));
    out
}
