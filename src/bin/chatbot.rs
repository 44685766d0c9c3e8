//! Interactive demo chatbot
//!
//! A small menu-driven console program offering a random joke, an
//! inspirational quote and a random user profile, each from a public API.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use daytrip::client::http_client;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde_json::Value;

const JOKE_URL: &str = "https://v2.jokeapi.dev/joke/Any";
const QUOTE_URL: &str = "https://api.quotable.io/random";
const QUOTE_BACKUP_URL: &str = "https://api.quotable.io/quotes/random";
const USER_URL: &str = "https://randomuser.me/api/";

#[tokio::main]
async fn main() -> Result<()> {
    let http = http_client(Duration::from_secs(10), 3)?;

    println!("Welcome to the demo chatbot!");
    println!("Pick an option:");
    println!("1. Random joke");
    println!("2. Inspirational quote");
    println!("3. Random user profile");
    println!("4. Quit");

    loop {
        print!("\nEnter a choice (1-4): ");
        io::stdout().flush()?;

        let mut choice = String::new();
        if io::stdin().read_line(&mut choice)? == 0 {
            break;
        }

        let result = match choice.trim() {
            "1" => get_joke(&http).await,
            "2" => get_quote(&http).await,
            "3" => get_random_profile(&http).await,
            "4" => {
                println!("Thanks for stopping by, bye!");
                break;
            }
            _ => {
                println!("Invalid choice, try again.");
                continue;
            }
        };

        match result {
            Ok(text) => println!("\n{text}"),
            Err(e) => println!("Sorry, that went wrong: {e}"),
        }
    }

    Ok(())
}

async fn get_joke(http: &ClientWithMiddleware) -> Result<String> {
    #[derive(Deserialize)]
    #[serde(tag = "type", rename_all = "lowercase")]
    enum JokeResponse {
        Single { joke: String },
        Twopart { setup: String, delivery: String },
    }

    let response = http
        .get(JOKE_URL)
        .send()
        .await
        .context("Joke request failed")?;
    let joke: JokeResponse = response.json().await.context("Bad joke response")?;

    Ok(match joke {
        JokeResponse::Single { joke } => joke,
        JokeResponse::Twopart { setup, delivery } => format!("{setup}\n{delivery}"),
    })
}

async fn get_quote(http: &ClientWithMiddleware) -> Result<String> {
    // The primary endpoint occasionally disappears; fall back to the
    // list-shaped one.
    let value = match fetch_json(http, QUOTE_URL).await {
        Ok(value) => value,
        Err(_) => fetch_json(http, QUOTE_BACKUP_URL).await?,
    };
    format_quote(&value)
}

async fn fetch_json(http: &ClientWithMiddleware, url: &str) -> Result<Value> {
    let response = http.get(url).send().await.context("Quote request failed")?;
    let response = response
        .error_for_status()
        .context("Quote request rejected")?;
    response.json().await.context("Bad quote response")
}

/// The quote APIs answer with either one object or a one-element list.
fn format_quote(value: &Value) -> Result<String> {
    let quote = if let Some(first) = value.as_array().and_then(|list| list.first()) {
        first
    } else {
        value
    };

    let content = quote["content"]
        .as_str()
        .context("Quote response missing content")?;
    let author = quote["author"]
        .as_str()
        .context("Quote response missing author")?;
    Ok(format!("\"{content}\"\n- {author}"))
}

async fn get_random_profile(http: &ClientWithMiddleware) -> Result<String> {
    let response = http
        .get(USER_URL)
        .send()
        .await
        .context("Profile request failed")?;
    let profile: UserResponse = response.json().await.context("Bad profile response")?;

    let user = profile
        .results
        .into_iter()
        .next()
        .context("Profile response contained no users")?;
    Ok(format_profile(&user))
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    results: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct User {
    name: UserName,
    gender: String,
    email: String,
    location: UserLocation,
}

#[derive(Debug, Deserialize)]
struct UserName {
    first: String,
    last: String,
}

#[derive(Debug, Deserialize)]
struct UserLocation {
    country: String,
}

fn format_profile(user: &User) -> String {
    format!(
        "Random user profile:\n\
         Name: {} {}\n\
         Gender: {}\n\
         Email: {}\n\
         Country: {}",
        user.name.first, user.name.last, user.gender, user.email, user.location.country
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_quote_from_object() {
        let value = json!({ "content": "Stay curious.", "author": "Anonymous" });
        assert_eq!(
            format_quote(&value).unwrap(),
            "\"Stay curious.\"\n- Anonymous"
        );
    }

    #[test]
    fn test_format_quote_from_list() {
        let value = json!([{ "content": "Keep going.", "author": "Someone" }]);
        assert_eq!(format_quote(&value).unwrap(), "\"Keep going.\"\n- Someone");
    }

    #[test]
    fn test_format_quote_rejects_missing_fields() {
        let value = json!({ "author": "Nobody" });
        assert!(format_quote(&value).is_err());
    }

    #[test]
    fn test_format_profile() {
        let body = r#"{
            "results": [
                {
                    "name": { "title": "Ms", "first": "Ada", "last": "Lovelace" },
                    "gender": "female",
                    "email": "ada@example.com",
                    "location": { "country": "United Kingdom" }
                }
            ]
        }"#;
        let response: UserResponse = serde_json::from_str(body).unwrap();
        let profile = format_profile(&response.results[0]);
        assert!(profile.contains("Ada Lovelace"));
        assert!(profile.contains("United Kingdom"));
    }
}
