//! Cat facts demo
//!
//! Fetches one cat fact and appends it, with a timestamp, to the append-only
//! `cat_facts.json` demo log.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use daytrip::client::http_client;
use serde::{Deserialize, Serialize};

const FACT_URL: &str = "https://catfact.ninja/fact";
const LOG_FILE: &str = "cat_facts.json";

#[derive(Debug, Deserialize)]
struct CatFact {
    fact: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedFact {
    fact: String,
    timestamp: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("🐱 Welcome to the cat facts stand!");

    let http = http_client(Duration::from_secs(10), 3)?;
    let response = http
        .get(FACT_URL)
        .send()
        .await
        .context("Failed to fetch a cat fact")?;
    let fact: CatFact = response
        .json()
        .await
        .context("Failed to parse the cat fact response")?;

    println!("\n🐱 Did you know? {}", fact.fact);

    append_fact(Path::new(LOG_FILE), &fact.fact)?;
    println!("✅ Fact saved to {LOG_FILE}");

    Ok(())
}

/// Append a fact to the JSON log, creating the file on first use.
fn append_fact(path: &Path, fact: &str) -> Result<()> {
    let mut facts: Vec<SavedFact> = match fs::read_to_string(path) {
        Ok(content) => {
            serde_json::from_str(&content).context("Existing log file is not valid JSON")?
        }
        Err(_) => Vec::new(),
    };

    facts.push(SavedFact {
        fact: fact.to_string(),
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    });

    fs::write(path, serde_json::to_string_pretty(&facts)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_fact_creates_and_extends_log() {
        let path = std::env::temp_dir().join(format!("cat_facts_test_{}.json", std::process::id()));
        let _ = fs::remove_file(&path);

        append_fact(&path, "Cats sleep a lot.").unwrap();
        append_fact(&path, "Cats purr.").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let facts: Vec<SavedFact> = serde_json::from_str(&content).unwrap();
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].fact, "Cats sleep a lot.");
        assert_eq!(facts[1].fact, "Cats purr.");
        assert!(!facts[0].timestamp.is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_append_fact_rejects_corrupt_log() {
        let path =
            std::env::temp_dir().join(format!("cat_facts_corrupt_{}.json", std::process::id()));
        fs::write(&path, "not json").unwrap();

        assert!(append_fact(&path, "fact").is_err());

        let _ = fs::remove_file(&path);
    }
}
