//! Deployment self-check
//!
//! Validates that the required environment variables are present, that the
//! configuration loads and passes validation, and that the weather and
//! chat-completion providers are reachable. Exits non-zero when any check
//! fails.

use daytrip::itinerary::ItineraryGenerator;
use daytrip::weather::WeatherClient;
use daytrip::{DaytripConfig, build_http_client};

const REQUIRED_VARS: [&str; 3] = ["AMAP_KEY", "DEEPSEEK_API_KEY", "SECRET_KEY"];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    println!("=== Daytrip deployment check ===");

    let mut all_passed = check_environment();

    let config = match check_config() {
        Some(config) => config,
        None => {
            println!("\n⚠️ Configuration did not load; skipping provider checks.");
            std::process::exit(1);
        }
    };

    all_passed &= check_providers(&config).await;

    if all_passed {
        println!("\n🎉 All checks passed. The service is ready to run.");
        println!("Start it with: cargo run");
        println!(
            "Then open http://localhost:{} in your browser.",
            config.server.port
        );
    } else {
        println!("\n⚠️ Some checks failed. Fix the issues above before deploying.");
        std::process::exit(1);
    }
}

fn check_environment() -> bool {
    println!("\nChecking environment variables...");

    let missing: Vec<&str> = REQUIRED_VARS
        .iter()
        .copied()
        .filter(|var| std::env::var(var).map(|v| v.is_empty()).unwrap_or(true))
        .collect();

    if missing.is_empty() {
        println!("✅ Environment variables are complete");
        true
    } else {
        println!("❌ Missing environment variables: {}", missing.join(", "));
        false
    }
}

fn check_config() -> Option<DaytripConfig> {
    println!("\nChecking configuration...");

    match DaytripConfig::load() {
        Ok(config) => {
            println!("✅ Configuration loaded and valid");
            Some(config)
        }
        Err(e) => {
            println!("❌ Configuration error: {e}");
            None
        }
    }
}

async fn check_providers(config: &DaytripConfig) -> bool {
    println!("\nChecking provider connectivity...");

    let http = match build_http_client(&config.amap) {
        Ok(http) => http,
        Err(e) => {
            println!("❌ Failed to build HTTP client: {e}");
            return false;
        }
    };

    let mut all_passed = true;

    let weather = WeatherClient::new(&config.amap, http.clone());
    match weather.health_check(&config.planner.city).await {
        Ok(()) => println!("✅ Weather provider reachable"),
        Err(e) => {
            println!("❌ Weather provider check failed: {e}");
            all_passed = false;
        }
    }

    let generator = ItineraryGenerator::new(&config.llm, http);
    match generator.health_check().await {
        Ok(()) => println!("✅ Chat-completion provider reachable"),
        Err(e) => {
            println!("❌ Chat-completion provider check failed: {e}");
            all_passed = false;
        }
    }

    all_passed
}
