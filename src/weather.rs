//! Live weather lookup against the AMap weather API
//!
//! Returns a formatted, cat-voiced report string. The commentary lines are
//! picked at random per temperature band and condition category; the data
//! lines (condition, temperature, humidity, wind) come straight from the
//! provider.

use rand::RngExt;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, instrument, warn};

use crate::config::AmapConfig;
use crate::{DaytripError, Result};

/// Client for the AMap live-weather endpoint
pub struct WeatherClient {
    http: ClientWithMiddleware,
    key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(config: &AmapConfig, http: ClientWithMiddleware) -> Self {
        Self {
            http,
            key: config.key.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Fetch current weather for a city and format the report.
    #[instrument(skip(self))]
    pub async fn current_report(&self, city: &str) -> Result<String> {
        let url = format!("{}/weather/weatherInfo", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("key", self.key.as_str()),
                ("city", city),
                ("extensions", "base"),
                ("output", "JSON"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "weather request failed");
            return Err(DaytripError::transport(format!(
                "weather request failed with HTTP status {}",
                response.status()
            )));
        }

        let body: amap::WeatherResponse = response.json().await?;
        build_report(city, &body)
    }

    /// Reachability probe used by the deployment self-check.
    pub async fn health_check(&self, city: &str) -> Result<()> {
        let url = format!("{}/weather/weatherInfo", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("key", self.key.as_str()), ("city", city)])
            .send()
            .await?;

        if response.status().is_success() {
            debug!("weather provider reachable");
            Ok(())
        } else {
            Err(DaytripError::transport(format!(
                "weather provider health check failed: {}",
                response.status()
            )))
        }
    }
}

/// Turn a provider response into the display report.
fn build_report(city: &str, response: &amap::WeatherResponse) -> Result<String> {
    if response.status != "1" {
        return Err(DaytripError::not_found(format!(
            "weather provider returned status {} ({})",
            response.status,
            response.info.as_deref().unwrap_or("no info")
        )));
    }

    let Some(live) = response.lives.first() else {
        return Err(DaytripError::not_found(
            "weather provider returned no live observation",
        ));
    };

    let temperature: f32 = live
        .temperature
        .parse()
        .map_err(|_| DaytripError::malformed(format!("bad temperature: {}", live.temperature)))?;

    let band = TempBand::for_celsius(temperature);
    let kind = ConditionKind::for_condition(&live.weather);

    Ok(format!(
        "Meow meow~ This is the weather report for {city}! {weather_emoji}\n\
         \n\
         {condition_comment}\n\
         {band_reaction}\n\
         \n\
         {city} weather: {condition} {weather_emoji}\n\
         Temperature: {temperature}°C {band_emoji}\n\
         Humidity: {humidity}%\n\
         Wind direction: {wind_direction}\n\
         Wind force: {wind_power}\n\
         \n\
         Meow~ this temperature leaves the cat {mood} {band_emoji}\n\
         Meow~ remember to drink water and stay comfy! {weather_emoji}",
        weather_emoji = kind.emoji(),
        condition_comment = pick(kind.comments()),
        band_reaction = pick(band.reactions()),
        condition = live.weather,
        band_emoji = band.emoji(),
        humidity = live.humidity,
        wind_direction = live.winddirection,
        wind_power = live.windpower,
        mood = band.mood(),
    ))
}

fn pick<'a>(options: &[&'a str]) -> &'a str {
    options[rand::rng().random_range(0..options.len())]
}

/// Temperature bands driving the commentary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TempBand {
    Freezing,
    Cold,
    Cool,
    Warm,
    Hot,
    Scorching,
}

impl TempBand {
    fn for_celsius(temperature: f32) -> Self {
        if temperature < 0.0 {
            TempBand::Freezing
        } else if temperature < 10.0 {
            TempBand::Cold
        } else if temperature < 20.0 {
            TempBand::Cool
        } else if temperature < 30.0 {
            TempBand::Warm
        } else if temperature < 35.0 {
            TempBand::Hot
        } else {
            TempBand::Scorching
        }
    }

    fn emoji(self) -> &'static str {
        match self {
            TempBand::Freezing => "🥶",
            TempBand::Cold => "😿",
            TempBand::Cool => "😺",
            TempBand::Warm => "😸",
            TempBand::Hot => "😅",
            TempBand::Scorching => "🥵",
        }
    }

    fn mood(self) -> &'static str {
        match self {
            TempBand::Freezing => "shivering",
            TempBand::Cold => "a bit chilly",
            TempBand::Cool => "comfortable",
            TempBand::Warm => "cozy and warm",
            TempBand::Hot => "a little too hot",
            TempBand::Scorching => "melting",
        }
    }

    fn reactions(self) -> &'static [&'static str] {
        match self {
            TempBand::Freezing => &[
                "Meow! It's freezing, the cat is diving under the blanket!",
                "Meow! Turn on the heating, the cat demands it!",
                "Meow! A day for wool sweaters and warm laps!",
                "Meow! The cat is moving next to the fireplace!",
            ],
            TempBand::Cold => &[
                "Meow~ a bit cold, time to find a warm windowsill~",
                "Meow~ the cat suggests hot milk and a sunny spot~",
                "Meow~ chilly! Perfect weather for curling up on a lap~",
                "Meow~ the cat is hunting for the warmest room~",
            ],
            TempBand::Cool => &[
                "Meow~ the temperature is just right for a nap~",
                "Meow~ this is the cat's favorite kind of day~",
                "Meow~ lovely and mild, time to go exploring~",
                "Meow~ perfect weather for chasing leaves~",
            ],
            TempBand::Warm => &[
                "Meow~ wonderfully warm, the cat is off to sunbathe~",
                "Meow~ a garden nap sounds exactly right~",
                "Meow~ warm windowsills were made for days like this~",
                "Meow~ the cat is going butterfly-watching~",
            ],
            TempBand::Hot => &[
                "Meow! Quite hot, the cat is looking for shade!",
                "Meow! Fan on, please, the cat insists!",
                "Meow! A nap in the breeze is the only plan today!",
                "Meow! The cat is drinking ice water!",
            ],
            TempBand::Scorching => &[
                "Meow! Scorching! The cat is moving into the fridge!",
                "Meow! Too hot! Straight to the swimming pool!",
                "Meow! Air conditioning or nothing today!",
                "Meow! The cat is emigrating to the Arctic!",
            ],
        }
    }
}

/// Condition categories matched against the provider's condition string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConditionKind {
    Sunny,
    Cloudy,
    Overcast,
    Rain,
    Snow,
    Thunder,
    Fog,
}

impl ConditionKind {
    /// The provider reports compound Chinese condition names (`雷阵雨`,
    /// `小雪`); match by substring, thunder before rain, sunny as default.
    fn for_condition(condition: &str) -> Self {
        if condition.contains('雷') {
            ConditionKind::Thunder
        } else if condition.contains('雪') {
            ConditionKind::Snow
        } else if condition.contains('雨') {
            ConditionKind::Rain
        } else if condition.contains('雾') {
            ConditionKind::Fog
        } else if condition.contains("多云") {
            ConditionKind::Cloudy
        } else if condition.contains('阴') {
            ConditionKind::Overcast
        } else {
            ConditionKind::Sunny
        }
    }

    fn emoji(self) -> &'static str {
        match self {
            ConditionKind::Sunny | ConditionKind::Overcast | ConditionKind::Fog => "😺",
            ConditionKind::Cloudy => "😸",
            ConditionKind::Rain => "😿",
            ConditionKind::Snow => "😹",
            ConditionKind::Thunder => "🙀",
        }
    }

    fn comments(self) -> &'static [&'static str] {
        match self {
            ConditionKind::Sunny => &[
                "Meow~ a perfect day for sunbathing!",
                "Meow~ sunshine on the windowsill, nap time~",
                "Meow~ the sun is out, belly warming commences!",
                "Meow~ weather this good deserves an afternoon nap~",
            ],
            ConditionKind::Cloudy => &[
                "Meow~ clouds over the sun, still very comfy~",
                "Meow~ cloudy days are sofa-nap days~",
                "Meow~ the clouds look fluffy, the cat approves~",
                "Meow~ perfect sleeping weather~",
            ],
            ConditionKind::Overcast => &[
                "Meow~ no sun today, but still cozy~",
                "Meow~ gray skies are for windowsill dozing~",
                "Meow~ an overcast day is still a good day~",
                "Meow~ soft light, soft naps~",
            ],
            ConditionKind::Rain => &[
                "Meow~ raining, better stay indoors~",
                "Meow~ raindrops on the window sound lovely~",
                "Meow~ rainy days are lap-cuddling days~",
                "Meow~ the rain is so soothing, off to sleep~",
            ],
            ConditionKind::Snow => &[
                "Meow~ it's snowing! The cat wants a snowball!",
                "Meow~ the snowflakes look chaseable~",
                "Meow~ fresh snow, fresh paw prints~",
                "Meow~ snow outside, fireplace inside~",
            ],
            ConditionKind::Thunder => &[
                "Meow! Thunder! That is terrifying!",
                "Meow! The cat is hiding under the bed!",
                "Meow! Lightning is scary, the cat wants a hug!",
                "Meow! Blanket fort weather, definitely!",
            ],
            ConditionKind::Fog => &[
                "Meow~ foggy out there, walk carefully~",
                "Meow~ thick fog, an adventure awaits~",
                "Meow~ fog is nature's hide-and-seek~",
                "Meow~ the world looks mysterious today~",
            ],
        }
    }
}

/// AMap live-weather response structures
mod amap {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct WeatherResponse {
        pub status: String,
        pub info: Option<String>,
        #[serde(default)]
        pub lives: Vec<LiveWeather>,
    }

    #[derive(Debug, Deserialize)]
    pub struct LiveWeather {
        pub weather: String,
        pub temperature: String,
        pub humidity: String,
        pub winddirection: String,
        pub windpower: String,
    }
}
