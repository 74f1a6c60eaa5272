//! Current weather via OpenWeatherMap.
//!
//! Two chained calls: geocoding (`/geo/1.0/direct`) turns a place name into
//! coordinates, then `/data/2.5/weather` returns conditions in metric units.
//! The configured primary location skips geocoding entirely.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sommelier_config::AppConfig;
use sommelier_core::error::ToolError;
use sommelier_core::tool::{Location, WeatherLookup};
use std::time::Duration;
use tracing::{debug, warn};

const TOOL_NAME: &str = "weather";

/// Conditions for one location, as served by `/api/weather`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReading {
    pub location_label: String,
    pub temperature_celsius: Option<f64>,
    pub description: String,
    pub humidity_percent: Option<f64>,
}

impl WeatherReading {
    /// The sentence handed to the concierge as context.
    pub fn summary(&self) -> String {
        format!(
            "Current weather in {}: {}°C, {}. Humidity: {}%",
            self.location_label,
            or_na(self.temperature_celsius),
            self.description,
            or_na(self.humidity_percent),
        )
    }
}

fn or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// OpenWeatherMap client.
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    primary_label: String,
    primary_coordinates: (f64, f64),
}

impl WeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ToolError> {
        Ok(Self {
            client: crate::http_client(TOOL_NAME, timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            timeout,
            primary_label: "Napa, CA".into(),
            primary_coordinates: (38.2975, -122.2869),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ToolError> {
        let weather = &config.weather;
        Ok(Self::new(
            &weather.base_url,
            weather.api_key.clone(),
            Duration::from_secs(config.timeouts.tool_secs),
        )?
        .with_primary(
            &weather.primary_location,
            weather.primary_latitude,
            weather.primary_longitude,
        ))
    }

    /// Set the location answered from fixed coordinates.
    pub fn with_primary(mut self, label: impl Into<String>, lat: f64, lon: f64) -> Self {
        self.primary_label = label.into();
        self.primary_coordinates = (lat, lon);
        self
    }

    /// The location weather questions are answered for.
    pub fn primary_location(&self) -> Location {
        Location::named(self.primary_label.clone())
    }

    fn appid(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    async fn resolve(&self, location: &Location) -> Result<(f64, f64), ToolError> {
        match location {
            Location::Coordinates { lat, lon } => Ok((*lat, *lon)),
            Location::Named(name) if name.trim().eq_ignore_ascii_case(&self.primary_label) => {
                Ok(self.primary_coordinates)
            }
            Location::Named(name) => self.geocode(name).await,
        }
    }

    async fn geocode(&self, name: &str) -> Result<(f64, f64), ToolError> {
        let url = format!("{}/geo/1.0/direct", self.base_url);
        debug!(location = %name, "Geocoding");

        let response = self
            .client
            .get(&url)
            .query(&[("q", name), ("limit", "1"), ("appid", self.appid())])
            .send()
            .await
            .map_err(|e| crate::request_error(TOOL_NAME, self.timeout, e))?;

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), location = %name, "Geocoding failed");
            return Err(ToolError::LocationNotFound(name.into()));
        }

        let places: Vec<GeoPlace> = response
            .json()
            .await
            .map_err(|e| crate::request_error(TOOL_NAME, self.timeout, e))?;

        places
            .first()
            .map(|place| (place.lat, place.lon))
            .ok_or_else(|| ToolError::LocationNotFound(name.into()))
    }

    /// Fetch current conditions for `location`.
    pub async fn reading(&self, location: &Location) -> Result<WeatherReading, ToolError> {
        let (lat, lon) = self.resolve(location).await?;
        let url = format!("{}/data/2.5/weather", self.base_url);
        debug!(lat, lon, "Fetching current conditions");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.appid().to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| crate::request_error(TOOL_NAME, self.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::UpstreamStatus {
                tool_name: TOOL_NAME.into(),
                status: status.as_u16(),
            });
        }

        let payload: ConditionsPayload = response
            .json()
            .await
            .map_err(|e| crate::request_error(TOOL_NAME, self.timeout, e))?;

        let description = payload
            .weather
            .first()
            .and_then(|w| w.description.as_deref())
            .map_or_else(|| "N/A".to_string(), capitalize);

        Ok(WeatherReading {
            location_label: location.label(),
            temperature_celsius: payload.main.temp,
            description,
            humidity_percent: payload.main.humidity,
        })
    }

    /// Conditions as a sentence; every failure becomes an apology.
    pub async fn describe(&self, location: &Location) -> String {
        match self.reading(location).await {
            Ok(reading) => reading.summary(),
            Err(ToolError::LocationNotFound(name)) => format!(
                "Sorry, I couldn't find the coordinates for {name}. Please try another nearby city."
            ),
            Err(ToolError::UpstreamStatus { status, .. }) => format!(
                "Sorry, I'm having trouble getting the weather information right now. Error code: {status}"
            ),
            Err(e) => {
                warn!(error = %e, "Weather lookup failed");
                format!(
                    "I apologize, but I'm having trouble accessing the weather information. Please try again later. Error: {e}"
                )
            }
        }
    }
}

#[async_trait]
impl WeatherLookup for WeatherClient {
    async fn current_weather(&self, location: &Location) -> Result<String, ToolError> {
        Ok(self.describe(location).await)
    }
}

// --- OpenWeatherMap payloads (internal) ---

#[derive(Debug, Deserialize)]
struct GeoPlace {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionsPayload {
    #[serde(default)]
    main: MainBlock,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Default, Deserialize)]
struct MainBlock {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: Option<String>,
}
