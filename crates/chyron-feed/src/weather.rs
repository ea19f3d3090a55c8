//! Current-conditions status line from the Open-Meteo forecast API.

use std::time::Duration;

use chyron_core::Icon;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::{FeedError, Result};

/// Fallback coordinates when none are configured (Warsaw).
pub const DEFAULT_LATITUDE: f64 = 52.23;
pub const DEFAULT_LONGITUDE: f64 = 21.01;
pub const DEFAULT_PLACE: &str = "Warsaw";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Status rows ride a band sized for headlines; longer text gets clipped.
const STATUS_MAX_CHARS: usize = 128;

/// Blocking weather source for one set of coordinates.
#[derive(Debug)]
pub struct OpenMeteoStatus {
    client: Client,
    url: String,
    place: String,
}

impl OpenMeteoStatus {
    /// Build a client for the given coordinates. `place` is the label the
    /// status line opens with.
    pub fn new(latitude: f64, longitude: f64, place: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let url = format!(
            "https://api.open-meteo.com/v1/forecast?latitude={latitude}&longitude={longitude}&current_weather=true&timezone=auto"
        );

        Ok(Self {
            client,
            url,
            place: place.into(),
        })
    }

    /// The default coordinates and label.
    pub fn warsaw() -> Result<Self> {
        Self::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_PLACE)
    }

    /// Fetch current conditions and format them as one status line.
    pub fn fetch(&self) -> Result<(String, Icon)> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                code: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let payload: Value = serde_json::from_str(&response.text()?)?;
        let (text, icon) = self.render_status(&payload);
        tracing::debug!(target: "chyron.feed", icon = icon.name(), text = %text, "weather status");
        Ok((text, icon))
    }

    /// Format the `current_weather` block. Missing readings degrade to the
    /// bare description; a missing weather code reads as clear sky.
    fn render_status(&self, payload: &Value) -> (String, Icon) {
        let current = payload.get("current_weather");
        let temperature = current
            .and_then(|cw| cw.get("temperature"))
            .and_then(Value::as_f64);
        let windspeed = current
            .and_then(|cw| cw.get("windspeed"))
            .and_then(Value::as_f64);
        let code = current
            .and_then(|cw| cw.get("weathercode"))
            .and_then(Value::as_i64)
            .unwrap_or(0);

        let (description, icon) = describe_code(code);
        let text = match (temperature, windspeed) {
            (Some(temp), Some(wind)) => format!(
                "{}: {temp:.1}°C, Wind {wind:.1} km/h, {description}",
                self.place
            ),
            _ => format!("{}: {description}", self.place),
        };
        (clamp_chars(text), icon)
    }
}

/// WMO weather interpretation codes, reduced to the buckets the band can
/// actually show.
fn describe_code(code: i64) -> (&'static str, Icon) {
    match code {
        0 => ("Clear", Icon::Sun),
        1 => ("Mainly Clear", Icon::Sun),
        2 => ("Partly Cloudy", Icon::Cloud),
        3 => ("Overcast", Icon::Cloud),
        45 => ("Fog", Icon::Cloud),
        51 => ("Drizzle", Icon::Rain),
        61 => ("Rain", Icon::Rain),
        71 => ("Snow", Icon::Snow),
        80 => ("Showers", Icon::Rain),
        95 => ("Thunderstorm", Icon::Thunder),
        _ => ("Unknown", Icon::Cloud),
    }
}

fn clamp_chars(text: String) -> String {
    if text.chars().count() <= STATUS_MAX_CHARS {
        return text;
    }
    let mut clipped: String = text.chars().take(STATUS_MAX_CHARS - 4).collect();
    clipped.push('.');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn warsaw() -> OpenMeteoStatus {
        OpenMeteoStatus::warsaw().unwrap()
    }

    #[test]
    fn full_reading_formats_temperature_wind_and_description() {
        let payload = json!({
            "latitude": 52.23,
            "longitude": 21.01,
            "current_weather": {
                "temperature": 12.3,
                "windspeed": 4.5,
                "weathercode": 0
            }
        });
        let (text, icon) = warsaw().render_status(&payload);
        assert_eq!(text, "Warsaw: 12.3°C, Wind 4.5 km/h, Clear");
        assert_eq!(icon, Icon::Sun);
    }

    #[test]
    fn missing_wind_degrades_to_description_only() {
        let payload = json!({
            "current_weather": { "temperature": 3.0, "weathercode": 3 }
        });
        let (text, icon) = warsaw().render_status(&payload);
        assert_eq!(text, "Warsaw: Overcast");
        assert_eq!(icon, Icon::Cloud);
    }

    #[test]
    fn missing_block_reads_as_clear_sky() {
        let (text, icon) = warsaw().render_status(&json!({}));
        assert_eq!(text, "Warsaw: Clear");
        assert_eq!(icon, Icon::Sun);
    }

    #[test]
    fn unknown_codes_keep_the_readings() {
        let payload = json!({
            "current_weather": {
                "temperature": 1.0,
                "windspeed": 2.0,
                "weathercode": 42
            }
        });
        let (text, icon) = warsaw().render_status(&payload);
        assert_eq!(text, "Warsaw: 1.0°C, Wind 2.0 km/h, Unknown");
        assert_eq!(icon, Icon::Cloud);
    }

    #[test]
    fn code_buckets_cover_the_icon_set() {
        assert_eq!(describe_code(95), ("Thunderstorm", Icon::Thunder));
        assert_eq!(describe_code(71), ("Snow", Icon::Snow));
        assert_eq!(describe_code(80), ("Showers", Icon::Rain));
        assert_eq!(describe_code(45), ("Fog", Icon::Cloud));
    }

    #[test]
    fn overlong_status_is_clipped_with_a_terminal_dot() {
        let place = "x".repeat(200);
        let source = OpenMeteoStatus::new(0.0, 0.0, place).unwrap();
        let (text, _) = source.render_status(&json!({}));
        assert_eq!(text.chars().count(), STATUS_MAX_CHARS - 3);
        assert!(text.ends_with('.'));
        assert!(text.starts_with("xxx"));
    }
}
