//! Weather lookup tool backed by a wttr.in-compatible service.

use super::{Tool, ToolOutput};
use crate::config::WeatherSettings;
use crate::error::{PrataError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Timeout for weather requests.
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    city: String,
}

#[derive(Debug, Deserialize)]
struct WttrResponse {
    current_condition: Vec<CurrentCondition>,
}

#[derive(Debug, Deserialize)]
struct CurrentCondition {
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: String,
    humidity: String,
    #[serde(rename = "windspeedKmph")]
    windspeed_kmph: String,
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<ValueField>,
}

#[derive(Debug, Deserialize)]
struct ValueField {
    value: String,
}

/// Current-weather lookup for a city.
pub struct WeatherTool {
    client: reqwest::Client,
    endpoint: String,
}

impl WeatherTool {
    pub fn new(settings: &WeatherSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch(&self, city: &str) -> Result<String> {
        let url = format!("{}/{}", self.endpoint, city);
        let response: WttrResponse = self
            .client
            .get(&url)
            .query(&[("format", "j1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let current = response
            .current_condition
            .first()
            .ok_or_else(|| PrataError::Tool("weather service returned no conditions".into()))?;

        Ok(format_report(city, current))
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &'static str {
        "get_weather"
    }

    fn description(&self) -> &'static str {
        "Get the current weather for a city. \
        Use this whenever the user asks about weather conditions."
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name, e.g. 'Oslo' or 'New York'"
                }
            },
            "required": ["city"]
        })
    }

    async fn call(&self, args: serde_json::Value) -> ToolOutput {
        let args: WeatherArgs = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return ToolOutput::error(format!("Invalid weather arguments: {}", e)),
        };

        match self.fetch(&args.city).await {
            Ok(report) => ToolOutput::success(report),
            Err(e) => {
                ToolOutput::error(format!("Could not fetch weather for {}: {}", args.city, e))
            }
        }
    }
}

/// Format current conditions as a single spoken-friendly sentence.
fn format_report(city: &str, current: &CurrentCondition) -> String {
    let description = current
        .weather_desc
        .first()
        .map(|d| d.value.as_str())
        .unwrap_or("unknown conditions");

    format!(
        "Weather in {}: {}, {}°C (feels like {}°C), humidity {}%, wind {} km/h.",
        city,
        description,
        current.temp_c,
        current.feels_like_c,
        current.humidity,
        current.windspeed_kmph
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_condition() -> CurrentCondition {
        serde_json::from_value(serde_json::json!({
            "temp_C": "12",
            "FeelsLikeC": "10",
            "humidity": "81",
            "windspeedKmph": "14",
            "weatherDesc": [{ "value": "Light rain" }]
        }))
        .unwrap()
    }

    #[test]
    fn test_format_report() {
        let report = format_report("Bergen", &sample_condition());
        assert_eq!(
            report,
            "Weather in Bergen: Light rain, 12°C (feels like 10°C), humidity 81%, wind 14 km/h."
        );
    }

    #[test]
    fn test_parse_wttr_response() {
        let response: WttrResponse = serde_json::from_value(serde_json::json!({
            "current_condition": [{
                "temp_C": "3",
                "FeelsLikeC": "-1",
                "humidity": "90",
                "windspeedKmph": "22",
                "weatherDesc": [{ "value": "Snow" }]
            }]
        }))
        .unwrap();
        assert_eq!(response.current_condition[0].temp_c, "3");
    }

    #[tokio::test]
    async fn test_missing_city_argument_is_error_output() {
        let tool = WeatherTool::new(&WeatherSettings::default());
        let output = tool.call(serde_json::json!({})).await;
        assert!(output.is_error());
        assert!(output.text().contains("Invalid weather arguments"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_error_output() {
        let tool = WeatherTool::new(&WeatherSettings {
            endpoint: "http://127.0.0.1:1".to_string(),
        });
        let output = tool.call(serde_json::json!({ "city": "Oslo" })).await;
        assert!(output.is_error());
        assert!(output.text().contains("Could not fetch weather for Oslo"));
    }
}
