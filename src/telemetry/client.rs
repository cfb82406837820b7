//! HTTP client for the channel feed endpoint

use crate::config::TelemetryConfig;
use crate::types::LiveReadings;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::ReadingProvider;

/// Telemetry fetch errors. All are non-fatal to the service.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    ServerError(reqwest::StatusCode),
    #[error("undecodable response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for a ThingSpeak-compatible `feeds/last.json` endpoint.
#[derive(Clone)]
pub struct ChannelClient {
    http: reqwest::Client,
    feed_url: String,
}

impl ChannelClient {
    /// Build a client from the telemetry configuration.
    ///
    /// The request timeout is fixed at construction; a slow endpoint
    /// cannot stall a refresh cycle beyond it.
    pub fn new(config: &TelemetryConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        let feed_url = format!(
            "{}/channels/{}/feeds/last.json?api_key={}",
            config.base_url.trim_end_matches('/'),
            config.channel_id,
            config.read_api_key,
        );

        Self { http, feed_url }
    }

    async fn fetch(&self) -> Result<LiveReadings, TelemetryError> {
        let resp = self.http.get(&self.feed_url).send().await?;
        if !resp.status().is_success() {
            return Err(TelemetryError::ServerError(resp.status()));
        }

        let body: Value = serde_json::from_slice(&resp.bytes().await?)?;
        let readings = LiveReadings {
            ambient: numeric_field(&body, "field1"),
            source: numeric_field(&body, "field2"),
        };
        debug!(
            ambient = ?readings.ambient,
            source = ?readings.source,
            "Fetched channel feed"
        );
        Ok(readings)
    }
}

#[async_trait]
impl ReadingProvider for ChannelClient {
    async fn latest(&self) -> Result<LiveReadings, TelemetryError> {
        self.fetch().await
    }

    fn provider_name(&self) -> &str {
        "channel-feed"
    }
}

/// Extract a numeric reading from a feed field.
///
/// The channel reports values either as JSON numbers or as numeric
/// strings; anything else (absent, null, non-numeric text, non-finite)
/// counts as "no live data" for that field.
fn numeric_field(body: &Value, key: &str) -> Option<f64> {
    let value = match body.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_field_from_string() {
        let body = json!({"field1": "22.5", "field2": "65.0"});
        assert_eq!(numeric_field(&body, "field1"), Some(22.5));
        assert_eq!(numeric_field(&body, "field2"), Some(65.0));
    }

    #[test]
    fn test_numeric_field_from_number() {
        let body = json!({"field1": 21.75});
        assert_eq!(numeric_field(&body, "field1"), Some(21.75));
    }

    #[test]
    fn test_missing_and_null_fields_are_none() {
        let body = json!({"field1": null, "created_at": "2026-08-30T10:00:00Z"});
        assert_eq!(numeric_field(&body, "field1"), None);
        assert_eq!(numeric_field(&body, "field2"), None);
    }

    #[test]
    fn test_non_numeric_string_is_none() {
        let body = json!({"field1": "offline"});
        assert_eq!(numeric_field(&body, "field1"), None);
    }

    #[test]
    fn test_non_finite_is_none() {
        let body = json!({"field1": "NaN", "field2": "inf"});
        assert_eq!(numeric_field(&body, "field1"), None);
        assert_eq!(numeric_field(&body, "field2"), None);
    }

    #[test]
    fn test_feed_url_shape() {
        let config = TelemetryConfig {
            base_url: "https://api.thingspeak.com/".to_string(),
            channel_id: "3111348".to_string(),
            read_api_key: "KEY".to_string(),
            ..TelemetryConfig::default()
        };
        let client = ChannelClient::new(&config);
        assert_eq!(
            client.feed_url,
            "https://api.thingspeak.com/channels/3111348/feeds/last.json?api_key=KEY"
        );
    }
}
