use crate::config::SourceConfig;
use crate::core::{Extractor, WeatherSnapshot};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const MAX_LOGGED_BODY_CHARS: usize = 200;

/// Fetches one snapshot from the weather API with a single GET.
#[derive(Debug, Clone)]
pub struct HttpExtractor {
    client: Client,
    url: String,
}

impl HttpExtractor {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        if config.allow_insecure_transport {
            tracing::warn!(
                "⚠️ allow_insecure_transport is enabled: TLS certificates from {} will not be verified",
                config.api_url
            );
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.allow_insecure_transport)
            .build()
            .map_err(|e| EtlError::ExtractionError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            url: config.api_url.clone(),
        })
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn extract(&self) -> Result<WeatherSnapshot> {
        tracing::info!("🌤️ Extracting weather data from API...");
        tracing::debug!("Making API request to: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| extraction_failed(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| extraction_failed(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(extraction_failed(format!(
                "API returned status {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(data)) => {
                tracing::info!("✅ Extracted weather snapshot with {} top-level fields", data.len());
                Ok(WeatherSnapshot::new(data))
            }
            Ok(other) => Err(extraction_failed(format!(
                "Expected a JSON object, got {}",
                json_type_name(&other)
            ))),
            Err(e) => Err(extraction_failed(format!(
                "Malformed JSON body: {} ({})",
                e,
                truncate_body(&body)
            ))),
        }
    }
}

fn extraction_failed(message: String) -> EtlError {
    tracing::error!("❌ Error extracting data from API: {}", message);
    EtlError::ExtractionError { message }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_LOGGED_BODY_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_LOGGED_BODY_CHARS).collect();
        format!("{}...", head)
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
