//! reqwest client for the Measurement Protocol collect endpoints

use super::{DebugResponse, MeasurementRequest, MeasurementSender, SendError};
use crate::config::{Config, Credentials, DEFAULT_ENDPOINT};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const COLLECT_PATH: &str = "mp/collect";
const DEBUG_COLLECT_PATH: &str = "debug/mp/collect";

/// HTTP client for the GA4 Measurement Protocol
#[derive(Debug, Clone)]
pub struct Ga4Client {
    client: Client,
    base_url: String,
}

impl Ga4Client {
    /// Create a client for `base_url` (e.g. "https://www.google-analytics.com")
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SendError> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    fn collect_url(&self, debug: bool) -> String {
        let path = if debug { DEBUG_COLLECT_PATH } else { COLLECT_PATH };
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post(
        &self,
        debug: bool,
        credentials: &Credentials,
        request: &MeasurementRequest,
    ) -> Result<reqwest::Response, SendError> {
        let response = self
            .client
            .post(self.collect_url(debug))
            .query(&[
                ("measurement_id", credentials.measurement_id.as_str()),
                ("api_secret", credentials.api_secret.as_str()),
            ])
            .json(request)
            .send()
            .await?;
        Ok(response)
    }
}

impl Default for Ga4Client {
    fn default() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

#[async_trait]
impl MeasurementSender for Ga4Client {
    async fn send(
        &self,
        credentials: &Credentials,
        request: &MeasurementRequest,
    ) -> Result<(), SendError> {
        let response = self.post(false, credentials, request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    async fn send_debug(
        &self,
        credentials: &Credentials,
        request: &MeasurementRequest,
    ) -> Result<DebugResponse, SendError> {
        let response = self.post(true, credentials, request).await?;
        let status_code = response.status().as_u16();
        let body = response.text().await?;

        Ok(DebugResponse { status_code, body })
    }

    fn endpoint(&self, debug: bool) -> String {
        self.collect_url(debug)
    }
}
