//! Transport to the GA4 Measurement Protocol
//!
//! - [`MeasurementRequest`]: wire payload built from a [`MonetaryEvent`](shared::MonetaryEvent)
//! - [`MeasurementSender`]: live / debug send port
//! - [`Ga4Client`]: reqwest implementation

mod ga4;
mod request;

pub use ga4::Ga4Client;
pub use request::{EventParams, ItemParams, MeasurementEvent, MeasurementRequest};

use crate::config::Credentials;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Transport error
#[derive(Debug, Error)]
pub enum SendError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("Rejected by measurement endpoint (status {status}): {body}")]
    Rejected { status: u16, body: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Answer of the validation endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugResponse {
    pub status_code: u16,
    pub body: String,
}

/// Single validation finding reported by the debug endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMessage {
    #[serde(default)]
    pub field_path: Option<String>,
    pub description: String,
    #[serde(default)]
    pub validation_code: Option<String>,
}

impl DebugResponse {
    /// Findings listed in the body; empty when the payload is valid or the
    /// body is not the expected JSON
    pub fn validation_messages(&self) -> Vec<ValidationMessage> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Body {
            #[serde(default)]
            validation_messages: Vec<ValidationMessage>,
        }

        serde_json::from_str::<Body>(&self.body)
            .map(|b| b.validation_messages)
            .unwrap_or_default()
    }
}

/// Sends measurement requests for one store's credentials
#[async_trait]
pub trait MeasurementSender: Send + Sync {
    /// Send to the collect endpoint
    async fn send(
        &self,
        credentials: &Credentials,
        request: &MeasurementRequest,
    ) -> Result<(), SendError>;

    /// Send to the validation endpoint; the provider does not record the data
    async fn send_debug(
        &self,
        credentials: &Credentials,
        request: &MeasurementRequest,
    ) -> Result<DebugResponse, SendError>;

    /// Endpoint URL without credentials, for logging
    fn endpoint(&self, debug: bool) -> String;
}
