//! Analytics state record attached to an order
//!
//! Persisted columns on the order entity:
//!
//! | Column | Field |
//! |--------|-------|
//! | `ga_user_id` | [`AnalyticsState::client_id`] |
//! | `ga_session_id` | [`AnalyticsState::session_id`] |
//! | `ga_session_number` | [`AnalyticsState::session_number`] |
//! | `is_in_ga4` | [`AnalyticsState::sent_to_analytics`] |
//! | `is_canceled_in_ga4` | [`AnalyticsState::cancellation_sent_to_analytics`] |

use crate::analytics::Identity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity and idempotency flags of one order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AnalyticsState {
    #[serde(rename = "ga_user_id", default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(rename = "ga_session_id", default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(rename = "ga_session_number", default, skip_serializing_if = "Option::is_none")]
    pub session_number: Option<String>,
    /// Purchase reported
    #[serde(rename = "is_in_ga4", default)]
    pub sent_to_analytics: bool,
    /// Cancellation (negative purchase) reported
    #[serde(rename = "is_canceled_in_ga4", default)]
    pub cancellation_sent_to_analytics: bool,
}

impl AnalyticsState {
    /// Client id, ignoring blank values
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn has_identity(&self) -> bool {
        self.client_id().is_some()
    }

    /// Identity resolved for this order, if any
    pub fn identity(&self) -> Option<Identity> {
        self.client_id().map(|client_id| Identity {
            client_id: client_id.to_string(),
            session_id: self.session_id.clone(),
            session_number: self.session_number.clone(),
        })
    }

    pub fn set_identity(&mut self, identity: Identity) {
        self.client_id = Some(identity.client_id);
        self.session_id = identity.session_id;
        self.session_number = identity.session_number;
    }
}

/// Single persisted column of [`AnalyticsState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyticsField {
    ClientId,
    SessionId,
    SessionNumber,
    SentToAnalytics,
    CancellationSentToAnalytics,
}

impl AnalyticsField {
    /// Column name on the order entity
    pub fn column(&self) -> &'static str {
        match self {
            Self::ClientId => "ga_user_id",
            Self::SessionId => "ga_session_id",
            Self::SessionNumber => "ga_session_number",
            Self::SentToAnalytics => "is_in_ga4",
            Self::CancellationSentToAnalytics => "is_canceled_in_ga4",
        }
    }
}

impl fmt::Display for AnalyticsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_client_id_is_no_identity() {
        let state = AnalyticsState {
            client_id: Some(String::new()),
            ..Default::default()
        };
        assert!(!state.has_identity());
        assert_eq!(state.identity(), None);
    }

    #[test]
    fn test_set_identity_round_trips() {
        let mut state = AnalyticsState::default();
        state.set_identity(Identity {
            client_id: "123456789.1700000000".to_string(),
            session_id: Some("1700000000".to_string()),
            session_number: None,
        });

        let identity = state.identity().unwrap();
        assert_eq!(identity.client_id, "123456789.1700000000");
        assert_eq!(identity.session_id.as_deref(), Some("1700000000"));
        assert_eq!(identity.session_number, None);
    }

    #[test]
    fn test_serializes_with_column_names() {
        let state = AnalyticsState {
            client_id: Some("1.2".to_string()),
            sent_to_analytics: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["ga_user_id"], "1.2");
        assert_eq!(json["is_in_ga4"], true);
        assert_eq!(json["is_canceled_in_ga4"], false);
        assert!(json.get("ga_session_id").is_none());
        assert_eq!(AnalyticsField::SentToAnalytics.column(), "is_in_ga4");
    }
}
