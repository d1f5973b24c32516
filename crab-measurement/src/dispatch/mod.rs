//! Dispatch policy for order lifecycle notifications
//!
//! # Notifications
//!
//! | Handler | Host notification | Result |
//! |---------|-------------------|--------|
//! | [`on_order_place_before`](MeasurementDispatcher::on_order_place_before) | order about to be placed | identity stored on the order |
//! | [`on_order_saved`](MeasurementDispatcher::on_order_saved) | order saved | purchase / cancellation sent |
//! | [`on_credit_memo_saved`](MeasurementDispatcher::on_credit_memo_saved) | credit memo saved | refund sent |
//!
//! # Flow
//!
//! ```text
//! notification → guards → pre-send hooks → guards → build event
//!                                                        ↓
//!                              flags saved ← live send / debug send
//! ```
//!
//! Handlers never return an error: transport and persistence failures are
//! logged and reported as [`DispatchOutcome::Failed`].

mod identity;
mod purchase;
mod refund;

#[cfg(test)]
mod tests;

use crate::config::{ConfigProvider, Credentials, Ga4Settings};
use crate::hooks::HookRegistry;
use crate::identity::IdentityResolver;
use crate::repository::{OrderRepository, RepositoryError};
use crate::sender::{MeasurementRequest, MeasurementSender, SendError};
use shared::analytics::EventKind;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Why a notification did not lead to a send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Measurement protocol disabled for the order's store
    Inactive,
    /// No client id stored on the order
    MissingIdentity,
    /// Purchase already reported and the order is not canceled
    AlreadySent,
    /// Cancellation already reported, or the purchase never was
    CancellationNotReportable,
    /// Grand total is zero
    ZeroTotal,
    /// A pre-send hook set the skip flag
    VetoedByHook,
    /// API secret or measurement id missing
    MissingCredentials,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Inactive => "inactive",
            Self::MissingIdentity => "missing_identity",
            Self::AlreadySent => "already_sent",
            Self::CancellationNotReportable => "cancellation_not_reportable",
            Self::ZeroTotal => "zero_total",
            Self::VetoedByHook => "vetoed_by_hook",
            Self::MissingCredentials => "missing_credentials",
        };
        f.write_str(s)
    }
}

/// Terminal state of one notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Skipped(SkipReason),
    /// Sent to the validation endpoint, flags untouched
    SentDebug,
    /// Sent to the collect endpoint
    SentLive,
    /// Send or flag persistence failed; already logged
    Failed,
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::SentDebug | Self::SentLive)
    }
}

/// Failure inside a send attempt, logged at the handler boundary
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0}")]
    Send(#[from] SendError),

    #[error("{0}")]
    Repository(#[from] RepositoryError),
}

/// Reacts to order notifications and reports them to GA4
#[derive(Clone)]
pub struct MeasurementDispatcher {
    settings: Ga4Settings,
    sender: Arc<dyn MeasurementSender>,
    repository: Arc<dyn OrderRepository>,
    hooks: HookRegistry,
    resolver: IdentityResolver,
}

impl MeasurementDispatcher {
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        sender: Arc<dyn MeasurementSender>,
        repository: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            settings: Ga4Settings::new(config),
            sender,
            repository,
            hooks: HookRegistry::new(),
            resolver: IdentityResolver::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_resolver(mut self, resolver: IdentityResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn settings(&self) -> &Ga4Settings {
        &self.settings
    }

    /// Send through the validation endpoint and log the answer
    async fn transmit_debug(
        &self,
        kind: EventKind,
        credentials: &Credentials,
        request: &MeasurementRequest,
    ) -> Result<(), SendError> {
        let response = self.sender.send_debug(credentials, request).await?;
        tracing::info!(
            endpoint = %self.sender.endpoint(true),
            event = kind.name(),
            "Sending data to GA4 endpoint: {}",
            self.sender.endpoint(true)
        );
        tracing::info!(
            status_code = response.status_code,
            "GA4 DEBUG response -> statusCode: {}, responseBody: {}",
            response.status_code,
            response.body
        );
        for message in response.validation_messages() {
            tracing::warn!(
                field = message.field_path.as_deref().unwrap_or_default(),
                code = message.validation_code.as_deref().unwrap_or_default(),
                "GA4 validation: {}",
                message.description
            );
        }
        Ok(())
    }

    /// Send through the collect endpoint and log the payload
    async fn transmit_live(
        &self,
        kind: EventKind,
        credentials: &Credentials,
        request: &MeasurementRequest,
    ) -> Result<(), SendError> {
        self.sender.send(credentials, request).await?;
        tracing::info!(
            endpoint = %self.sender.endpoint(false),
            event = kind.name(),
            "Sending data to GA4 endpoint: {}",
            self.sender.endpoint(false)
        );
        let exported = request.export()?;
        tracing::info!(
            event = kind.name(),
            "GA4 - This data was sent for {} event {}",
            kind.name(),
            exported
        );
        Ok(())
    }
}

impl fmt::Debug for MeasurementDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementDispatcher")
            .field("hooks", &self.hooks)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

/// Log a skipped notification
fn skipped(kind: EventKind, order_ref: &str, reason: SkipReason) -> DispatchOutcome {
    tracing::debug!(event = kind.name(), order = order_ref, reason = %reason, "GA4 event skipped");
    DispatchOutcome::Skipped(reason)
}

/// Log a failed send attempt with its error chain
fn failed(kind: EventKind, order_ref: &str, err: DispatchError) -> DispatchOutcome {
    let err = anyhow::Error::new(err);
    tracing::error!(
        event = kind.name(),
        order = order_ref,
        error = %err,
        "Error in GA4 {} event. Exception message: {}",
        kind.name(),
        err
    );
    tracing::error!(event = kind.name(), order = order_ref, "{:?}", err);
    DispatchOutcome::Failed
}
