//! Inbound HTTP endpoint.
//!
//! One request runs the whole pipeline: read body, verify signature, parse
//! envelope, dispatch, deliver. The response only reflects the first three
//! steps; downstream failures are logged and still answered with `204`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;

use crate::event::{DispatchError, EnabledEvents, UnrecognizedFailure, WebhookEnvelope, dispatch};
use crate::relay::Relay;
use crate::signature::{self, SIGNATURE_HEADER};
use crate::transport::{
    EmailNotifier, GhostwriterNotifier, Notifier, ReqwestClient, SlackNotifier, SmtpMailer,
};

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared, read-only state of the inbound handler.
#[derive(Debug)]
pub struct AppState<H = ReqwestClient, M = SmtpMailer> {
    /// Shared webhook secret
    pub secret: String,
    /// Event kinds that are relayed
    pub enabled: EnabledEvents,
    /// Handling of failed events with an unknown tag
    pub unrecognized_failure: UnrecognizedFailure,
    /// Destinations
    pub relay: Relay<H, M>,
}

/// Builds the router serving `POST {path}`.
pub fn router<H, M>(state: Arc<AppState<H, M>>, path: &str) -> Router
where
    H: Send + Sync + 'static,
    M: Send + Sync + 'static,
    SlackNotifier<H>: Notifier,
    EmailNotifier<M>: Notifier,
    GhostwriterNotifier<H>: Notifier,
{
    Router::new()
        .route(path, post(receive::<H, M>))
        .with_state(state)
}

async fn receive<H, M>(
    State(state): State<Arc<AppState<H, M>>>,
    headers: HeaderMap,
    body: Body,
) -> StatusCode
where
    SlackNotifier<H>: Notifier,
    EmailNotifier<M>: Notifier,
    GhostwriterNotifier<H>: Notifier,
{
    let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to read request body: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };
    tracing::debug!("Received webhook ({} bytes)", body.len());

    let header = headers
        .get(SIGNATURE_HEADER)
        .map(|v| v.to_str().unwrap_or_default());
    if let Err(e) = signature::verify(&body, header, &state.secret) {
        tracing::warn!("Rejected webhook: {e}");
        return StatusCode::BAD_REQUEST;
    }

    let envelope = match WebhookEnvelope::parse(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::error!("Failed to parse webhook: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    match dispatch(&envelope, state.enabled, state.unrecognized_failure) {
        Ok(Some(record)) => {
            let report = state.relay.deliver(&record).await;
            tracing::debug!(
                "{} for campaign {}: {report}",
                record.kind(),
                record.campaign_id()
            );
        }
        Ok(None) => {
            tracing::debug!("Ignoring disabled event '{}'", envelope.message);
        }
        Err(DispatchError::UnknownEventKind(tag)) => {
            tracing::warn!("Ignoring unknown event '{tag}'");
        }
        Err(DispatchError::Parse(e)) => {
            tracing::error!("Failed to parse event details: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    }

    StatusCode::NO_CONTENT
}
