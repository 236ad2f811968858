//! Webhook decoding and event dispatch.
//!
//! This module provides:
//! - The event taxonomy ([`EventKind`], [`EventTag`], [`EnabledEvents`])
//! - Envelope and detail decoding ([`WebhookEnvelope`], [`EventDetail`])
//! - Typed records ([`EventRecord`] and one struct per kind)
//! - The dispatcher ([`dispatch`])

mod detail;
mod dispatch;
mod envelope;
mod error;
mod kind;
mod record;

#[cfg(test)]
mod detail_tests;
#[cfg(test)]
mod dispatch_tests;
#[cfg(test)]
mod envelope_tests;
#[cfg(test)]
mod kind_tests;

pub use detail::{BrowserInfo, EventDetail, FormValues};
pub use dispatch::{UnrecognizedFailure, dispatch};
pub use envelope::WebhookEnvelope;
pub use error::{DispatchError, ParseError};
pub use kind::{EnabledEvents, EventKind, EventTag, UnknownEventName};
pub use record::{
    Clicked, ErrorSending, Event, EventRecord, Opened, Reported, Sent, Submitted,
};
