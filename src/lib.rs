//! phish-notifier: Gophish webhook relay
//!
//! A library for receiving signed Gophish campaign events and relaying
//! them to Slack, email and the Ghostwriter operation log.
//!
//! The pipeline for one request:
//! [`signature`] check, [`event`] parsing and dispatch, [`render`] per
//! destination, [`transport`] delivery, all wired together by [`relay`]
//! and served by [`server`].

pub mod config;
pub mod event;
pub mod relay;
pub mod render;
pub mod server;
pub mod signature;
pub mod transport;
