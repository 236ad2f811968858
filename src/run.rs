//! Application execution logic.
//!
//! Builds the destinations from the validated config, binds the listener
//! and serves webhooks until a shutdown signal arrives.

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;

use phish_notifier::config::ValidatedConfig;
use phish_notifier::relay::Relay;
use phish_notifier::server::{self, AppState};
use phish_notifier::transport::{
    EmailNotifier, GhostwriterNotifier, Profile, ReqwestClient, SlackNotifier, SmtpMailer,
    TransportError,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to bind the listen address.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that could not be bound
        addr: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Server error: {0}")]
    Serve(#[source] io::Error),

    /// Failed to build an outbound HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Failed to build the SMTP transport.
    #[error("Failed to create SMTP transport: {0}")]
    Smtp(#[source] TransportError),
}

/// Executes the webhook server.
///
/// This function:
/// 1. Builds the destinations in the configured order
/// 2. Binds the listen address
/// 3. Serves webhooks until shutdown signal (Ctrl+C or SIGTERM)
///
/// In-flight requests are allowed to finish before returning.
///
/// # Errors
///
/// Returns an error if a client cannot be created, the address cannot be
/// bound, or the server fails.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let relay = build_relay(&config)?;
    log_destinations(&config);

    if config.dry_run {
        tracing::info!("Dry-run mode enabled - notifications will be logged but not sent");
    }

    let state = Arc::new(AppState {
        secret: config.secret,
        enabled: config.events,
        unrecognized_failure: config.unrecognized_failure,
        relay,
    });
    let app = server::router(state, &config.webhook_path);

    let addr = format!("{}:{}", config.listen_host, config.listen_port);
    let listener = TcpListener::bind((config.listen_host.as_str(), config.listen_port))
        .await
        .map_err(|source| RunError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Listening on http://{addr}{}", config.webhook_path);

    serve(listener, app, shutdown_signal()).await
}

/// Serves `app` on `listener` until `shutdown` completes.
async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), RunError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("Shutdown signal received, stopping...");
        })
        .await
        .map_err(RunError::Serve)
}

/// Creates the notifiers for every configured profile.
fn build_relay(config: &ValidatedConfig) -> Result<Relay, RunError> {
    let mut relay: Relay = Relay::new().with_dry_run(config.dry_run);

    for profile in &config.profiles {
        relay = match profile {
            Profile::Slack => match config.slack.clone() {
                Some(settings) => {
                    let client = ReqwestClient::with_timeout(config.timeout, false)
                        .map_err(RunError::HttpClient)?;
                    relay.with_slack(SlackNotifier::new(client, settings))
                }
                None => relay,
            },
            Profile::Email => match config.email.clone() {
                Some(settings) => {
                    let mailer =
                        SmtpMailer::new(&settings, config.timeout).map_err(RunError::Smtp)?;
                    relay.with_email(EmailNotifier::new(mailer, settings))
                }
                None => relay,
            },
            Profile::Ghostwriter => match config.ghostwriter.clone() {
                Some(settings) => {
                    let client =
                        ReqwestClient::with_timeout(config.timeout, settings.accept_invalid_certs)
                            .map_err(RunError::HttpClient)?;
                    relay.with_ghostwriter(GhostwriterNotifier::new(client, settings))
                }
                None => relay,
            },
        };
    }

    Ok(relay)
}

/// Logs one line per destination.
fn log_destinations(config: &ValidatedConfig) {
    if let Some(ref slack) = config.slack {
        tracing::info!(
            "slack: posting to {} as {}{}",
            slack.channel,
            slack.username,
            redacted_note(slack.options.redact)
        );
    }
    if let Some(ref email) = config.email {
        tracing::info!(
            "email: {} -> {} via {}{}",
            email.sender,
            email.recipient,
            email.host_addr,
            redacted_note(email.redact)
        );
    }
    if let Some(ref ghostwriter) = config.ghostwriter {
        tracing::info!(
            "ghostwriter: oplog {} at {}{}",
            ghostwriter.oplog_id,
            ghostwriter.endpoint,
            redacted_note(ghostwriter.redact)
        );
        if ghostwriter.accept_invalid_certs {
            tracing::warn!("ghostwriter: TLS certificate validation is disabled");
        }
    }
}

const fn redacted_note(redact: bool) -> &'static str {
    if redact { " (credentials redacted)" } else { "" }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
