//! Ghostwriter oplog notifier over GraphQL.

use serde::{Deserialize, Serialize};

use crate::event::EventRecord;
use crate::render::{OplogEntry, RenderAudit, RenderError};

use super::{HttpClient, HttpRequest, Notifier, Profile, TransportError, ensure_success};

/// Mutation inserting one oplog entry.
pub const DEFAULT_MUTATION: &str = "\
mutation InsertGophishLog(
  $oplog: bigint!, $sourceIp: String, $tool: String, $userContext: String,
  $description: String, $output: String, $comments: String, $extraFields: jsonb!
) {
  insert_oplogEntry(objects: {
    oplog: $oplog, sourceIp: $sourceIp, tool: $tool, userContext: $userContext,
    description: $description, output: $output, comments: $comments,
    extraFields: $extraFields
  }) {
    returning { id }
  }
}";

/// Value of the `tool` variable.
const TOOL: &str = "gophish";

/// Ghostwriter destination settings.
#[derive(Clone, PartialEq, Eq)]
pub struct GhostwriterSettings {
    /// GraphQL endpoint
    pub endpoint: url::Url,
    /// Bearer token
    pub api_key: String,
    /// Oplog to append to
    pub oplog_id: i64,
    /// GraphQL document sent with every entry
    pub query: String,
    /// Omit the recipient address and submitted credentials
    pub redact: bool,
    /// Skip TLS certificate verification for self-signed servers
    pub accept_invalid_certs: bool,
}

impl std::fmt::Debug for GhostwriterSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GhostwriterSettings")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[redacted]")
            .field("oplog_id", &self.oplog_id)
            .field("redact", &self.redact)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish_non_exhaustive()
    }
}

/// Variables of the oplog mutation.
///
/// Empty optional values are omitted rather than sent as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OplogVariables {
    /// Target oplog
    pub oplog: i64,
    /// Victim address
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_ip: String,
    /// Always `gophish`
    pub tool: &'static str,
    /// Recipient address
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_context: String,
    /// Campaign and recipient identifiers
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// User agent and credentials
    #[serde(skip_serializing_if = "String::is_empty")]
    pub output: String,
    /// Event tag
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comments: String,
    /// Always an empty object
    pub extra_fields: serde_json::Value,
}

impl OplogVariables {
    /// Wraps `entry` for the oplog `oplog`.
    #[must_use]
    pub fn new(oplog: i64, entry: OplogEntry) -> Self {
        Self {
            oplog,
            source_ip: entry.source_ip,
            tool: TOOL,
            user_context: entry.user_context,
            description: entry.description,
            output: entry.output,
            comments: entry.comments,
            extra_fields: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// GraphQL request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphqlRequest {
    /// GraphQL document
    pub query: String,
    /// Mutation variables
    pub variables: OplogVariables,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    #[serde(default)]
    message: String,
}

/// Appends one oplog entry per event to a Ghostwriter server.
#[derive(Debug)]
pub struct GhostwriterNotifier<H> {
    client: H,
    settings: GhostwriterSettings,
}

impl<H> GhostwriterNotifier<H> {
    /// Creates a notifier sending through `client`.
    pub const fn new(client: H, settings: GhostwriterSettings) -> Self {
        Self { client, settings }
    }
}

impl<H: HttpClient> Notifier for GhostwriterNotifier<H> {
    type Message = GraphqlRequest;

    const PROFILE: Profile = Profile::Ghostwriter;

    fn render(&self, record: &EventRecord) -> Result<GraphqlRequest, RenderError> {
        let entry = record.render_audit(self.settings.redact);
        Ok(GraphqlRequest {
            query: self.settings.query.clone(),
            variables: OplogVariables::new(self.settings.oplog_id, entry),
        })
    }

    async fn send(&self, message: &GraphqlRequest) -> Result<(), TransportError> {
        let request = HttpRequest::post_json(self.settings.endpoint.clone(), message)?
            .with_bearer(&self.settings.api_key);
        let response = self.client.request(request).await?;
        ensure_success("Ghostwriter", &response)?;

        let body: GraphqlResponse = serde_json::from_slice(&response.body)
            .map_err(|e| TransportError::Graphql(format!("unreadable response: {e}")))?;
        match body.errors.first() {
            None => Ok(()),
            Some(first) => Err(TransportError::Graphql(first.message.clone())),
        }
    }
}
