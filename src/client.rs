//! # Backend Client Seam
//!
//! The binder never talks to the network itself. It hands a [`BackendRequest`] to a
//! [`BackendClient`], an external collaborator that owns transport, signing and retry
//! policy. Two collaborators ship with the crate:
//!
//! - **`DryRunClient`**: logs the request and answers with an empty response object.
//!   Useful to check what a command would send.
//! - **`FixtureClient`**: serves canned JSON responses from `<dir>/<Operation>.json`.
//!
//! The real AWS SDK client lives outside this crate and plugs in through the same trait.

use crate::{CancellationToken, constants};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error used for transport causes, so any client can report its own error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The value object sent to the backend for one operation.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub operation: &'static str,
    pub members: Map<String, Value>,
}

impl BackendRequest {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            members: Map::new(),
        }
    }

    pub fn member(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never got a service answer (DNS, connect, TLS, timeouts...).
    #[error(transparent)]
    Transport(BoxError),
    /// The service answered with an error.
    #[error("[{code}] {message}")]
    Service { code: String, message: String },
}

/// One asynchronous call per operation. Implementations may reuse connections across
/// invocations; the binder only borrows the handle.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// The service endpoint requests are sent to.
    fn endpoint(&self) -> &str;

    fn region(&self) -> &str;

    async fn invoke(
        &self,
        request: &BackendRequest,
        cancellation_token: &CancellationToken,
    ) -> Result<Value, ClientError>;
}

/// Returns the regional Security Hub endpoint, e.g. `https://securityhub.eu-west-1.amazonaws.com`.
pub fn default_endpoint(region: &str) -> String {
    if region.starts_with("cn-") {
        format!(
            "https://{}.{}.amazonaws.com.cn",
            constants::SERVICE_ENDPOINT_PREFIX,
            region
        )
    } else {
        format!(
            "https://{}.{}.amazonaws.com",
            constants::SERVICE_ENDPOINT_PREFIX,
            region
        )
    }
}

/// Logs every request and returns `{}`.
#[derive(Debug, Clone)]
pub struct DryRunClient {
    region: String,
    endpoint: String,
}

impl DryRunClient {
    pub fn new(region: impl Into<String>, endpoint: Option<String>) -> Self {
        let region = region.into();
        let endpoint = endpoint.unwrap_or_else(|| default_endpoint(&region));
        Self { region, endpoint }
    }
}

#[async_trait]
impl BackendClient for DryRunClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn region(&self) -> &str {
        &self.region
    }

    async fn invoke(
        &self,
        request: &BackendRequest,
        _cancellation_token: &CancellationToken,
    ) -> Result<Value, ClientError> {
        log::info!(
            "[dry-run] {} -> {}: {}",
            request.operation,
            self.endpoint,
            Value::Object(request.members.clone())
        );
        Ok(Value::Object(Map::new()))
    }
}

/// Answers each operation with the JSON document stored in `<dir>/<Operation>.json`.
#[derive(Debug, Clone)]
pub struct FixtureClient {
    dir: PathBuf,
    region: String,
    endpoint: String,
}

impl FixtureClient {
    pub fn new(dir: impl Into<PathBuf>, region: impl Into<String>, endpoint: Option<String>) -> Self {
        let region = region.into();
        let endpoint = endpoint.unwrap_or_else(|| default_endpoint(&region));
        Self {
            dir: dir.into(),
            region,
            endpoint,
        }
    }

    fn fixture_path(&self, operation: &str) -> PathBuf {
        self.dir.join(format!("{}.json", operation))
    }
}

#[async_trait]
impl BackendClient for FixtureClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn region(&self) -> &str {
        &self.region
    }

    async fn invoke(
        &self,
        request: &BackendRequest,
        _cancellation_token: &CancellationToken,
    ) -> Result<Value, ClientError> {
        let path = self.fixture_path(request.operation);
        log::debug!(
            "Serving '{}' from fixture '{}'",
            request.operation,
            path.display()
        );

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ClientError::Service {
                    code: "ResourceNotFoundException".to_string(),
                    message: format!("No fixture found at '{}'", path.display()),
                });
            }
            Err(e) => return Err(ClientError::Transport(Box::new(e))),
        };

        serde_json::from_str(&content).map_err(|e| ClientError::Service {
            code: "SerializationException".to_string(),
            message: format!("Fixture '{}' is not valid JSON: {}", path.display(), e),
        })
    }
}
