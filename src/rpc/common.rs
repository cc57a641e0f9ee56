//! Shared envelope types, result codes and the error taxonomy for the
//! order book RPC protocol.
//!
//! The wire format is newline delimited JSON over a persistent TCP
//! connection. Every request carries `id = 0`: the protocol defines no
//! pipelining, so correlation is a formality rather than a sequence number.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Method namespace prefix expected by the server side RPC registry.
pub const METHOD_PREFIX: &str = "Server.";

/// Fixed request id. The protocol is strictly one request in flight.
pub const REQUEST_ID: u64 = 0;

/// Result code signalling success. Any other code (the server uses "10"
/// for generic failures, "20" for a rejected token, "30" for a stale
/// ticker, "40" for missing configuration) is an application failure
/// carried verbatim in [`RpcError::Application`].
pub const CODE_OK: &str = "0";

/// Outgoing request envelope.
///
/// `params` always holds exactly one element, built by [`ParamBuilder`].
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    pub method: String,
    pub params: Vec<Map<String, Value>>,
    pub id: u64,
}

impl RequestEnvelope {
    /// Build an envelope for a namespaced server method.
    pub fn new(method: &str, params: ParamBuilder) -> Self {
        Self {
            method: format!("{}{}", METHOD_PREFIX, method),
            params: vec![params.build()],
            id: REQUEST_ID,
        }
    }
}

/// Builder for the single parameter object of a request.
///
/// Starts from the base `{token}` record and merges caller supplied named
/// fields on top. A field named `id` stays inside the parameter object and
/// never touches the envelope id.
#[derive(Debug, Clone)]
pub struct ParamBuilder {
    params: Map<String, Value>,
}

impl ParamBuilder {
    /// Start a parameter object carrying the authentication token.
    pub fn new(token: impl Into<String>) -> Self {
        let mut params = Map::new();
        params.insert("token".to_string(), Value::String(token.into()));
        Self { params }
    }

    /// Merge a named field into the parameter object.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Finish building and return the parameter object.
    pub fn build(self) -> Map<String, Value> {
        self.params
    }
}

/// Incoming response envelope.
///
/// `id` is required by the protocol; a missing field decodes as `None`
/// and fails correlation rather than passing as a silent zero.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    pub id: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result: Value,
}

/// Unwrapped result carried inside a response envelope.
///
/// `code == "0"` signals success; any other value is an application level
/// failure described by `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultObject {
    pub code: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl ResultObject {
    /// Whether the server reported success.
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

/// Failure classes surfaced by the client.
///
/// Every condition is surfaced to the immediate caller as a distinct,
/// inspectable variant; the client never retries or swallows any of them.
/// Recovery belongs to the layer above.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// TCP establishment failure. Fatal to the client instance.
    #[error("failed to connect to rpc server {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Send/receive failure mid session, including an unexpected close.
    /// Fatal to the in-flight call.
    #[error("rpc i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// Response frame could not be decoded as a protocol envelope, or a
    /// request envelope could not be encoded.
    #[error("malformed rpc frame: {0}")]
    Decode(#[from] serde_json::Error),

    /// Envelope decoded but violates the protocol contract: wrong or
    /// missing `id` (anything but 0) or a non-null top-level `error`
    /// field.
    #[error("rpc protocol violation: expected id=0, received id={id:?}: {error:?}")]
    Protocol {
        id: Option<i64>,
        error: Option<String>,
    },

    /// Well formed envelope but application level failure: a non-zero
    /// result code, an empty order book or a null ticker sequence.
    /// `code` is the server result code when one was received.
    #[error("{message}")]
    Application {
        code: Option<String>,
        message: String,
    },
}
