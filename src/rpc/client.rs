//! RPC client for the level3 order book server.
//!
//! Builds request envelopes, dispatches them over a single TCP connection
//! and validates the response. The protocol is half duplex: one request in
//! flight, one response frame per request. An internal mutex around the
//! transport enforces that invariant, so concurrent calls queue instead of
//! corrupting the framing.

use std::io;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::book::{OrderBook, Ticker};
use crate::settings::ClientSettings;

use super::common::{
    ParamBuilder, RequestEnvelope, ResponseEnvelope, ResultObject, RpcError, REQUEST_ID,
};
use super::transport::{Frame, Transport};

/// How the server encodes the `result` field of a response.
///
/// Two dialects exist in the wild and must never be silently conflated:
/// the canonical one returns `result` (and ticker `data`) as direct JSON
/// objects, the legacy one double-encodes them as JSON strings that need a
/// second parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultEncoding {
    /// `result` and `data` are direct JSON objects. Canonical.
    #[default]
    Object,
    /// `result` and `data` are JSON-encoded strings. Legacy servers only.
    JsonString,
}

/// RPC client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server host name or address.
    pub host: String,
    /// Server TCP port.
    pub port: u16,
    /// Authentication token sent with every request.
    pub token: String,
    /// Optional I/O deadline. `None` matches the protocol default: a hung
    /// server blocks the caller indefinitely.
    pub timeout: Option<Duration>,
    /// Response dialect spoken by the server.
    pub encoding: ResultEncoding,
}

impl From<ClientSettings> for ClientConfig {
    fn from(settings: ClientSettings) -> Self {
        Self {
            host: settings.host,
            port: settings.port,
            token: settings.token,
            timeout: settings.timeout_ms.map(Duration::from_millis),
            encoding: if settings.legacy_result {
                ResultEncoding::JsonString
            } else {
                ResultEncoding::Object
            },
        }
    }
}

/// RPC client owning one connection to the order book server.
///
/// The connection is created at construction and lives until [`close`] is
/// called; there is no internal reconnection. Every failure is surfaced to
/// the caller as a distinct [`RpcError`] variant.
///
/// [`close`]: RpcClient::close
pub struct RpcClient {
    token: String,
    encoding: ResultEncoding,
    transport: Mutex<Transport>,
}

impl RpcClient {
    /// Connect to the server described by `config`.
    pub async fn connect(config: ClientConfig) -> Result<Self, RpcError> {
        let transport = Transport::open(&config.host, config.port, config.timeout).await?;
        Ok(Self {
            token: config.token,
            encoding: config.encoding,
            transport: Mutex::new(transport),
        })
    }

    /// Close the connection. Safe to call while no request is in flight.
    pub async fn close(&self) -> Result<(), RpcError> {
        self.transport.lock().await.close().await
    }

    /// Start a parameter object carrying this client's token.
    pub fn params(&self) -> ParamBuilder {
        ParamBuilder::new(&self.token)
    }

    /// Invoke a namespaced server method.
    ///
    /// The sole request construction path: prefixes `method` with
    /// `Server.`, wraps `params` into the envelope and delegates to
    /// [`execute`](RpcClient::execute).
    pub async fn call(&self, method: &str, params: ParamBuilder) -> Result<ResultObject, RpcError> {
        debug!("rpc call: {}", method);
        self.execute(RequestEnvelope::new(method, params)).await
    }

    /// Send one request envelope and validate the single response frame.
    ///
    /// The validation order is part of the contract: id mismatch is
    /// checked before the top-level error field, and the error field
    /// before the result code, so a malformed response that trips more
    /// than one condition always reports the same class.
    pub async fn execute(&self, mut envelope: RequestEnvelope) -> Result<ResultObject, RpcError> {
        // Protocol constant, never derived from caller input.
        envelope.id = REQUEST_ID;
        let mut payload = serde_json::to_vec(&envelope)?;
        payload.push(b'\n');

        // Single-flight guard: holds the transport across send and read so
        // a second call queues instead of interleaving frames.
        let frame = {
            let mut transport = self.transport.lock().await;
            transport.send_all(&payload).await?;
            transport.read_frame().await?
        };

        let line = match frame {
            Frame::Line(line) => line,
            Frame::Eof => {
                return Err(RpcError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed before response",
                )))
            }
        };

        let response: ResponseEnvelope = serde_json::from_str(&line)?;

        // A missing id fails correlation the same way a wrong one does.
        if response.id != Some(REQUEST_ID as i64) {
            return Err(RpcError::Protocol {
                id: response.id,
                error: response.error,
            });
        }

        if response.error.is_some() {
            return Err(RpcError::Protocol {
                id: response.id,
                error: response.error,
            });
        }

        let result = self.decode_result(response.result)?;
        if !result.is_ok() {
            return Err(RpcError::Application {
                code: Some(result.code.clone()),
                message: format!(
                    "rpc execute fail: {}",
                    result.error.as_deref().unwrap_or_default()
                ),
            });
        }

        Ok(result)
    }

    /// Fetch the top `depth` levels as a ticker snapshot.
    pub async fn get_ticker(&self, depth: u32) -> Result<Ticker, RpcError> {
        let result = self
            .call("GetPartOrderBook", self.params().field("number", depth))
            .await?;
        let ticker: Ticker = self.decode_data(result.data)?;
        if ticker.sequence == 0 {
            return Err(RpcError::Application {
                code: None,
                message: "rpc get ticker fail: sequence is null".to_string(),
            });
        }
        Ok(ticker)
    }

    /// Fetch the full book as a ticker snapshot.
    pub async fn get_all_ticker(&self) -> Result<Ticker, RpcError> {
        let result = self.call("GetOrderBook", self.params()).await?;
        let ticker: Ticker = self.decode_data(result.data)?;
        if ticker.sequence == 0 {
            return Err(RpcError::Application {
                code: None,
                message: "rpc get all ticker fail: sequence is null".to_string(),
            });
        }
        Ok(ticker)
    }

    /// Fetch the top `depth` levels of the order book.
    ///
    /// A book that is empty on either side is a failed snapshot, not a
    /// result. Ask/bid ordering is preserved as received.
    pub async fn get_order_book(&self, depth: u32) -> Result<OrderBook, RpcError> {
        let result = self
            .call("GetOrderBook", self.params().field("number", depth))
            .await?;
        let book: OrderBook = self.decode_data(result.data)?;
        if book.asks.is_empty() || book.bids.is_empty() {
            return Err(RpcError::Application {
                code: None,
                message: "empty order book".to_string(),
            });
        }
        Ok(book)
    }

    /// Route match events for the given order ids to a channel.
    pub async fn add_event_order_ids(
        &self,
        ids: &[String],
        channel: &str,
    ) -> Result<ResultObject, RpcError> {
        self.call(
            "AddEventOrderIdsToChannels",
            self.params().field("data", channel_map(ids, channel)),
        )
        .await
    }

    /// Route match events for the given client oids to a channel.
    pub async fn add_event_client_oids(
        &self,
        ids: &[String],
        channel: &str,
    ) -> Result<ResultObject, RpcError> {
        self.call(
            "AddEventClientOidsToChannels",
            self.params().field("data", channel_map(ids, channel)),
        )
        .await
    }

    /// Decode a response `result` field according to the dialect.
    fn decode_result(&self, result: Value) -> Result<ResultObject, RpcError> {
        match self.encoding {
            ResultEncoding::Object => Ok(serde_json::from_value(result)?),
            ResultEncoding::JsonString => {
                let text: String = serde_json::from_value(result)?;
                Ok(serde_json::from_str(&text)?)
            }
        }
    }

    /// Decode a result `data` payload according to the dialect.
    fn decode_data<T: DeserializeOwned>(&self, data: Value) -> Result<T, RpcError> {
        match self.encoding {
            ResultEncoding::Object => Ok(serde_json::from_value(data)?),
            ResultEncoding::JsonString => {
                let text: String = serde_json::from_value(data)?;
                Ok(serde_json::from_str(&text)?)
            }
        }
    }
}

/// Build the `{id: [channel]}` mapping sent to the event registration
/// methods.
fn channel_map(ids: &[String], channel: &str) -> Value {
    let mut data = serde_json::Map::new();
    for id in ids {
        data.insert(
            id.clone(),
            Value::Array(vec![Value::String(channel.to_string())]),
        );
    }
    Value::Object(data)
}
