//! Line-delimited JSON RPC client for the order book server.

pub mod client;
pub mod common;
pub mod transport;

pub use client::{ClientConfig, ResultEncoding, RpcClient};
pub use common::{ParamBuilder, RequestEnvelope, ResponseEnvelope, ResultObject, RpcError};
pub use transport::{Frame, Transport};
