//! Level3 Client - RPC client and depth view for an order book server
//!
//! This crate provides:
//!
//! - A line-delimited JSON RPC client over a persistent TCP connection
//! - Typed order book and ticker payloads
//! - A depth view that buckets price levels for console rendering
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use level3_client::{ClientConfig, ClientSettings, RpcClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = ClientSettings::load();
//!     let client = RpcClient::connect(ClientConfig::from(settings))
//!         .await
//!         .expect("connect failed");
//!     let book = client.get_order_book(11).await.expect("snapshot failed");
//!     println!("best ask: {:?}", book.best_ask());
//! }
//! ```

pub mod book;
pub mod logger;
pub mod rpc;
pub mod settings;
pub mod utility;

// Re-export commonly used types
pub use book::{DepthRow, DepthView, OrderBook, PriceLevel, Ticker};
pub use rpc::{
    ClientConfig, Frame, ParamBuilder, RequestEnvelope, ResponseEnvelope, ResultEncoding,
    ResultObject, RpcClient, RpcError, Transport,
};
pub use settings::ClientSettings;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
