//! Order book payloads returned by the RPC server.
//!
//! Levels stay as raw JSON arrays because the server emits both level2
//! pairs (`[price, size]`) and level3 triples (`[order_id, price, size]`)
//! depending on the market; typed accessors parse what callers need.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod depth;

pub use depth::{DepthRow, DepthView};

/// One price level as received, delimiter ordering preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceLevel(pub Vec<Value>);

impl PriceLevel {
    /// Price of a level2 `[price, size]` entry.
    pub fn price(&self) -> Option<Decimal> {
        self.decimal_at(0)
    }

    /// Size of a level2 `[price, size]` entry.
    pub fn size(&self) -> Option<Decimal> {
        self.decimal_at(1)
    }

    /// Parse the field at `index` as a decimal. The server emits prices
    /// and sizes as strings, but numbers are tolerated.
    pub fn decimal_at(&self, index: usize) -> Option<Decimal> {
        match self.0.get(index)? {
            Value::String(s) => Decimal::from_str(s).ok(),
            Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
            _ => None,
        }
    }
}

/// Order book snapshot: asks sorted low to high, bids high to low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
    /// Server timestamp, present on some markets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl OrderBook {
    /// Lowest ask, if any.
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Highest bid, if any.
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }
}

/// Sequenced book snapshot. `sequence == 0` marks a stale/null snapshot
/// and is rejected by the client before it reaches a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub sequence: u64,
    #[serde(default)]
    pub asks: Vec<PriceLevel>,
    #[serde(default)]
    pub bids: Vec<PriceLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_level_parses_strings_and_numbers() {
        let level: PriceLevel = serde_json::from_value(json!(["100.5", "2"])).unwrap();
        assert_eq!(level.price(), Some(Decimal::from_str("100.5").unwrap()));
        assert_eq!(level.size(), Some(Decimal::from(2)));

        let numeric: PriceLevel = serde_json::from_value(json!([99, 1.5])).unwrap();
        assert_eq!(numeric.price(), Some(Decimal::from(99)));
        assert_eq!(numeric.size(), Some(Decimal::from_str("1.5").unwrap()));
    }

    #[test]
    fn test_price_level_rejects_garbage() {
        let level: PriceLevel = serde_json::from_value(json!([null, "x"])).unwrap();
        assert_eq!(level.price(), None);
        assert_eq!(level.size(), None);
        assert_eq!(level.decimal_at(9), None);
    }

    #[test]
    fn test_order_book_round_trip_preserves_ordering() {
        let wire = json!({"asks": [["100", "1"], ["101", "3"]], "bids": [["99", "2"]]});
        let book: OrderBook = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(book.best_ask().unwrap().price(), Some(Decimal::from(100)));
        assert_eq!(book.best_bid().unwrap().price(), Some(Decimal::from(99)));
        assert_eq!(serde_json::to_value(&book).unwrap(), wire);
    }

    #[test]
    fn test_ticker_level3_triples() {
        let wire = json!({
            "sequence": 42,
            "asks": [["oid-1", "100", "1"]],
            "bids": [["oid-2", "99", "2"]]
        });
        let ticker: Ticker = serde_json::from_value(wire).unwrap();
        assert_eq!(ticker.sequence, 42);
        assert_eq!(ticker.asks[0].decimal_at(1), Some(Decimal::from(100)));
    }
}
