//! Depth view over an order book snapshot.
//!
//! Pure data shaping for presentation: groups price levels onto a price
//! grid, sums the sizes per bucket and caps the view to a bounded number
//! of rows. No protocol or concurrency concerns live here.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rust_decimal::Decimal;

use super::{OrderBook, PriceLevel};

/// One aggregated row of the depth view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthRow {
    pub price: Decimal,
    pub size: Decimal,
}

/// Aggregated depth: asks sorted low to high, bids high to low.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthView {
    pub asks: Vec<DepthRow>,
    pub bids: Vec<DepthRow>,
}

impl DepthView {
    /// Bucket a book onto a `group` sized price grid, keeping at most
    /// `limit` rows per side. Ask prices round up to the grid, bid prices
    /// round down, so the two sides never overlap. A zero `group` keeps
    /// raw prices.
    ///
    /// Levels whose price or size fail to parse are skipped.
    pub fn from_order_book(book: &OrderBook, group: Decimal, limit: usize) -> Self {
        let asks = bucket(&book.asks, group, Side::Ask);
        let bids = bucket(&book.bids, group, Side::Bid);

        Self {
            asks: asks
                .iter()
                .map(|(price, size)| DepthRow {
                    price: *price,
                    size: *size,
                })
                .take(limit)
                .collect(),
            bids: bids
                .iter()
                .rev()
                .map(|(price, size)| DepthRow {
                    price: *price,
                    size: *size,
                })
                .take(limit)
                .collect(),
        }
    }

    /// Render for a console: asks top down, spread marker, bids.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in self.asks.iter().rev() {
            let _ = writeln!(out, "{} => {}", row.price.normalize(), row.size.normalize());
        }
        out.push_str("---Spread---\n");
        for row in &self.bids {
            let _ = writeln!(out, "{} => {}", row.price.normalize(), row.size.normalize());
        }
        out
    }
}

enum Side {
    Ask,
    Bid,
}

fn bucket(levels: &[PriceLevel], group: Decimal, side: Side) -> BTreeMap<Decimal, Decimal> {
    let mut buckets = BTreeMap::new();
    for level in levels {
        let (price, size) = match (level.price(), level.size()) {
            (Some(price), Some(size)) => (price, size),
            _ => continue,
        };
        let key = if group.is_zero() {
            price
        } else {
            match side {
                Side::Ask => (price / group).ceil() * group,
                Side::Bid => (price / group).floor() * group,
            }
        };
        let entry = buckets.entry(key).or_insert(Decimal::ZERO);
        *entry += size;
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book(asks: serde_json::Value, bids: serde_json::Value) -> OrderBook {
        serde_json::from_value(json!({"asks": asks, "bids": bids})).unwrap()
    }

    #[test]
    fn test_bucketing_sums_sizes() {
        let book = book(
            json!([["100.2", "1"], ["100.9", "2"], ["103.1", "4"]]),
            json!([["99.8", "3"], ["99.1", "5"]]),
        );
        let view = DepthView::from_order_book(&book, Decimal::ONE, 10);

        // 100.2 and 100.9 both round up to 101.
        assert_eq!(
            view.asks,
            vec![
                DepthRow {
                    price: Decimal::from(101),
                    size: Decimal::from(3)
                },
                DepthRow {
                    price: Decimal::from(104),
                    size: Decimal::from(4)
                },
            ]
        );
        // Both bids round down to 99.
        assert_eq!(
            view.bids,
            vec![DepthRow {
                price: Decimal::from(99),
                size: Decimal::from(8)
            }]
        );
    }

    #[test]
    fn test_limit_caps_rows() {
        let book = book(
            json!([["1", "1"], ["2", "1"], ["3", "1"]]),
            json!([["0.9", "1"], ["0.8", "1"], ["0.7", "1"]]),
        );
        let view = DepthView::from_order_book(&book, Decimal::ZERO, 2);
        assert_eq!(view.asks.len(), 2);
        assert_eq!(view.bids.len(), 2);
        // Asks keep the cheapest rows, bids the richest.
        assert_eq!(view.asks[0].price, Decimal::from(1));
        assert_eq!(view.bids[0].price, Decimal::from_str_exact("0.9").unwrap());
    }

    #[test]
    fn test_unparsable_levels_are_skipped() {
        let book = book(json!([["100", "1"], [null, "x"]]), json!([["99", "2"]]));
        let view = DepthView::from_order_book(&book, Decimal::ZERO, 10);
        assert_eq!(view.asks.len(), 1);
    }

    #[test]
    fn test_render_shape() {
        let book = book(json!([["100", "1"], ["101", "2"]]), json!([["99", "3"]]));
        let view = DepthView::from_order_book(&book, Decimal::ZERO, 10);
        assert_eq!(view.render(), "101 => 2\n100 => 1\n---Spread---\n99 => 3\n");
    }
}
