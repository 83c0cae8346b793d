use std::collections::HashMap;

use agora_core::{Candle, Order, Price, Symbol, Tick, Trade};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::book::OrderBook;
use crate::config::MarketConfig;
use crate::history::History;
use crate::market::Market;

/// Serializable image of one order book
///
/// Resting orders are captured best price first, arrival order within a
/// level, which is exactly the sequence reinsertion needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub symbol: Symbol,
    pub bids: Vec<Order>,
    pub asks: Vec<Order>,
    pub last_price: Option<Price>,
    pub trades: Vec<Trade>,
    pub candles: Vec<Candle>,
}

/// Full image of the market's books and tapes
///
/// Accounts are serialized separately by whoever owns them; a snapshot
/// only covers market structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub taken_at: DateTime<Utc>,
    pub tick: Tick,
    pub books: HashMap<Symbol, BookSnapshot>,
}

impl Market {
    /// Capture every book and its history for persistence
    pub fn snapshot(&self, now: Tick) -> MarketSnapshot {
        let books = self
            .books()
            .map(|(symbol, book)| {
                let snap = BookSnapshot {
                    symbol: symbol.clone(),
                    bids: book.bids().cloned().collect(),
                    asks: book.asks().cloned().collect(),
                    last_price: book.last_price(),
                    trades: book.history().trades().cloned().collect(),
                    candles: book.history().candles().copied().collect(),
                };
                (symbol.clone(), snap)
            })
            .collect();

        MarketSnapshot {
            taken_at: Utc::now(),
            tick: now,
            books,
        }
    }

    /// Rebuild a market from a snapshot
    ///
    /// Escrow is not re-taken: the captured orders already carry their
    /// locks, and the matching account state is restored alongside by
    /// the caller. Reinsertion preserves price-time priority.
    pub fn from_snapshot(config: MarketConfig, snapshot: MarketSnapshot) -> Self {
        let trade_cap = config.trade_history;
        let candle_cap = config.candle_history;
        let mut market = Market::new(config);

        for (symbol, snap) in snapshot.books {
            let mut book = OrderBook::new(symbol.clone(), trade_cap, candle_cap);
            for order in snap.bids.into_iter().chain(snap.asks) {
                book.insert(order);
            }
            book.restore_state(
                snap.last_price,
                History::from_parts(snap.trades, snap.candles, trade_cap, candle_cap),
            );
            market.books_mut().insert(symbol, book);
        }

        market
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::{Account, AccountId, Accounts, OrderSpec, Side};
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_round_trip_preserves_books() {
        let mut accounts = Accounts::new();
        let seller = AccountId::Resident(accounts.add_resident(Account::new()));
        let buyer = AccountId::Resident(accounts.add_resident(Account::with_cash(dec!(100))));
        let symbol = Symbol::good("grain");
        accounts
            .get_mut(seller)
            .unwrap()
            .add_holding(&symbol, dec!(20));

        let mut market = Market::new(MarketConfig::default());
        market
            .submit_order(
                &mut accounts,
                OrderSpec::limit(seller, symbol.clone(), Side::Sell, dec!(2), dec!(5)),
                1,
            )
            .unwrap();
        market
            .submit_order(
                &mut accounts,
                OrderSpec::limit(buyer, symbol.clone(), Side::Buy, dec!(2), dec!(3)),
                2,
            )
            .unwrap();

        let snapshot = market.snapshot(2);
        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: MarketSnapshot = serde_json::from_str(&json).unwrap();
        let restored = Market::from_snapshot(MarketConfig::default(), decoded);

        assert_eq!(restored.best_ask(&symbol), Some(dec!(2)));
        assert_eq!(restored.last_price(&symbol), Some(dec!(2)));
        let ask = restored.book(&symbol).unwrap().asks().next().unwrap();
        assert_eq!(ask.remaining_quantity, dec!(2));
        assert_eq!(restored.recent_trades(&symbol).len(), 1);
        assert_eq!(restored.candles(&symbol).len(), 1);
    }
}
