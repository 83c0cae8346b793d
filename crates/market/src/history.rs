use std::collections::VecDeque;

use agora_core::{Candle, Trade};
use serde::{Deserialize, Serialize};

/// Bounded trade and candle history for one symbol
///
/// Both buffers evict oldest-first once full; the caps are fixed at
/// construction from market config. Candles aggregate one tick each, so
/// the default caps keep roughly two months of daily history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    trades: VecDeque<Trade>,
    candles: VecDeque<Candle>,
    trade_cap: usize,
    candle_cap: usize,
}

impl History {
    pub fn new(trade_cap: usize, candle_cap: usize) -> Self {
        Self {
            trades: VecDeque::new(),
            candles: VecDeque::new(),
            trade_cap,
            candle_cap,
        }
    }

    /// Rebuild a history verbatim from snapshot contents
    pub(crate) fn from_parts(
        trades: Vec<Trade>,
        candles: Vec<Candle>,
        trade_cap: usize,
        candle_cap: usize,
    ) -> Self {
        Self {
            trades: trades.into(),
            candles: candles.into(),
            trade_cap,
            candle_cap,
        }
    }

    /// Record one settled trade
    ///
    /// The trade is appended to the tape and folded into the candle of its
    /// tick; the first trade of a new tick opens a fresh candle.
    pub fn record(&mut self, trade: &Trade) {
        match self.candles.back_mut() {
            Some(candle) if candle.period == trade.tick => {
                candle.update(trade.price, trade.quantity);
            }
            _ => {
                self.candles
                    .push_back(Candle::open_at(trade.tick, trade.price, trade.quantity));
                if self.candles.len() > self.candle_cap {
                    self.candles.pop_front();
                }
            }
        }

        self.trades.push_back(trade.clone());
        if self.trades.len() > self.trade_cap {
            self.trades.pop_front();
        }
    }

    pub fn trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter()
    }

    pub fn candles(&self) -> impl Iterator<Item = &Candle> {
        self.candles.iter()
    }

    pub fn last_candle(&self) -> Option<&Candle> {
        self.candles.back()
    }
}
