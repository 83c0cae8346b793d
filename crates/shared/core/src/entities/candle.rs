use serde::{Deserialize, Serialize};

use crate::values::{Price, Quantity, Tick};

/// OHLCV summary of one symbol's trades within one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// The tick this candle covers
    pub period: Tick,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Quantity,
}

impl Candle {
    /// Open a fresh candle from the first trade of a tick
    pub fn open_at(period: Tick, price: Price, quantity: Quantity) -> Self {
        Self {
            period,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: quantity,
        }
    }

    /// Fold another trade of the same tick into this candle
    pub fn update(&mut self, price: Price, quantity: Quantity) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume += quantity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_first_trade_opens_flat_candle() {
        let candle = Candle::open_at(3, dec!(1.50), dec!(10));
        assert_eq!(candle.open, dec!(1.50));
        assert_eq!(candle.high, dec!(1.50));
        assert_eq!(candle.low, dec!(1.50));
        assert_eq!(candle.close, dec!(1.50));
        assert_eq!(candle.volume, dec!(10));
    }

    #[test]
    fn test_update_extends_range_and_volume() {
        let mut candle = Candle::open_at(3, dec!(1.50), dec!(10));
        candle.update(dec!(1.80), dec!(5));
        candle.update(dec!(1.20), dec!(2));

        assert_eq!(candle.open, dec!(1.50));
        assert_eq!(candle.high, dec!(1.80));
        assert_eq!(candle.low, dec!(1.20));
        assert_eq!(candle.close, dec!(1.20));
        assert_eq!(candle.volume, dec!(17));
    }
}
