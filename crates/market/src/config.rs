use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Tunables for the market core
///
/// Defaults fit the simulated village economy: a small tax on every sale,
/// a tithe on wages, a generous market-order buffer, and short-lived
/// resting orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Seller-paid tax skimmed from every settled trade
    pub transaction_tax: Decimal,
    /// Skim applied to wage payments routed through the labor pool
    pub income_tax: Decimal,
    /// Overlock multiplier for market-buy escrow estimates
    pub market_slippage: Decimal,
    /// Resting orders older than this many ticks are pruned
    pub order_ttl: u64,
    /// Candles kept per symbol
    pub candle_history: usize,
    /// Trades kept per symbol
    pub trade_history: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            transaction_tax: dec!(0.02),
            income_tax: dec!(0.10),
            market_slippage: dec!(1.5),
            order_ttl: 5,
            candle_history: 60,
            trade_history: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_files_fall_back_to_defaults() {
        let config: MarketConfig = serde_json::from_str(r#"{"order_ttl": 2}"#).unwrap();
        assert_eq!(config.order_ttl, 2);
        assert_eq!(config.market_slippage, dec!(1.5));
        assert_eq!(config.candle_history, 60);
    }
}
