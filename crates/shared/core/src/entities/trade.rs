use serde::{Deserialize, Serialize};

use super::AccountId;
use crate::values::{Money, Price, Quantity, Symbol, Tick};

/// Trade resulting from matching orders
///
/// Immutable once recorded; history keeps trades verbatim, candles
/// aggregate them per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: Symbol,
    /// Always the maker's resting price
    pub price: Price,
    pub quantity: Quantity,
    pub tick: Tick,
    pub buyer: AccountId,
    pub seller: AccountId,
}

impl Trade {
    pub fn new(
        symbol: Symbol,
        price: Price,
        quantity: Quantity,
        tick: Tick,
        buyer: AccountId,
        seller: AccountId,
    ) -> Self {
        Self {
            symbol,
            price,
            quantity,
            tick,
            buyer,
            seller,
        }
    }

    /// Cash that changed hands before tax (price * quantity)
    pub fn notional(&self) -> Money {
        self.price * self.quantity
    }
}
