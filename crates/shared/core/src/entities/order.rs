use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AccountId;
use crate::values::{Money, Price, Quantity, Symbol, Tick};

/// Unique identifier for an order
pub type OrderId = Uuid;

/// Order side (Buy or Sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order kind: resting limit order or immediate market sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    Limit,
    Market,
}

/// Order lifecycle status
///
/// Only `Pending` and `PartiallyExecuted` orders rest in a book;
/// reaching a terminal status removes the order from its side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Accepted and escrowed, nothing filled yet
    Pending,
    /// Some quantity filled, the remainder still live
    PartiallyExecuted,
    /// Fully filled, or a market sweep that filled what it could
    Executed,
    /// Explicitly cancelled, or expired by the staleness pass
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Executed | OrderStatus::Cancelled)
    }

    /// Returns true if the order is still live
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::PartiallyExecuted)
    }
}

/// What an agent submits; generated fields are filled in at acceptance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSpec {
    pub owner: AccountId,
    pub symbol: Symbol,
    pub side: Side,
    pub kind: OrderKind,
    /// Required for Limit, ignored for Market
    pub limit_price: Option<Price>,
    pub quantity: Quantity,
}

impl OrderSpec {
    /// Convenience constructor for a limit order
    pub fn limit(
        owner: AccountId,
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            owner,
            symbol,
            side,
            kind: OrderKind::Limit,
            limit_price: Some(price),
            quantity,
        }
    }

    /// Convenience constructor for a market order
    pub fn market(owner: AccountId, symbol: Symbol, side: Side, quantity: Quantity) -> Self {
        Self {
            owner,
            symbol,
            side,
            kind: OrderKind::Market,
            limit_price: None,
            quantity,
        }
    }
}

/// Full order details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner: AccountId,
    pub symbol: Symbol,
    pub side: Side,
    pub kind: OrderKind,
    /// Resting price; `None` for market orders
    pub limit_price: Option<Price>,
    pub quantity: Quantity,
    pub remaining_quantity: Quantity,
    /// Cash withheld from the owner for this order; stays zero for sells,
    /// which reserve inventory instead
    pub locked_value: Money,
    pub status: OrderStatus,
    pub created_at: Tick,
}

impl Order {
    /// Materialize an order from a submitted spec at the given tick
    pub fn from_spec(spec: OrderSpec, now: Tick) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: spec.owner,
            symbol: spec.symbol,
            side: spec.side,
            kind: spec.kind,
            limit_price: spec.limit_price,
            quantity: spec.quantity,
            remaining_quantity: spec.quantity,
            locked_value: Money::ZERO,
            status: OrderStatus::Pending,
            created_at: now,
        }
    }

    /// Quantity already filled
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity - self.remaining_quantity
    }

    /// Returns true if nothing is left to fill
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity <= Quantity::ZERO
    }

    /// Apply a fill: shrink the remainder, consume the spent portion of a
    /// buy-side lock, and advance the status
    pub fn fill(&mut self, quantity: Quantity, spent: Money) {
        self.remaining_quantity -= quantity;
        if self.side == Side::Buy {
            self.locked_value = (self.locked_value - spent).max(Money::ZERO);
        }
        self.status = if self.is_filled() {
            OrderStatus::Executed
        } else {
            OrderStatus::PartiallyExecuted
        };
    }

    /// Cancel the order if it is still live
    ///
    /// Returns false (and changes nothing) on an already-terminal order,
    /// so cancellation is idempotent.
    pub fn cancel(&mut self) -> bool {
        if self.status.is_active() {
            self.status = OrderStatus::Cancelled;
            true
        } else {
            false
        }
    }

    /// Terminalize a market-order remainder that found no more liquidity
    ///
    /// A market sweep never rests, so whatever is left is dropped:
    /// `Executed` if anything filled, `Cancelled` if nothing did.
    pub fn discard_remainder(&mut self) {
        self.status = if self.filled_quantity() > Quantity::ZERO {
            OrderStatus::Executed
        } else {
            OrderStatus::Cancelled
        };
    }

    /// Returns true once the order has rested longer than `ttl` ticks
    pub fn is_expired(&self, now: Tick, ttl: u64) -> bool {
        now.saturating_sub(self.created_at) > ttl
    }

    /// Cash this order would need escrowed up front, if knowable
    ///
    /// Limit buys lock price x quantity; market buys are estimated by the
    /// escrow layer from the opposing book, so this returns `None`.
    pub fn limit_notional(&self) -> Option<Money> {
        self.limit_price.map(|p| p * self.quantity)
    }

    /// Largest quantity a buy-side order can still pay for at `price`
    ///
    /// Market buys are escrowed against an estimate, so a fill may never
    /// settle more cash than remains locked. Whole units only: the floor
    /// matches how goods and shares change hands.
    pub fn affordable_at(&self, price: Price) -> Quantity {
        if price <= Decimal::ZERO {
            return Quantity::ZERO;
        }
        (self.locked_value / price).floor()
    }
}
