use agora_core::{Accounts, Money, Order, OrderKind, Quantity, Side};
use log::debug;
use rust_decimal::Decimal;

use crate::book::OrderBook;
use crate::error::{MarketError, Result};

/// All-or-nothing reservation of what an order might settle
///
/// Buys lock cash (limit: price x quantity exactly; market: best ask x
/// quantity x the slippage factor), sells reserve inventory by removing
/// the holdings up front. An order only ever reaches a book with its
/// escrow in place, so settlement can spend from the lock without a
/// solvency check of its own.
#[derive(Debug, Clone, Copy)]
pub struct Escrow {
    slippage: Decimal,
}

impl Escrow {
    pub fn new(slippage: Decimal) -> Self {
        Self { slippage }
    }

    /// Validate an order and take its reservation, or reject with no
    /// side effects
    pub fn lock(&self, accounts: &mut Accounts, order: &mut Order, book: &OrderBook) -> Result<()> {
        if order.quantity <= Quantity::ZERO {
            return Err(MarketError::InvalidQuantity(order.quantity));
        }
        if order.kind == OrderKind::Limit {
            match order.limit_price {
                None => return Err(MarketError::MissingLimitPrice),
                Some(price) if price <= Decimal::ZERO => {
                    return Err(MarketError::InvalidPrice(price));
                }
                Some(_) => {}
            }
        }
        if order.owner.is_sentinel() {
            return Err(MarketError::SentinelOwner(order.owner));
        }
        if !accounts.contains(order.owner) {
            return Err(MarketError::UnknownAccount(order.owner));
        }

        // The player alone may short shares; goods never go negative
        let allow_negative = order.symbol.is_share() && accounts.is_player(order.owner);

        match (order.side, order.kind) {
            (Side::Buy, OrderKind::Limit) => {
                // limit_price was validated above
                let price = order.limit_price.ok_or(MarketError::MissingLimitPrice)?;
                let required = price * order.quantity;
                let account = accounts
                    .get_mut(order.owner)
                    .ok_or(MarketError::UnknownAccount(order.owner))?;
                account.lock(required)?;
                order.locked_value = required;
            }
            (Side::Buy, OrderKind::Market) => {
                let best_ask = book.best_ask().ok_or_else(|| MarketError::NoLiquidity {
                    symbol: order.symbol.clone(),
                })?;
                // Overlocks on purpose; the unspent slack is refunded
                // as soon as the sweep settles
                let estimate = best_ask * order.quantity * self.slippage;
                let account = accounts
                    .get_mut(order.owner)
                    .ok_or(MarketError::UnknownAccount(order.owner))?;
                account.lock(estimate)?;
                order.locked_value = estimate;
            }
            (Side::Sell, _) => {
                let account = accounts
                    .get_mut(order.owner)
                    .ok_or(MarketError::UnknownAccount(order.owner))?;
                account.remove_holding(&order.symbol, order.quantity, allow_negative)?;
            }
        }

        debug!(
            "Escrow taken: order={}, owner={}, side={:?}, locked={}, quantity={}",
            order.id, order.owner, order.side, order.locked_value, order.quantity
        );
        Ok(())
    }

    /// Return whatever the order still reserves to its owner
    ///
    /// Safe on a fully-spent order (both branches are no-ops at zero).
    /// Callers release each order exactly once, when it leaves the book
    /// or fails to rest.
    pub fn refund(&self, accounts: &mut Accounts, order: &mut Order) {
        match order.side {
            Side::Buy => {
                if order.locked_value > Money::ZERO {
                    if let Some(account) = accounts.get_mut(order.owner) {
                        account.unlock(order.locked_value);
                    }
                    debug!(
                        "Escrow released: order={}, owner={}, refunded={}",
                        order.id, order.owner, order.locked_value
                    );
                    order.locked_value = Money::ZERO;
                }
            }
            Side::Sell => {
                if order.remaining_quantity > Quantity::ZERO {
                    if let Some(account) = accounts.get_mut(order.owner) {
                        account.add_holding(&order.symbol, order.remaining_quantity);
                    }
                    debug!(
                        "Escrow released: order={}, owner={}, returned={} {}",
                        order.id, order.owner, order.remaining_quantity, order.symbol
                    );
                }
            }
        }
    }
}
