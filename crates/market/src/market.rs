use std::collections::HashMap;

use agora_core::{
    round_money, Accounts, Candle, Money, Order, OrderId, OrderKind, OrderSpec, Price, Quantity,
    Side, Symbol, Tick, Trade,
};
use agora_matching::PriceTimeMatching;
use log::debug;

use crate::book::OrderBook;
use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::escrow::Escrow;
use crate::ledger::Ledger;
use crate::reaper;

/// The exchange facade: order books per symbol plus the escrow, matching
/// and settlement that tie them to the account registry
///
/// Accounts stay outside the market and are passed into every mutating
/// call, so the surrounding simulation keeps one owner for all economic
/// state and the market holds only market structure.
#[derive(Debug)]
pub struct Market {
    books: HashMap<Symbol, OrderBook>,
    config: MarketConfig,
    ledger: Ledger,
    escrow: Escrow,
    matcher: PriceTimeMatching,
}

impl Market {
    pub fn new(config: MarketConfig) -> Self {
        Self {
            ledger: Ledger::new(config.income_tax),
            escrow: Escrow::new(config.market_slippage),
            matcher: PriceTimeMatching,
            books: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Cash-movement API shared with the surrounding economy (wages,
    /// dividends, off-book purchases)
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Accept an order: escrow it, match it, settle the fills and rest
    /// or discard the remainder
    ///
    /// Either the whole pipeline runs or the rejection leaves accounts
    /// and books untouched. Fills settle at each maker's resting price;
    /// a market order never rests, so its unfilled remainder is dropped
    /// and its leftover escrow refunded.
    pub fn submit_order(
        &mut self,
        accounts: &mut Accounts,
        spec: OrderSpec,
        now: Tick,
    ) -> Result<OrderId> {
        let mut order = Order::from_spec(spec, now);
        let order_id = order.id;
        let symbol = order.symbol.clone();

        let escrow = self.escrow;
        let matcher = self.matcher;
        let trade_cap = self.config.trade_history;
        let candle_cap = self.config.candle_history;

        let mut result = {
            let book = self
                .books
                .entry(symbol.clone())
                .or_insert_with(|| OrderBook::new(symbol.clone(), trade_cap, candle_cap));
            escrow.lock(accounts, &mut order, book)?;
            book.match_order(&mut order, &matcher, now)
        };

        for trade in &result.trades {
            self.settle_trade(accounts, trade)?;
        }
        if !result.trades.is_empty() {
            if let Some(book) = self.books.get_mut(&symbol) {
                for trade in &result.trades {
                    book.record_trade(trade);
                }
            }
        }
        // a completed maker can still hold locked cash its fills never spent
        for maker in result.filled_makers.iter_mut() {
            escrow.refund(accounts, maker);
        }

        debug!(
            "Order processed: order={}, owner={}, symbol={}, side={:?}, kind={:?}, fills={}, remaining={}",
            order_id,
            order.owner,
            symbol,
            order.side,
            order.kind,
            result.trades.len(),
            order.remaining_quantity
        );

        if order.is_filled() {
            // price improvement on a buy can leave locked cash behind
            escrow.refund(accounts, &mut order);
        } else {
            match order.kind {
                OrderKind::Limit => {
                    if let Some(book) = self.books.get_mut(&symbol) {
                        book.insert(order);
                    }
                }
                OrderKind::Market => {
                    order.discard_remainder();
                    escrow.refund(accounts, &mut order);
                }
            }
        }

        Ok(order_id)
    }

    /// Move cash and goods for one fill
    ///
    /// The buyer's side comes out of escrow taken at submission, so this
    /// cannot bounce for a well-formed trade. The seller receives the
    /// notional minus transaction tax, which lands in the treasury.
    fn settle_trade(&self, accounts: &mut Accounts, trade: &Trade) -> Result<()> {
        let notional = trade.notional();

        let buyer = accounts
            .get_mut(trade.buyer)
            .ok_or(MarketError::UnknownAccount(trade.buyer))?;
        buyer.spend_locked(notional)?;
        buyer.add_holding(&trade.symbol, trade.quantity);

        let tax = round_money(notional * self.config.transaction_tax);
        let net = notional - tax;
        let seller = accounts
            .get_mut(trade.seller)
            .ok_or(MarketError::UnknownAccount(trade.seller))?;
        seller.deposit(net);
        if tax > Money::ZERO {
            accounts.collect_transaction_tax(tax);
        }

        debug!(
            "Settled: symbol={}, price={}, quantity={}, buyer={}, seller={}, tax={}",
            trade.symbol, trade.price, trade.quantity, trade.buyer, trade.seller, tax
        );
        Ok(())
    }

    /// Cancel a resting order and release its escrow
    ///
    /// Returns false when the order is unknown to this book (never
    /// inserted, already filled, already cancelled or already expired),
    /// so the call is safe to repeat.
    pub fn cancel_order(
        &mut self,
        accounts: &mut Accounts,
        symbol: &Symbol,
        order_id: &OrderId,
    ) -> bool {
        let escrow = self.escrow;
        let Some(book) = self.books.get_mut(symbol) else {
            return false;
        };
        let Some(mut order) = book.remove(order_id) else {
            return false;
        };

        if order.cancel() {
            escrow.refund(accounts, &mut order);
            debug!(
                "Cancelled: order={}, owner={}, symbol={}",
                order.id, order.owner, symbol
            );
            true
        } else {
            false
        }
    }

    /// Sweep out resting orders older than the configured ttl
    pub fn prune_stale_orders(&mut self, accounts: &mut Accounts, now: Tick) -> usize {
        let escrow = self.escrow;
        reaper::prune_stale(
            &mut self.books,
            accounts,
            &escrow,
            now,
            self.config.order_ttl,
        )
    }

    pub fn book(&self, symbol: &Symbol) -> Option<&OrderBook> {
        self.books.get(symbol)
    }

    pub fn books(&self) -> impl Iterator<Item = (&Symbol, &OrderBook)> {
        self.books.iter()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.books.keys()
    }

    pub fn best_bid(&self, symbol: &Symbol) -> Option<Price> {
        self.books.get(symbol).and_then(|book| book.best_bid())
    }

    pub fn best_ask(&self, symbol: &Symbol) -> Option<Price> {
        self.books.get(symbol).and_then(|book| book.best_ask())
    }

    pub fn last_price(&self, symbol: &Symbol) -> Option<Price> {
        self.books.get(symbol).and_then(|book| book.last_price())
    }

    /// Look up a resting order; filled and cancelled orders are gone
    pub fn order(&self, symbol: &Symbol, order_id: &OrderId) -> Option<&Order> {
        self.books.get(symbol).and_then(|book| book.get(order_id))
    }

    /// Aggregated resting quantity per price level, best price first
    pub fn depth(&self, symbol: &Symbol, side: Side) -> Vec<(Price, Quantity)> {
        self.books
            .get(symbol)
            .map(|book| book.depth(side))
            .unwrap_or_default()
    }

    pub fn candles(&self, symbol: &Symbol) -> Vec<Candle> {
        self.books
            .get(symbol)
            .map(|book| book.candles())
            .unwrap_or_default()
    }

    pub fn recent_trades(&self, symbol: &Symbol) -> Vec<Trade> {
        self.books
            .get(symbol)
            .map(|book| book.history().trades().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn books_mut(&mut self) -> &mut HashMap<Symbol, OrderBook> {
        &mut self.books
    }
}
