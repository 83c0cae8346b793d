use std::collections::{BTreeMap, HashMap, VecDeque};

use agora_core::{Candle, Order, OrderId, Price, Quantity, Side, Symbol, Tick, Trade};
use agora_matching::MatchingAlgorithm;

use crate::history::History;

/// Key for price levels in the book
///
/// Bids sort descending (best bid first), asks ascending (best ask first),
/// so iteration always walks a side best-price-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PriceKey {
    price: Price,
    is_bid: bool,
}

impl PartialOrd for PriceKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.is_bid {
            other.price.cmp(&self.price)
        } else {
            self.price.cmp(&other.price)
        }
    }
}

/// What one taker sweep against the book produced
///
/// Completed makers leave the book still holding whatever part of their
/// lock the fills did not spend; the caller releases it.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    /// Trades in execution order, best level first
    pub trades: Vec<Trade>,
    /// Makers the sweep filled completely, removed from the book
    pub filled_makers: Vec<Order>,
}

/// Order book for one symbol with price-time priority
///
/// Each side keys price levels to FIFO queues; arrival order within a
/// level is never reordered. The book also carries the symbol's trade
/// tape and candle history so market data lives next to the liquidity
/// that produced it.
#[derive(Debug, Clone)]
pub struct OrderBook {
    symbol: Symbol,
    bids: BTreeMap<PriceKey, VecDeque<Order>>,
    asks: BTreeMap<PriceKey, VecDeque<Order>>,
    order_index: HashMap<OrderId, (Side, Price)>,
    last_price: Option<Price>,
    history: History,
}

impl OrderBook {
    pub fn new(symbol: Symbol, trade_cap: usize, candle_cap: usize) -> Self {
        Self {
            symbol,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_index: HashMap::new(),
            last_price: None,
            history: History::new(trade_cap, candle_cap),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first_key_value().map(|(key, _)| key.price)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first_key_value().map(|(key, _)| key.price)
    }

    /// Price of the most recent trade in this book
    pub fn last_price(&self) -> Option<Price> {
        self.last_price
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Rest an order at the back of its price level's queue
    ///
    /// Callers only insert live limit orders, so a missing price here is
    /// a bug upstream rather than a recoverable condition.
    pub fn insert(&mut self, order: Order) {
        let price = order
            .limit_price
            .expect("resting order must have a limit price");
        let key = PriceKey {
            price,
            is_bid: order.side == Side::Buy,
        };

        self.order_index.insert(order.id, (order.side, price));
        let side = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        side.entry(key).or_default().push_back(order);
    }

    /// Pull an order out of the book, dropping its level if emptied
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let (side, price) = self.order_index.remove(order_id)?;
        let key = PriceKey {
            price,
            is_bid: side == Side::Buy,
        };
        let book_side = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };

        let queue = book_side.get_mut(&key)?;
        let position = queue.iter().position(|order| order.id == *order_id)?;
        let order = queue.remove(position);
        if queue.is_empty() {
            book_side.remove(&key);
        }
        order
    }

    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        let (side, price) = self.order_index.get(order_id)?;
        let key = PriceKey {
            price: *price,
            is_bid: *side == Side::Buy,
        };
        let book_side = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        book_side
            .get(&key)?
            .iter()
            .find(|order| order.id == *order_id)
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.order_index.contains_key(order_id)
    }

    /// Match a taker against the opposing side, best price first
    ///
    /// Fills happen at each maker's resting price. The walk stops when
    /// the taker is filled, the next level no longer crosses the taker's
    /// limit, the side runs dry, or a market buy runs out of locked
    /// cash. Filled makers and emptied levels are removed afterwards so
    /// the book never holds a terminal order; the filled makers come
    /// back to the caller, which still owes them an escrow release.
    pub fn match_order(
        &mut self,
        taker: &mut Order,
        matcher: &dyn MatchingAlgorithm,
        now: Tick,
    ) -> MatchResult {
        let book_side = match taker.side {
            Side::Buy => &mut self.asks,
            Side::Sell => &mut self.bids,
        };

        let mut result = MatchResult::default();
        let mut emptied_levels = Vec::new();

        for (key, queue) in book_side.iter_mut() {
            if taker.is_filled() {
                break;
            }
            if let Some(limit) = taker.limit_price {
                let crosses = match taker.side {
                    Side::Buy => key.price <= limit,
                    Side::Sell => key.price >= limit,
                };
                if !crosses {
                    break;
                }
            }

            let fill = matcher.match_at_level(taker, queue, key.price, now);
            result.trades.extend(fill.trades);
            result.filled_makers.extend(fill.filled_makers);
            if queue.is_empty() {
                emptied_levels.push(*key);
            }
            if fill.out_of_funds {
                break;
            }
        }

        for key in emptied_levels {
            book_side.remove(&key);
        }
        for maker in &result.filled_makers {
            self.order_index.remove(&maker.id);
        }

        result
    }

    /// Fold a settled trade into last price and history
    pub fn record_trade(&mut self, trade: &Trade) {
        self.last_price = Some(trade.price);
        self.history.record(trade);
    }

    /// Ids of resting orders older than `ttl` ticks
    pub fn stale_order_ids(&self, now: Tick, ttl: u64) -> Vec<OrderId> {
        self.resting_orders()
            .filter(|order| order.is_expired(now, ttl))
            .map(|order| order.id)
            .collect()
    }

    /// All resting orders, bids then asks, best price first within a side
    pub fn resting_orders(&self) -> impl Iterator<Item = &Order> {
        self.bids
            .values()
            .flatten()
            .chain(self.asks.values().flatten())
    }

    /// Resting bids, best price first
    pub fn bids(&self) -> impl Iterator<Item = &Order> {
        self.bids.values().flatten()
    }

    /// Resting asks, best price first
    pub fn asks(&self) -> impl Iterator<Item = &Order> {
        self.asks.values().flatten()
    }

    /// Aggregated quantity per price level, best price first
    pub fn depth(&self, side: Side) -> Vec<(Price, Quantity)> {
        let book_side = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        book_side
            .iter()
            .map(|(key, queue)| {
                let total = queue
                    .iter()
                    .map(|order| order.remaining_quantity)
                    .sum::<Quantity>();
                (key.price, total)
            })
            .collect()
    }

    /// Candles oldest-first, for market data queries
    pub fn candles(&self) -> Vec<Candle> {
        self.history.candles().copied().collect()
    }

    /// Reinstate tape state when rebuilding from a snapshot
    pub(crate) fn restore_state(&mut self, last_price: Option<Price>, history: History) {
        self.last_price = last_price;
        self.history = history;
    }
}
