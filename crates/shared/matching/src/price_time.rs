use std::collections::VecDeque;

use agora_core::{Money, Order, OrderKind, Price, Quantity, Side, Tick, Trade};

/// Trades and bookkeeping produced by matching at one price level
#[derive(Debug, Clone, Default)]
pub struct LevelFill {
    /// Trades generated at this level, in execution order
    pub trades: Vec<Trade>,
    /// Makers that filled completely, popped from the queue; a buy among
    /// them can still carry locked cash its fills never spent
    pub filled_makers: Vec<Order>,
    /// Set when a market buy ran out of escrowed cash; the walk must stop
    /// even if compatible liquidity remains
    pub out_of_funds: bool,
}

impl LevelFill {
    /// Quantity filled at this level
    pub fn filled_quantity(&self) -> Quantity {
        self.trades
            .iter()
            .map(|t| t.quantity)
            .fold(Quantity::ZERO, |a, b| a + b)
    }
}

/// Trait for order matching algorithms
pub trait MatchingAlgorithm {
    /// Algorithm name, for logs
    fn name(&self) -> &str;

    /// Match a taker against the resting orders of one price level
    ///
    /// Trades execute at `level_price`, the makers' resting price. Fully
    /// filled makers are popped from the queue as they complete and handed
    /// back so the caller can release their remaining escrow; emptied
    /// levels and index entries stay the caller's responsibility.
    fn match_at_level(
        &self,
        taker: &mut Order,
        makers: &mut VecDeque<Order>,
        level_price: Price,
        now: Tick,
    ) -> LevelFill;
}

/// Price-time priority (FIFO) matching
///
/// The earliest maker at a level fills first, always at its own resting
/// price; arriving later never jumps the queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceTimeMatching;

impl PriceTimeMatching {
    pub fn new() -> Self {
        Self
    }
}

impl MatchingAlgorithm for PriceTimeMatching {
    fn name(&self) -> &str {
        "price-time"
    }

    fn match_at_level(
        &self,
        taker: &mut Order,
        makers: &mut VecDeque<Order>,
        level_price: Price,
        now: Tick,
    ) -> LevelFill {
        let mut fill = LevelFill::default();

        while !taker.is_filled() {
            let Some(maker) = makers.front_mut() else {
                break;
            };

            let mut fill_qty = taker.remaining_quantity.min(maker.remaining_quantity);

            // A market buy may never settle beyond its escrowed estimate;
            // once the lock cannot cover one whole unit it is out of funds.
            if taker.side == Side::Buy && taker.kind == OrderKind::Market {
                let affordable = taker.affordable_at(level_price);
                if affordable.is_zero() {
                    fill.out_of_funds = true;
                    break;
                }
                fill_qty = fill_qty.min(affordable);
            }

            if fill_qty <= Quantity::ZERO {
                break;
            }

            let spent: Money = level_price * fill_qty;
            let (buyer, seller) = match taker.side {
                Side::Buy => (taker.owner, maker.owner),
                Side::Sell => (maker.owner, taker.owner),
            };

            fill.trades.push(Trade::new(
                taker.symbol.clone(),
                level_price,
                fill_qty,
                now,
                buyer,
                seller,
            ));

            taker.fill(fill_qty, spent);
            maker.fill(fill_qty, spent);

            if maker.is_filled() {
                if let Some(done) = makers.pop_front() {
                    fill.filled_makers.push(done);
                }
            }
        }

        fill
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::{AccountId, OrderSpec, OrderStatus, Symbol};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn resident() -> AccountId {
        AccountId::Resident(Uuid::new_v4())
    }

    fn grain() -> Symbol {
        Symbol::good("grain")
    }

    fn resting_ask(price: Price, quantity: Quantity, tick: Tick) -> Order {
        let spec = OrderSpec::limit(resident(), grain(), Side::Sell, price, quantity);
        Order::from_spec(spec, tick)
    }

    fn limit_buy_taker(price: Price, quantity: Quantity) -> Order {
        let spec = OrderSpec::limit(resident(), grain(), Side::Buy, price, quantity);
        let mut order = Order::from_spec(spec, 5);
        order.locked_value = price * quantity;
        order
    }

    fn market_buy_taker(quantity: Quantity, locked: Money) -> Order {
        let spec = OrderSpec::market(resident(), grain(), Side::Buy, quantity);
        let mut order = Order::from_spec(spec, 5);
        order.locked_value = locked;
        order
    }

    #[test]
    fn test_earliest_maker_fills_first() {
        let matcher = PriceTimeMatching::new();
        let first = resting_ask(dec!(1), dec!(4), 1);
        let second = resting_ask(dec!(1), dec!(4), 2);
        let first_id = first.id;
        let mut makers = VecDeque::from([first, second]);

        let mut taker = limit_buy_taker(dec!(1), dec!(4));
        let fill = matcher.match_at_level(&mut taker, &mut makers, dec!(1), 5);

        assert_eq!(fill.filled_makers.len(), 1);
        assert_eq!(fill.filled_makers[0].id, first_id);
        assert_eq!(makers.len(), 1);
        assert_eq!(makers[0].remaining_quantity, dec!(4));
        assert!(taker.is_filled());
    }

    #[test]
    fn test_fill_sweeps_successive_makers_at_level_price() {
        let matcher = PriceTimeMatching::new();
        let mut makers = VecDeque::from([
            resting_ask(dec!(2), dec!(3), 1),
            resting_ask(dec!(2), dec!(3), 2),
        ]);

        let mut taker = limit_buy_taker(dec!(2), dec!(5));
        let fill = matcher.match_at_level(&mut taker, &mut makers, dec!(2), 5);

        assert_eq!(fill.trades.len(), 2);
        assert_eq!(fill.trades[0].quantity, dec!(3));
        assert_eq!(fill.trades[1].quantity, dec!(2));
        assert!(fill.trades.iter().all(|t| t.price == dec!(2)));
        assert_eq!(fill.filled_quantity(), dec!(5));

        // Second maker keeps its remainder and stays live
        assert_eq!(makers.len(), 1);
        assert_eq!(makers[0].remaining_quantity, dec!(1));
        assert_eq!(makers[0].status, OrderStatus::PartiallyExecuted);
        assert_eq!(taker.status, OrderStatus::Executed);
    }

    #[test]
    fn test_buy_taker_lock_shrinks_by_cash_spent() {
        let matcher = PriceTimeMatching::new();
        let mut makers = VecDeque::from([resting_ask(dec!(1.50), dec!(2), 1)]);

        // Locked at a 2.00 limit, filling at the cheaper maker price
        let mut taker = limit_buy_taker(dec!(2), dec!(2));
        matcher.match_at_level(&mut taker, &mut makers, dec!(1.50), 5);

        assert!(taker.is_filled());
        assert_eq!(taker.locked_value, dec!(1));
    }

    #[test]
    fn test_market_buy_stops_at_funding_cap() {
        let matcher = PriceTimeMatching::new();
        let mut makers = VecDeque::from([resting_ask(dec!(3), dec!(10), 1)]);

        // Lock covers three whole units at price 3, not the ten asked for
        let mut taker = market_buy_taker(dec!(10), dec!(10));
        let fill = matcher.match_at_level(&mut taker, &mut makers, dec!(3), 5);

        assert_eq!(fill.filled_quantity(), dec!(3));
        assert!(fill.out_of_funds);
        assert_eq!(taker.remaining_quantity, dec!(7));
        assert_eq!(taker.locked_value, dec!(1));
        assert_eq!(makers[0].remaining_quantity, dec!(7));
    }

    #[test]
    fn test_market_buy_with_underfunded_lock_fills_nothing() {
        let matcher = PriceTimeMatching::new();
        let mut makers = VecDeque::from([resting_ask(dec!(3), dec!(5), 1)]);

        let mut taker = market_buy_taker(dec!(5), dec!(2));
        let fill = matcher.match_at_level(&mut taker, &mut makers, dec!(3), 5);

        assert!(fill.trades.is_empty());
        assert!(fill.out_of_funds);
        assert_eq!(taker.status, OrderStatus::Pending);
    }

    #[test]
    fn test_sell_taker_records_maker_as_buyer() {
        let matcher = PriceTimeMatching::new();
        let bid_spec = OrderSpec::limit(resident(), grain(), Side::Buy, dec!(2), dec!(4));
        let mut bid = Order::from_spec(bid_spec, 1);
        bid.locked_value = dec!(8);
        let bid_owner = bid.owner;
        let mut makers = VecDeque::from([bid]);

        let sell_spec = OrderSpec::limit(resident(), grain(), Side::Sell, dec!(2), dec!(4));
        let mut taker = Order::from_spec(sell_spec, 5);
        let taker_owner = taker.owner;

        let fill = matcher.match_at_level(&mut taker, &mut makers, dec!(2), 5);

        assert_eq!(fill.trades.len(), 1);
        assert_eq!(fill.trades[0].buyer, bid_owner);
        assert_eq!(fill.trades[0].seller, taker_owner);
        // The filled bid maker spent its whole lock
        assert_eq!(fill.filled_makers.len(), 1);
        assert_eq!(fill.filled_makers[0].locked_value, Money::ZERO);
    }

    #[test]
    fn test_completed_maker_keeps_its_unspent_lock() {
        let matcher = PriceTimeMatching::new();
        // A bid that filled below its limit earlier rests with 15 locked
        // though its remaining 5 units at 2.00 only need 10
        let bid_spec = OrderSpec::limit(resident(), grain(), Side::Buy, dec!(2), dec!(5));
        let mut bid = Order::from_spec(bid_spec, 1);
        bid.locked_value = dec!(15);
        let mut makers = VecDeque::from([bid]);

        let sell_spec = OrderSpec::limit(resident(), grain(), Side::Sell, dec!(2), dec!(5));
        let mut taker = Order::from_spec(sell_spec, 5);

        let fill = matcher.match_at_level(&mut taker, &mut makers, dec!(2), 5);

        assert_eq!(fill.filled_makers.len(), 1);
        assert_eq!(fill.filled_makers[0].status, OrderStatus::Executed);
        // The surplus rides out with the popped order for the caller to refund
        assert_eq!(fill.filled_makers[0].locked_value, dec!(5));
        assert!(makers.is_empty());
    }
}
