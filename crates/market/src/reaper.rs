use std::collections::HashMap;

use agora_core::{Accounts, Symbol, Tick};
use log::{debug, info};

use crate::book::OrderBook;
use crate::escrow::Escrow;

/// Cancel and refund every resting order older than `ttl` ticks
///
/// Stale quotes otherwise pin escrow forever once their owner loses
/// interest. Returns how many orders were swept.
pub fn prune_stale(
    books: &mut HashMap<Symbol, OrderBook>,
    accounts: &mut Accounts,
    escrow: &Escrow,
    now: Tick,
    ttl: u64,
) -> usize {
    let mut pruned = 0;
    for book in books.values_mut() {
        for id in book.stale_order_ids(now, ttl) {
            let Some(mut order) = book.remove(&id) else {
                continue;
            };
            if order.cancel() {
                escrow.refund(accounts, &mut order);
                debug!(
                    "Expired: order={}, owner={}, symbol={}, age={}",
                    order.id,
                    order.owner,
                    order.symbol,
                    now.saturating_sub(order.created_at)
                );
                pruned += 1;
            }
        }
    }
    if pruned > 0 {
        info!("Stale order sweep: tick={}, pruned={}", now, pruned);
    }
    pruned
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::{Account, AccountId, Order, OrderSpec, Side};
    use rust_decimal_macros::dec;

    #[test]
    fn test_prune_refunds_only_the_old() {
        let mut accounts = Accounts::new();
        let owner = AccountId::Resident(accounts.add_resident(Account::with_cash(dec!(100))));
        let escrow = Escrow::new(dec!(1.5));

        let symbol = Symbol::good("grain");
        let mut books = HashMap::new();
        let book = books
            .entry(symbol.clone())
            .or_insert_with(|| OrderBook::new(symbol.clone(), 16, 16));

        let old_spec = OrderSpec::limit(owner, symbol.clone(), Side::Buy, dec!(2), dec!(5));
        let mut old = Order::from_spec(old_spec, 1);
        escrow.lock(&mut accounts, &mut old, book).unwrap();
        let old_id = old.id;
        book.insert(old);

        let fresh_spec = OrderSpec::limit(owner, symbol.clone(), Side::Buy, dec!(2), dec!(5));
        let mut fresh = Order::from_spec(fresh_spec, 7);
        escrow.lock(&mut accounts, &mut fresh, book).unwrap();
        let fresh_id = fresh.id;
        book.insert(fresh);

        let pruned = prune_stale(&mut books, &mut accounts, &escrow, 7, 5);

        assert_eq!(pruned, 1);
        let book = &books[&symbol];
        assert!(!book.contains(&old_id));
        assert!(book.contains(&fresh_id));
        // the old order's 10 came back, the fresh one's 10 stays locked
        let account = accounts.get(owner).unwrap();
        assert_eq!(account.available(), dec!(90));
        assert_eq!(account.locked(), dec!(10));
    }
}
