//! The scripted trading week
//!
//! One tick is one simulated day. Every day runs the same routine:
//! prune stale orders, harvest and list grain, the bakery restocks and
//! bakes, the residents shop, wages fan out through the labor pool, and
//! the books are folded into the day's audit line. A share listing by
//! the player spans the week to exercise the equity path, including a
//! short sale and a manual cancellation.

use std::path::Path;

use agora_market::{
    audit, AccountError, AccountId, Accounts, Ledger, Market, MarketConfig, MarketError, OrderId,
    OrderSpec, Price, Side, Symbol, Tick,
};
use log::{debug, info};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bootstrap::{BootstrapConfig, Village};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to read config file '{path}': {source}")]
    ConfigIo {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("failed to write snapshot '{path}': {source}")]
    SnapshotIo {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Market(#[from] MarketError),
    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Top-level runner configuration, loadable from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Length of the scripted run in days
    pub days: Tick,
    pub market: MarketConfig,
    pub bootstrap: BootstrapConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            days: 7,
            market: MarketConfig::default(),
            bootstrap: BootstrapConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Load a runner configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self, RunnerError> {
        let content = std::fs::read_to_string(path).map_err(|e| RunnerError::ConfigIo {
            path: path.to_string(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Seed the village and run the scripted week
pub fn run(config: RunnerConfig, snapshot_path: Option<&Path>) -> Result<(), RunnerError> {
    let mut market = Market::new(config.market.clone());
    let ledger = *market.ledger();
    let mut village = Village::bootstrap(&config.bootstrap, &ledger)?;

    let opening = audit::money_supply(&village.accounts);
    info!(
        "Opening money supply: total={}, available={}",
        opening.total, opening.available
    );

    let mut share_ask: Option<OrderId> = None;
    for day in 1..=config.days {
        share_ask = run_day(&mut market, &mut village, &ledger, day, share_ask)?;
    }

    // the treasury retires a worn coin or two at week's end
    ledger.burn(
        &mut village.accounts,
        AccountId::Treasury,
        dec!(1),
        "worn coinage retired",
    )?;

    let closing = audit::money_supply(&village.accounts);
    info!(
        "Closing money supply: total={}, tx_tax={}, income_tax={}",
        closing.total, closing.tax_receipts.transaction_tax, closing.tax_receipts.income_tax
    );
    for (symbol, book) in market.books() {
        info!(
            "Final tape: symbol={}, last_price={:?}, trades={}, candles={}",
            symbol,
            book.last_price(),
            book.history().trades().count(),
            book.history().candles().count()
        );
    }

    if let Some(path) = snapshot_path {
        let snapshot = market.snapshot(config.days);
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json).map_err(|e| RunnerError::SnapshotIo {
            path: path.display().to_string(),
            source: e,
        })?;
        info!(
            "Snapshot written: path={}, books={}",
            path.display(),
            snapshot.books.len()
        );
    }

    Ok(())
}

/// One day of village life
fn run_day(
    market: &mut Market,
    village: &mut Village,
    ledger: &Ledger,
    day: Tick,
    mut share_ask: Option<OrderId>,
) -> Result<Option<OrderId>, RunnerError> {
    let grain = Symbol::good("grain");
    let bread = Symbol::good("bread");
    let accounts = &mut village.accounts;

    let pruned = market.prune_stale_orders(accounts, day);

    // the farm harvests and lists the crop
    if let Some(account) = accounts.get_mut(village.farm) {
        account.add_holding(&grain, dec!(30));
    }
    market.submit_order(
        accounts,
        OrderSpec::limit(
            village.farm,
            grain.clone(),
            Side::Sell,
            grain_price(day),
            dec!(30),
        ),
        day,
    )?;

    // the bakery restocks and bakes two grain into each loaf
    market.submit_order(
        accounts,
        OrderSpec::market(village.bakery, grain.clone(), Side::Buy, dec!(18)),
        day,
    )?;
    if let Some(account) = accounts.get_mut(village.bakery) {
        account.remove_holding(&grain, dec!(18), false)?;
        account.add_holding(&bread, dec!(9));
    }
    market.submit_order(
        accounts,
        OrderSpec::limit(village.bakery, bread.clone(), Side::Sell, dec!(3.00), dec!(9)),
        day,
    )?;

    // the residents shop
    for worker in &village.workers {
        market.submit_order(
            accounts,
            OrderSpec::market(*worker, bread.clone(), Side::Buy, dec!(2)),
            day,
        )?;
    }
    market.submit_order(
        accounts,
        OrderSpec::market(village.player, bread.clone(), Side::Buy, dec!(1)),
        day,
    )?;

    // the player's share listing runs across the week
    match day {
        1 => {
            let id = market.submit_order(
                accounts,
                OrderSpec::limit(
                    village.player,
                    village.bakery_shares.clone(),
                    Side::Sell,
                    dec!(10.00),
                    dec!(5),
                ),
                day,
            )?;
            share_ask = Some(id);
        }
        2 => {
            if let Some(worker) = village.workers.first() {
                market.submit_order(
                    accounts,
                    OrderSpec::limit(
                        *worker,
                        village.bakery_shares.clone(),
                        Side::Buy,
                        dec!(10.00),
                        dec!(1),
                    ),
                    day,
                )?;
            }
        }
        4 => {
            if let Some(worker) = village.workers.get(1) {
                market.submit_order(
                    accounts,
                    OrderSpec::market(*worker, village.bakery_shares.clone(), Side::Buy, dec!(1)),
                    day,
                )?;
            }
        }
        5 => {
            // take the unsold remainder off the tape before it expires
            if let Some(id) = share_ask.take() {
                if market.order(&village.bakery_shares, &id).is_some() {
                    market.cancel_order(accounts, &village.bakery_shares, &id);
                }
            }
        }
        _ => {}
    }

    // wages out through the labor pool, sundries to the market stall
    ledger.transfer(accounts, village.bakery, AccountId::LaborPool, dec!(9))?;
    ledger.transfer(accounts, village.farm, AccountId::LaborPool, dec!(6))?;
    for worker in &village.workers {
        ledger.transfer(accounts, *worker, AccountId::Market, dec!(0.25))?;
    }

    log_day(market, accounts, day, pruned);
    Ok(share_ask)
}

/// Harvest asking price cycles through the week
fn grain_price(day: Tick) -> Price {
    match (day - 1) % 3 {
        0 => dec!(1.00),
        1 => dec!(1.10),
        _ => dec!(1.05),
    }
}

fn log_day(market: &Market, accounts: &Accounts, day: Tick, pruned: usize) {
    for (symbol, book) in market.books() {
        if let Some(candle) = book.history().last_candle() {
            if candle.period == day {
                info!(
                    "Candle: day={}, symbol={}, open={}, high={}, low={}, close={}, volume={}",
                    day, symbol, candle.open, candle.high, candle.low, candle.close, candle.volume
                );
            }
        }
    }

    let grain = Symbol::good("grain");
    debug!(
        "Grain book: day={}, best_bid={:?}, best_ask={:?}, ask_levels={}",
        day,
        market.best_bid(&grain),
        market.best_ask(&grain),
        market.depth(&grain, Side::Sell).len()
    );

    let supply = audit::money_supply(accounts);
    info!(
        "Day {} close: total={}, available={}, locked={}, locked_in_books={}, tx_tax={}, income_tax={}, pruned={}",
        day,
        supply.total,
        supply.available,
        supply.locked,
        audit::locked_in_books(market),
        supply.tax_receipts.transaction_tax,
        supply.tax_receipts.income_tax,
        pruned
    );
}
