//! Agora Market
//!
//! The village exchange: per-symbol order books with price-time
//! matching, escrow-backed order acceptance, atomic settlement with a
//! transaction-tax skim, wage distribution through the labor pool, and
//! bounded trade/candle history. Accounts live outside this crate and
//! are borrowed into each call.

// Exchange core
mod book;
mod escrow;
mod history;
mod ledger;
mod market;
mod reaper;
mod snapshot;

// Cross-cutting concerns
mod config;
mod error;
pub mod audit;

pub use book::{MatchResult, OrderBook};
pub use config::MarketConfig;
pub use error::{MarketError, Result};
pub use escrow::Escrow;
pub use history::History;
pub use ledger::Ledger;
pub use market::Market;
pub use snapshot::{BookSnapshot, MarketSnapshot};

// Re-export the core vocabulary so callers need one import
pub use agora_core::{
    Account, AccountError, AccountId, Accounts, Candle, CompanyId, Money, Order, OrderId,
    OrderKind, OrderSpec, OrderStatus, Price, Quantity, ResidentId, Side, Symbol, TaxReceipts,
    Tick, Trade,
};
