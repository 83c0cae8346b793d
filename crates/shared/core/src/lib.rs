//! Agora Core Domain
//!
//! Pure domain types for the Agora economy simulation.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod accounts;
pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use accounts::{Accounts, TaxReceipts};
pub use entities::{
    Account,
    AccountError,
    AccountId,
    Candle,
    // Core trading entities
    Order,
    OrderId,
    OrderKind,
    OrderSpec,
    OrderStatus,
    Side,
    Trade,
};
pub use values::{CompanyId, Money, Price, Quantity, ResidentId, Symbol, Tick, round_money};
