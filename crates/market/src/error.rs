use agora_core::{AccountError, AccountId, Money, Price, Quantity, Symbol};
use thiserror::Error;

/// Rejections and failures surfaced by market operations
///
/// Every variant means "nothing changed": validation and escrow run before
/// the first balance mutation, so a rejected call leaves no trace.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(Quantity),

    #[error("limit price must be positive, got {0}")]
    InvalidPrice(Price),

    #[error("limit order is missing a price")]
    MissingLimitPrice,

    #[error("transfer amount must be positive, got {0}")]
    InvalidAmount(Money),

    #[error("unknown account {0}")]
    UnknownAccount(AccountId),

    #[error("{0} cannot own orders")]
    SentinelOwner(AccountId),

    #[error("{0} cannot send transfers")]
    InvalidSender(AccountId),

    #[error("no resting {symbol} asks to estimate a market buy against")]
    NoLiquidity { symbol: Symbol },

    #[error(transparent)]
    Account(#[from] AccountError),
}

pub type Result<T> = std::result::Result<T, MarketError>;
