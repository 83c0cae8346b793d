mod account;
mod candle;
mod order;
mod trade;

pub use account::{Account, AccountError, AccountId};
pub use candle::Candle;
pub use order::{Order, OrderId, OrderKind, OrderSpec, OrderStatus, Side};
pub use trade::Trade;
