mod symbol;

pub use symbol::Symbol;

use rust_decimal::Decimal;
use uuid::Uuid;

/// Cash amount - uses Decimal so conservation sums are exact
pub type Money = Decimal;

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Quantity value - uses Decimal for precision
/// Signed on purpose: the player's share holdings may go negative
pub type Quantity = Decimal;

/// Simulation time: one tick is one simulated day
pub type Tick = u64;

/// Money rounds to whole cents before it hits an account
///
/// Applied to derived amounts (taxes, labor-pool shares); escrow locks and
/// trade notionals stay exact so a lock always covers its fills.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp(2)
}

/// Unique identifier for a resident
pub type ResidentId = Uuid;

/// Unique identifier for a company
pub type CompanyId = Uuid;
