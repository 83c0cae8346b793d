//! Economy participant accounts: cash with an escrow split, plus holdings.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::values::{CompanyId, Money, Quantity, ResidentId, Symbol};

/// Identifies a party to a transfer, or an order owner
///
/// `Treasury` is a concrete account that is always considered solvent.
/// `Market` and `LaborPool` are sentinels without balances of their own:
/// the market sink absorbs off-book flows with no bookkeeping, and the
/// labor pool fans receipts out to its current members. Sentinels are
/// transfer endpoints only and can never own orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountId {
    Resident(ResidentId),
    Company(CompanyId),
    Treasury,
    Market,
    LaborPool,
}

impl AccountId {
    /// Returns true for the balance-less pseudo accounts
    pub fn is_sentinel(&self) -> bool {
        matches!(self, AccountId::Market | AccountId::LaborPool)
    }

    /// Returns true for parties whose debits never bounce
    pub fn is_always_solvent(&self) -> bool {
        matches!(self, AccountId::Treasury | AccountId::Market)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountId::Resident(id) => write!(f, "resident:{}", id),
            AccountId::Company(id) => write!(f, "company:{}", id),
            AccountId::Treasury => write!(f, "treasury"),
            AccountId::Market => write!(f, "market"),
            AccountId::LaborPool => write!(f, "labor-pool"),
        }
    }
}

/// Account mutation failures, surfaced through the escrow and ledger layers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Money, available: Money },

    #[error("insufficient holdings of {symbol}: required {required}, held {held}")]
    InsufficientHoldings {
        symbol: Symbol,
        required: Quantity,
        held: Quantity,
    },

    #[error("insufficient locked funds: required {required}, locked {locked}")]
    InsufficientLock { required: Money, locked: Money },
}

/// Cash and holdings for one concrete economy participant
///
/// Cash is split into `available` and `locked` sub-balances; escrow moves
/// cash between the two so a resting order can never double-spend. Holdings
/// cover goods inventory and share portfolios in one signed map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    available: Money,
    locked: Money,
    holdings: HashMap<Symbol, Quantity>,
}

impl Account {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account seeded with starting cash
    pub fn with_cash(cash: Money) -> Self {
        Self {
            available: cash,
            ..Self::default()
        }
    }

    /// Spendable cash
    pub fn available(&self) -> Money {
        self.available
    }

    /// Cash held in escrow for resting orders
    pub fn locked(&self) -> Money {
        self.locked
    }

    /// Total cash attributable to this account, spendable or not
    pub fn total_cash(&self) -> Money {
        self.available + self.locked
    }

    /// Credit cash
    pub fn deposit(&mut self, amount: Money) {
        self.available += amount;
    }

    /// Debit spendable cash
    pub fn withdraw(&mut self, amount: Money) -> Result<(), AccountError> {
        if self.available < amount {
            return Err(AccountError::InsufficientFunds {
                required: amount,
                available: self.available,
            });
        }
        self.available -= amount;
        Ok(())
    }

    /// Debit that never bounces; the balance may go negative
    ///
    /// Reserved for always-solvent parties (the treasury running a
    /// deficit). Everyone else goes through [`Account::withdraw`].
    pub fn force_withdraw(&mut self, amount: Money) {
        self.available -= amount;
    }

    /// Move cash from available into the escrow hold
    pub fn lock(&mut self, amount: Money) -> Result<(), AccountError> {
        if self.available < amount {
            return Err(AccountError::InsufficientFunds {
                required: amount,
                available: self.available,
            });
        }
        self.available -= amount;
        self.locked += amount;
        Ok(())
    }

    /// Release locked cash back to available, clamped to what is locked
    pub fn unlock(&mut self, amount: Money) {
        let release = amount.min(self.locked);
        self.locked -= release;
        self.available += release;
    }

    /// Consume locked cash at settlement
    pub fn spend_locked(&mut self, amount: Money) -> Result<(), AccountError> {
        if self.locked < amount {
            return Err(AccountError::InsufficientLock {
                required: amount,
                locked: self.locked,
            });
        }
        self.locked -= amount;
        Ok(())
    }

    /// Current holding of one symbol; zero when absent
    pub fn holding(&self, symbol: &Symbol) -> Quantity {
        self.holdings
            .get(symbol)
            .copied()
            .unwrap_or(Quantity::ZERO)
    }

    /// All non-zero holdings
    pub fn holdings(&self) -> impl Iterator<Item = (&Symbol, &Quantity)> {
        self.holdings.iter()
    }

    /// Credit holdings; zeroed entries are dropped to keep snapshots tidy
    pub fn add_holding(&mut self, symbol: &Symbol, quantity: Quantity) {
        let entry = self
            .holdings
            .entry(symbol.clone())
            .or_insert(Quantity::ZERO);
        *entry += quantity;
        if entry.is_zero() {
            self.holdings.remove(symbol);
        }
    }

    /// Take inventory out of the account
    ///
    /// `allow_negative` is the short-selling carve-out: the player's share
    /// holdings may go below zero, nobody else's may.
    pub fn remove_holding(
        &mut self,
        symbol: &Symbol,
        quantity: Quantity,
        allow_negative: bool,
    ) -> Result<(), AccountError> {
        let held = self.holding(symbol);
        if !allow_negative && held < quantity {
            return Err(AccountError::InsufficientHoldings {
                symbol: symbol.clone(),
                required: quantity,
                held,
            });
        }
        self.add_holding(symbol, -quantity);
        Ok(())
    }
}
