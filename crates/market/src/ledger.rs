use agora_core::{round_money, AccountError, AccountId, Accounts, Money};
use log::{debug, info, warn};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{MarketError, Result};

/// Atomic cash movements between accounts
///
/// Every business failure returns before the first balance changes, so a
/// rejected transfer leaves both ends untouched. The ledger never creates
/// or destroys money except through the logged `mint`/`burn` hooks and the
/// Market sink, which by definition sits outside circulation.
#[derive(Debug, Clone, Copy)]
pub struct Ledger {
    income_tax: Decimal,
}

impl Ledger {
    pub fn new(income_tax: Decimal) -> Self {
        Self { income_tax }
    }

    /// Move `amount` from one account to another
    ///
    /// The Market sink absorbs credits and sources debits without a
    /// balance. A `LaborPool` destination skims income tax into the
    /// treasury and splits the net evenly across the registered pool.
    pub fn transfer(
        &self,
        accounts: &mut Accounts,
        from: AccountId,
        to: AccountId,
        amount: Money,
    ) -> Result<()> {
        if amount <= Money::ZERO {
            return Err(MarketError::InvalidAmount(amount));
        }
        if from == AccountId::LaborPool {
            return Err(MarketError::InvalidSender(from));
        }

        // Validate both ends before touching either balance
        if from != AccountId::Market {
            let source = accounts
                .get(from)
                .ok_or(MarketError::UnknownAccount(from))?;
            if !from.is_always_solvent() && source.available() < amount {
                return Err(AccountError::InsufficientFunds {
                    required: amount,
                    available: source.available(),
                }
                .into());
            }
        }
        match to {
            AccountId::Market => {}
            AccountId::LaborPool => {
                for member in accounts.labor_pool() {
                    let id = AccountId::Resident(*member);
                    if !accounts.contains(id) {
                        return Err(MarketError::UnknownAccount(id));
                    }
                }
            }
            _ => {
                if !accounts.contains(to) {
                    return Err(MarketError::UnknownAccount(to));
                }
            }
        }

        if from != AccountId::Market {
            if let Some(source) = accounts.get_mut(from) {
                if from.is_always_solvent() {
                    source.force_withdraw(amount);
                } else {
                    source.withdraw(amount)?;
                }
            }
        }

        match to {
            AccountId::Market => {
                debug!("Transfer to market sink: from={}, amount={}", from, amount);
            }
            AccountId::LaborPool => self.distribute_to_pool(accounts, from, amount),
            _ => {
                if let Some(destination) = accounts.get_mut(to) {
                    destination.deposit(amount);
                }
                debug!("Transfer: from={}, to={}, amount={}", from, to, amount);
            }
        }

        Ok(())
    }

    /// Split a labor-pool payment across its members after the tax skim
    ///
    /// Shares round down to whole cents, so the remainder the last member
    /// absorbs is at least a full share and never negative; the distributed
    /// total equals the net exactly.
    fn distribute_to_pool(&self, accounts: &mut Accounts, from: AccountId, amount: Money) {
        let tax = round_money(amount * self.income_tax);
        let net = amount - tax;
        if tax > Money::ZERO {
            accounts.collect_income_tax(tax);
        }

        let members = accounts.labor_pool().to_vec();
        if members.is_empty() {
            warn!(
                "Labor pool is empty: from={}, net={} routed to treasury",
                from, net
            );
            if let Some(treasury) = accounts.get_mut(AccountId::Treasury) {
                treasury.deposit(net);
            }
            return;
        }

        let share = (net / Decimal::from(members.len()))
            .round_dp_with_strategy(2, RoundingStrategy::ToZero);
        let last = members.len() - 1;
        for (index, member) in members.iter().enumerate() {
            let portion = if index == last {
                net - share * Decimal::from(last)
            } else {
                share
            };
            if let Some(account) = accounts.get_mut(AccountId::Resident(*member)) {
                account.deposit(portion);
            }
        }

        debug!(
            "Labor pool payout: from={}, gross={}, tax={}, members={}, share={}",
            from,
            amount,
            tax,
            members.len(),
            share
        );
    }

    /// Create money out of thin air and credit it to `to`
    ///
    /// One of the two sanctioned conservation breaks, so every call is
    /// logged at info with its reason.
    pub fn mint(
        &self,
        accounts: &mut Accounts,
        to: AccountId,
        amount: Money,
        reason: &str,
    ) -> Result<()> {
        if amount <= Money::ZERO {
            return Err(MarketError::InvalidAmount(amount));
        }
        let destination = accounts
            .get_mut(to)
            .ok_or(MarketError::UnknownAccount(to))?;
        destination.deposit(amount);
        info!("Minted: to={}, amount={}, reason={}", to, amount, reason);
        Ok(())
    }

    /// Destroy money held by `from`
    pub fn burn(
        &self,
        accounts: &mut Accounts,
        from: AccountId,
        amount: Money,
        reason: &str,
    ) -> Result<()> {
        if amount <= Money::ZERO {
            return Err(MarketError::InvalidAmount(amount));
        }
        let source = accounts
            .get_mut(from)
            .ok_or(MarketError::UnknownAccount(from))?;
        if from.is_always_solvent() {
            source.force_withdraw(amount);
        } else {
            source.withdraw(amount)?;
        }
        info!("Burned: from={}, amount={}, reason={}", from, amount, reason);
        Ok(())
    }
}
