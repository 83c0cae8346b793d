//! The economy's account registry
//!
//! One mutable state tree owns every concrete account; core operations
//! borrow it for the duration of a call. The registry resolves account
//! ids, carries the treasury's tax receipts, the labor pool roster, and
//! the distinguished player marker. It creates accounts only on behalf
//! of the surrounding simulation; market operations never add or remove
//! entries, they only mutate balances.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Account, AccountId};
use crate::values::{CompanyId, Money, ResidentId};

/// Cumulative treasury receipts, split by tax stream
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TaxReceipts {
    /// Skimmed from sellers on every settled trade
    pub transaction_tax: Money,
    /// Skimmed from wage payments routed through the labor pool
    pub income_tax: Money,
}

/// Registry of every concrete account in the economy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Accounts {
    residents: HashMap<ResidentId, Account>,
    companies: HashMap<CompanyId, Account>,
    treasury: Account,
    /// Labor-pool receipts fan out evenly across this roster
    labor_pool: Vec<ResidentId>,
    /// The one resident allowed to short-sell shares
    player: Option<ResidentId>,
    tax_receipts: TaxReceipts,
}

impl Accounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resident account, returning its generated id
    pub fn add_resident(&mut self, account: Account) -> ResidentId {
        let id = Uuid::new_v4();
        self.residents.insert(id, account);
        id
    }

    /// Register a company account, returning its generated id
    pub fn add_company(&mut self, account: Account) -> CompanyId {
        let id = Uuid::new_v4();
        self.companies.insert(id, account);
        id
    }

    /// Resolve an id to its concrete account
    ///
    /// Sentinels and unknown ids resolve to `None`; the ledger handles
    /// sentinel semantics before ever looking an account up.
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        match id {
            AccountId::Resident(r) => self.residents.get(&r),
            AccountId::Company(c) => self.companies.get(&c),
            AccountId::Treasury => Some(&self.treasury),
            AccountId::Market | AccountId::LaborPool => None,
        }
    }

    pub fn get_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        match id {
            AccountId::Resident(r) => self.residents.get_mut(&r),
            AccountId::Company(c) => self.companies.get_mut(&c),
            AccountId::Treasury => Some(&mut self.treasury),
            AccountId::Market | AccountId::LaborPool => None,
        }
    }

    /// Returns true if the id resolves to a concrete account
    pub fn contains(&self, id: AccountId) -> bool {
        self.get(id).is_some()
    }

    pub fn treasury(&self) -> &Account {
        &self.treasury
    }

    pub fn residents(&self) -> impl Iterator<Item = (&ResidentId, &Account)> {
        self.residents.iter()
    }

    pub fn companies(&self) -> impl Iterator<Item = (&CompanyId, &Account)> {
        self.companies.iter()
    }

    /// Replace the labor pool roster; membership is decided by the labor
    /// system each tick, not by the market core
    pub fn set_labor_pool(&mut self, members: Vec<ResidentId>) {
        self.labor_pool = members;
    }

    pub fn labor_pool(&self) -> &[ResidentId] {
        &self.labor_pool
    }

    /// Mark the distinguished player resident
    pub fn set_player(&mut self, id: ResidentId) {
        self.player = Some(id);
    }

    pub fn player(&self) -> Option<ResidentId> {
        self.player
    }

    /// Returns true if `id` is the player's resident account
    pub fn is_player(&self, id: AccountId) -> bool {
        matches!((id, self.player), (AccountId::Resident(r), Some(p)) if r == p)
    }

    /// Credit the treasury with transaction tax and record the receipt
    pub fn collect_transaction_tax(&mut self, amount: Money) {
        self.treasury.deposit(amount);
        self.tax_receipts.transaction_tax += amount;
    }

    /// Credit the treasury with income tax and record the receipt
    pub fn collect_income_tax(&mut self, amount: Money) {
        self.treasury.deposit(amount);
        self.tax_receipts.income_tax += amount;
    }

    pub fn tax_receipts(&self) -> TaxReceipts {
        self.tax_receipts
    }

    /// Total cash across every concrete account, locked included
    ///
    /// This is the quantity the conservation invariant protects: trades
    /// and taxes move it around, only explicit mint/burn changes it.
    pub fn total_cash(&self) -> Money {
        let mut total = self.treasury.total_cash();
        for account in self.residents.values() {
            total += account.total_cash();
        }
        for account in self.companies.values() {
            total += account.total_cash();
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_registry_resolves_concrete_accounts_only() {
        let mut accounts = Accounts::new();
        let alice = accounts.add_resident(Account::with_cash(dec!(50)));
        let mill = accounts.add_company(Account::with_cash(dec!(200)));

        assert!(accounts.contains(AccountId::Resident(alice)));
        assert!(accounts.contains(AccountId::Company(mill)));
        assert!(accounts.contains(AccountId::Treasury));
        assert!(!accounts.contains(AccountId::Market));
        assert!(!accounts.contains(AccountId::LaborPool));
        assert!(!accounts.contains(AccountId::Resident(Uuid::new_v4())));
    }

    #[test]
    fn test_tax_collection_lands_in_treasury_and_receipts() {
        let mut accounts = Accounts::new();
        accounts.collect_transaction_tax(dec!(3));
        accounts.collect_income_tax(dec!(2));

        assert_eq!(accounts.treasury().available(), dec!(5));
        assert_eq!(accounts.tax_receipts().transaction_tax, dec!(3));
        assert_eq!(accounts.tax_receipts().income_tax, dec!(2));
    }

    #[test]
    fn test_total_cash_counts_locked_balances() {
        let mut accounts = Accounts::new();
        let alice = accounts.add_resident(Account::with_cash(dec!(80)));
        accounts.add_company(Account::with_cash(dec!(20)));

        accounts
            .get_mut(AccountId::Resident(alice))
            .unwrap()
            .lock(dec!(30))
            .unwrap();

        assert_eq!(accounts.total_cash(), dec!(100));
    }

    #[test]
    fn test_player_marker() {
        let mut accounts = Accounts::new();
        let alice = accounts.add_resident(Account::new());
        let bob = accounts.add_resident(Account::new());
        accounts.set_player(alice);

        assert!(accounts.is_player(AccountId::Resident(alice)));
        assert!(!accounts.is_player(AccountId::Resident(bob)));
        assert!(!accounts.is_player(AccountId::Treasury));
    }
}
