//! Bootstrap - village accounts and starting endowments
//!
//! Handles initial setup of the simulation:
//! - Registering companies and residents
//! - Seeding cash through the ledger's mint hook
//! - Granting carryover inventory and the labor-pool roster

use agora_market::{Account, AccountId, Accounts, Ledger, Quantity, Result, Symbol};
use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Starting endowments for the scripted village
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Salaried residents registered in the labor pool
    pub workers: usize,
    /// Cash minted to each worker
    pub worker_savings: Decimal,
    /// Cash minted to the player
    pub player_savings: Decimal,
    /// Cash minted to the farm
    pub farm_float: Decimal,
    /// Cash minted to the bakery
    pub bakery_float: Decimal,
    /// Grain the farm carries into day one
    pub carryover_grain: Quantity,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            worker_savings: dec!(30),
            player_savings: dec!(50),
            farm_float: dec!(40),
            bakery_float: dec!(150),
            carryover_grain: dec!(10),
        }
    }
}

/// The seeded economy the day script runs against
pub struct Village {
    pub accounts: Accounts,
    pub farm: AccountId,
    pub bakery: AccountId,
    /// Equity in the bakery, the one listed share
    pub bakery_shares: Symbol,
    pub workers: Vec<AccountId>,
    pub player: AccountId,
}

impl Village {
    /// Register every account and seed it through logged mints
    pub fn bootstrap(config: &BootstrapConfig, ledger: &Ledger) -> Result<Self> {
        let mut accounts = Accounts::new();

        let farm = AccountId::Company(accounts.add_company(Account::new()));
        let bakery_id = accounts.add_company(Account::new());
        let bakery = AccountId::Company(bakery_id);

        let mut roster = Vec::with_capacity(config.workers);
        let mut workers = Vec::with_capacity(config.workers);
        for _ in 0..config.workers {
            let id = accounts.add_resident(Account::new());
            roster.push(id);
            workers.push(AccountId::Resident(id));
        }
        accounts.set_labor_pool(roster);

        let player_id = accounts.add_resident(Account::new());
        accounts.set_player(player_id);
        let player = AccountId::Resident(player_id);

        ledger.mint(&mut accounts, farm, config.farm_float, "farm float")?;
        ledger.mint(&mut accounts, bakery, config.bakery_float, "bakery float")?;
        for worker in &workers {
            ledger.mint(&mut accounts, *worker, config.worker_savings, "savings")?;
        }
        ledger.mint(&mut accounts, player, config.player_savings, "savings")?;

        if let Some(account) = accounts.get_mut(farm) {
            account.add_holding(&Symbol::good("grain"), config.carryover_grain);
        }

        info!(
            "Village seeded: workers={}, companies=2, grain carryover={}",
            config.workers, config.carryover_grain
        );

        Ok(Self {
            accounts,
            farm,
            bakery,
            bakery_shares: Symbol::share(bakery_id),
            workers,
            player,
        })
    }
}
