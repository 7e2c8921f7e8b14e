use soroban_sdk::{Address, Env, String};

use crate::errors::GovernanceError;
use crate::types::{Config, DataKey};

pub const MAX_SIGNERS: u32 = 20;
pub const MAX_BATCH_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const BPS_DENOMINATOR: u32 = 10_000;

pub const DEFAULT_EXECUTION_DELAY: u64 = 3_600; // 1 hour
pub const DEFAULT_EXPIRY_WINDOW: u64 = 604_800; // 7 days
pub const DEFAULT_EMERGENCY_FRACTION_BPS: u32 = 5_000;
pub const DEFAULT_BATCH_BUDGET: u32 = 400;

// Batch cost units
pub const SKIP_COST: u32 = 1;
pub const CANCEL_COST: u32 = 2;
pub const CONFIRM_COST: u32 = 4;

// Ledger TTLs, ~5s per ledger
const DAY_IN_LEDGERS: u32 = 17_280;
pub const INSTANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub const PERSISTENT_BUMP_AMOUNT: u32 = 90 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Strkey of the all-zero contract id, the ledger's stand-in for "no address".
const NULL_ADDRESS: &str = "CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSC4";

pub fn default_config() -> Config {
    Config {
        execution_delay: DEFAULT_EXECUTION_DELAY,
        expiry_window: DEFAULT_EXPIRY_WINDOW,
        emergency_fraction_bps: DEFAULT_EMERGENCY_FRACTION_BPS,
        batch_budget: DEFAULT_BATCH_BUDGET,
    }
}

pub fn validate(config: &Config) -> Result<(), GovernanceError> {
    if config.expiry_window <= config.execution_delay {
        return Err(GovernanceError::InvalidConfig);
    }
    if config.emergency_fraction_bps == 0 || config.emergency_fraction_bps > BPS_DENOMINATOR {
        return Err(GovernanceError::InvalidConfig);
    }
    if config.batch_budget < CONFIRM_COST {
        return Err(GovernanceError::InvalidConfig);
    }
    Ok(())
}

pub fn load(env: &Env) -> Result<Config, GovernanceError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(GovernanceError::NotInitialized)
}

pub fn asset(env: &Env) -> Result<Address, GovernanceError> {
    env.storage()
        .instance()
        .get(&DataKey::Asset)
        .ok_or(GovernanceError::NotInitialized)
}

pub fn null_address(env: &Env) -> Address {
    Address::from_string(&String::from_str(env, NULL_ADDRESS))
}

pub fn flag(env: &Env, key: &DataKey) -> bool {
    env.storage().instance().get(key).unwrap_or(false)
}

pub fn set_flag(env: &Env, key: &DataKey, value: bool) {
    env.storage().instance().set(key, &value);
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}
