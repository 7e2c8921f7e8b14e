//! Held/free lock around every operation that calls out of the engine.
//!
//! The lock lives in instance storage. If the guarded operation fails the
//! host discards the write together with the rest of the invocation, so an
//! error path never leaves the lock held.

use soroban_sdk::Env;

use crate::errors::GovernanceError;
use crate::types::DataKey;

pub fn is_held(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::ReentrancyLock)
        .unwrap_or(false)
}

pub fn ensure_free(env: &Env) -> Result<(), GovernanceError> {
    if is_held(env) {
        return Err(GovernanceError::ReentrantCall);
    }
    Ok(())
}

pub fn acquire(env: &Env) -> Result<(), GovernanceError> {
    ensure_free(env)?;
    env.storage().instance().set(&DataKey::ReentrancyLock, &true);
    Ok(())
}

pub fn release(env: &Env) {
    env.storage().instance().remove(&DataKey::ReentrancyLock);
}
