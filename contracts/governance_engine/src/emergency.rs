//! Emergency withdrawal tally.
//!
//! One global round at a time, only while paused. The first approval fixes
//! the request; once `threshold` signers have approved the same request the
//! transfer runs inside that call and the round is wiped.

use soroban_sdk::{log, Address, Env, Vec};

use crate::config::{self, BPS_DENOMINATOR};
use crate::dispatch;
use crate::errors::GovernanceError;
use crate::events::{EmergencyApprovalGranted, EmergencyWithdrawal};
use crate::reentrancy;
use crate::signers;
use crate::types::{DataKey, EmergencyRequest};

pub fn approvals(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::EmergencyApprovals)
        .unwrap_or(Vec::new(env))
}

pub fn request(env: &Env) -> Option<EmergencyRequest> {
    env.storage().instance().get(&DataKey::EmergencyRequest)
}

pub fn has_approval(env: &Env, signer: &Address) -> bool {
    approvals(env).contains(signer)
}

pub fn reset(env: &Env) {
    env.storage().instance().remove(&DataKey::EmergencyApprovals);
    env.storage().instance().remove(&DataKey::EmergencyRequest);
}

/// Drops a departing signer's outstanding approval, if any.
pub fn forget_approval(env: &Env, signer: &Address) {
    let mut current = approvals(env);
    if let Some(index) = current.first_index_of(signer) {
        current.remove(index);
        if current.is_empty() {
            reset(env);
        } else {
            env.storage()
                .instance()
                .set(&DataKey::EmergencyApprovals, &current);
        }
    }
}

/// Largest amount the cap permits against `balance`.
pub fn limit(balance: i128, fraction_bps: u32) -> i128 {
    balance
        .checked_mul(fraction_bps as i128)
        .map(|scaled| scaled / BPS_DENOMINATOR as i128)
        .unwrap_or(balance / BPS_DENOMINATOR as i128 * fraction_bps as i128)
}

/// Records `signer`'s approval of withdrawing `amount` of `token` to
/// `recipient`. Returns `true` when this approval completed the quorum and
/// the transfer ran.
pub fn approve(
    env: &Env,
    signer: &Address,
    token: &Address,
    recipient: &Address,
    amount: i128,
) -> Result<bool, GovernanceError> {
    if !config::flag(env, &DataKey::Paused) {
        return Err(GovernanceError::NotPaused);
    }
    signers::require_signer(env, signer)?;

    let mut current = approvals(env);
    if current.contains(signer) {
        return Err(GovernanceError::AlreadyApproved);
    }
    if *recipient == config::null_address(env) || *recipient == env.current_contract_address() {
        return Err(GovernanceError::InvalidRecipient);
    }
    if amount <= 0 {
        return Err(GovernanceError::ZeroAmount);
    }

    let fraction = config::load(env)?.emergency_fraction_bps;
    let balance = dispatch::balance(env, token)?;
    if amount > limit(balance, fraction) {
        return Err(GovernanceError::ExceedsLimit);
    }

    let wanted = EmergencyRequest {
        token: token.clone(),
        recipient: recipient.clone(),
        amount,
    };
    match request(env) {
        Some(existing) if existing != wanted => return Err(GovernanceError::RequestMismatch),
        Some(_) => {}
        None => env.storage().instance().set(&DataKey::EmergencyRequest, &wanted),
    }

    current.push_back(signer.clone());
    env.storage()
        .instance()
        .set(&DataKey::EmergencyApprovals, &current);

    log!(env, "emergency approval", current.len());
    EmergencyApprovalGranted {
        signer: signer.clone(),
        approvals: current.len(),
    }
    .publish(env);

    if current.len() < signers::threshold(env)? {
        return Ok(false);
    }

    reset(env);
    reentrancy::acquire(env)?;
    dispatch::transfer(env, token, recipient, amount)?;
    reentrancy::release(env);

    log!(env, "emergency withdrawal executed", amount);
    EmergencyWithdrawal {
        token: token.clone(),
        recipient: recipient.clone(),
        amount,
    }
    .publish(env);
    Ok(true)
}
