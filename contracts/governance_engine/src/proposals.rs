//! Proposal ledger: submission, confirmation, revocation, execution and
//! expiry-cancellation, plus the pending-id index used for enumeration.
//!
//! Ids are handed out from a monotonically increasing counter and never
//! reused. Confirmations are counted against the current signer set, so a
//! signer's confirmations stop counting once they are removed.

use soroban_sdk::{log, Address, Env, String, Symbol, Vec};

use crate::config;
use crate::dispatch;
use crate::errors::GovernanceError;
use crate::events::{
    ConfirmationRevoked, FunctionAllowanceSet, ProposalCancelled, ProposalConfirmed,
    ProposalExecuted, ProposalSubmitted,
};
use crate::pending;
use crate::reentrancy;
use crate::signers;
use crate::types::{Config, DataKey, Payload, Proposal};

pub fn count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ProposalCount)
        .unwrap_or(0u64)
}

pub fn load(env: &Env, id: u64) -> Result<Proposal, GovernanceError> {
    env.storage()
        .persistent()
        .get(&DataKey::Proposal(id))
        .ok_or(GovernanceError::DoesNotExist)
}

fn save(env: &Env, proposal: &Proposal) {
    let key = DataKey::Proposal(proposal.id);
    env.storage().persistent().set(&key, proposal);
    config::bump_persistent(env, &key);
}

/// A confirmation counts only while the signer holds the membership it was
/// given under.
pub fn has_confirmed(env: &Env, id: u64, signer: &Address) -> bool {
    let Some(membership) = signers::membership(env, signer) else {
        return false;
    };
    env.storage()
        .persistent()
        .get::<_, u32>(&DataKey::Confirmation(id, signer.clone()))
        == Some(membership)
}

fn set_confirmed(env: &Env, id: u64, signer: &Address) -> Result<(), GovernanceError> {
    let membership = signers::membership(env, signer).ok_or(GovernanceError::NotSigner)?;
    let key = DataKey::Confirmation(id, signer.clone());
    env.storage().persistent().set(&key, &membership);
    config::bump_persistent(env, &key);
    Ok(())
}

/// Current signers that have confirmed `id`.
pub fn confirmers(env: &Env, id: u64) -> Vec<Address> {
    let mut out = Vec::new(env);
    for signer in signers::all(env).iter() {
        if has_confirmed(env, id, &signer) {
            out.push_back(signer);
        }
    }
    out
}

pub fn confirmation_count(env: &Env, id: u64) -> u32 {
    confirmers(env, id).len()
}

pub fn is_function_allowed(env: &Env, target: &Address, selector: &Symbol) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::FunctionAllowed(target.clone(), selector.clone()))
        .unwrap_or(false)
}

pub fn set_function_allowance(env: &Env, target: &Address, selector: &Symbol, allowed: bool) {
    let key = DataKey::FunctionAllowed(target.clone(), selector.clone());
    if allowed {
        env.storage().persistent().set(&key, &true);
        config::bump_persistent(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }

    FunctionAllowanceSet {
        target: target.clone(),
        selector: selector.clone(),
        allowed,
    }
    .publish(env);
}

pub fn is_expired(env: &Env, proposal: &Proposal, config: &Config) -> bool {
    env.ledger().timestamp() > proposal.submitted_at.saturating_add(config.expiry_window)
}

fn targets_engine(env: &Env, proposal: &Proposal) -> bool {
    proposal.target == env.current_contract_address()
}

pub fn submit(
    env: &Env,
    proposer: &Address,
    target: &Address,
    value: i128,
    payload: Payload,
    description: String,
) -> Result<u64, GovernanceError> {
    signers::require_signer(env, proposer)?;
    if *target == config::null_address(env) {
        return Err(GovernanceError::InvalidTarget);
    }
    if value < 0 || (value > 0 && *target == env.current_contract_address()) {
        return Err(GovernanceError::InvalidValue);
    }
    // Governance proposals stay open while paused so Unpause is reachable.
    if config::flag(env, &DataKey::Paused) && *target != env.current_contract_address() {
        return Err(GovernanceError::Paused);
    }

    let id = count(env);
    env.storage().instance().set(&DataKey::ProposalCount, &(id + 1));

    let proposal = Proposal {
        id,
        proposer: proposer.clone(),
        target: target.clone(),
        value,
        payload,
        description,
        submitted_at: env.ledger().timestamp(),
        executed: false,
        cancelled: false,
    };
    save(env, &proposal);
    set_confirmed(env, id, proposer)?;
    pending::insert(env, id);

    log!(env, "proposal submitted", id);
    ProposalSubmitted {
        id,
        proposer: proposer.clone(),
        target: target.clone(),
        value,
    }
    .publish(env);
    ProposalConfirmed {
        id,
        signer: proposer.clone(),
        confirmations: 1,
    }
    .publish(env);

    Ok(id)
}

/// Records a confirmation. Validates everything before the first write so a
/// rejected confirmation leaves no trace even when the caller swallows the error.
pub fn confirm(
    env: &Env,
    signer: &Address,
    id: u64,
    config: &Config,
) -> Result<Proposal, GovernanceError> {
    signers::require_signer(env, signer)?;
    let proposal = load(env, id)?;
    if proposal.is_finalized() {
        return Err(GovernanceError::AlreadyFinalized);
    }
    if has_confirmed(env, id, signer) {
        return Err(GovernanceError::AlreadyConfirmed);
    }
    if is_expired(env, &proposal, config) {
        return Err(GovernanceError::ProposalExpired);
    }

    set_confirmed(env, id, signer)?;
    let confirmations = confirmation_count(env, id);

    log!(env, "proposal confirmed", id, confirmations);
    ProposalConfirmed {
        id,
        signer: signer.clone(),
        confirmations,
    }
    .publish(env);

    Ok(proposal)
}

pub fn revoke(env: &Env, signer: &Address, id: u64) -> Result<(), GovernanceError> {
    signers::require_signer(env, signer)?;
    let proposal = load(env, id)?;
    if proposal.is_finalized() {
        return Err(GovernanceError::AlreadyFinalized);
    }
    if !has_confirmed(env, id, signer) {
        return Err(GovernanceError::NotConfirmed);
    }

    env.storage()
        .persistent()
        .remove(&DataKey::Confirmation(id, signer.clone()));
    let confirmations = confirmation_count(env, id);

    log!(env, "confirmation revoked", id, confirmations);
    ConfirmationRevoked {
        id,
        signer: signer.clone(),
        confirmations,
    }
    .publish(env);
    Ok(())
}

/// Checks every execution precondition, returning the first that fails.
pub fn check_executable(
    env: &Env,
    proposal: &Proposal,
    config: &Config,
) -> Result<(), GovernanceError> {
    if proposal.is_finalized() {
        return Err(GovernanceError::AlreadyFinalized);
    }
    if is_expired(env, proposal, config) {
        return Err(GovernanceError::ProposalExpired);
    }
    if confirmation_count(env, proposal.id) < signers::threshold(env)? {
        return Err(GovernanceError::NotEnoughConfirmations);
    }
    let ready_at = proposal.submitted_at.saturating_add(config.execution_delay);
    if env.ledger().timestamp() < ready_at {
        return Err(GovernanceError::TimelockNotElapsed);
    }

    if targets_engine(env, proposal) {
        return Ok(());
    }
    if config::flag(env, &DataKey::Paused) {
        return Err(GovernanceError::Paused);
    }
    if let Some(selector) = proposal.selector() {
        if config::flag(env, &DataKey::RestrictCalls)
            && !is_function_allowed(env, &proposal.target, &selector)
        {
            return Err(GovernanceError::FunctionNotAllowed);
        }
    }
    Ok(())
}

pub fn execute(
    env: &Env,
    executor: &Address,
    id: u64,
    config: &Config,
) -> Result<(), GovernanceError> {
    signers::require_signer(env, executor)?;
    let proposal = load(env, id)?;
    check_executable(env, &proposal, config)?;
    execute_unchecked(env, executor, proposal)
}

/// Marks the proposal executed, then performs its call under the guard.
/// Any failure of the call fails the whole invocation and the host rolls
/// the executed flag back with everything else.
pub fn execute_unchecked(
    env: &Env,
    executor: &Address,
    mut proposal: Proposal,
) -> Result<(), GovernanceError> {
    proposal.executed = true;
    save(env, &proposal);
    pending::remove(env, proposal.id);

    reentrancy::acquire(env)?;
    dispatch::invoke(env, &proposal)?;
    reentrancy::release(env);

    log!(env, "proposal executed", proposal.id);
    ProposalExecuted {
        id: proposal.id,
        executor: executor.clone(),
    }
    .publish(env);
    Ok(())
}

/// Runs execution as a side effect of a confirmation when everything is
/// already in place. Returns whether it executed.
pub fn try_auto_execute(
    env: &Env,
    executor: &Address,
    proposal: Proposal,
    config: &Config,
) -> Result<bool, GovernanceError> {
    if !config::flag(env, &DataKey::AutoExecute) {
        return Ok(false);
    }
    if check_executable(env, &proposal, config).is_err() {
        return Ok(false);
    }
    execute_unchecked(env, executor, proposal)?;
    Ok(true)
}

pub fn cancel_expired(
    env: &Env,
    caller: &Address,
    id: u64,
    config: &Config,
) -> Result<(), GovernanceError> {
    signers::require_signer(env, caller)?;
    let mut proposal = load(env, id)?;
    if proposal.is_finalized() {
        return Err(GovernanceError::AlreadyFinalized);
    }
    if !is_expired(env, &proposal, config) {
        return Err(GovernanceError::NotExpired);
    }

    proposal.cancelled = true;
    save(env, &proposal);
    pending::remove(env, id);

    log!(env, "proposal cancelled", id);
    ProposalCancelled {
        id,
        cancelled_by: caller.clone(),
    }
    .publish(env);
    Ok(())
}
