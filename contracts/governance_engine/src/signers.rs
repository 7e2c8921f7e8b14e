use soroban_sdk::{log, Address, Env, Vec};

use crate::config::{self, MAX_BATCH_SIZE, MAX_SIGNERS};
use crate::emergency;
use crate::errors::GovernanceError;
use crate::events::{SignerAdded, SignerRemoved, ThresholdChanged};
use crate::types::DataKey;

pub fn all(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::Signers)
        .unwrap_or(Vec::new(env))
}

pub fn count(env: &Env) -> u32 {
    all(env).len()
}

pub fn is_signer(env: &Env, address: &Address) -> bool {
    all(env).contains(address)
}

pub fn require_signer(env: &Env, address: &Address) -> Result<(), GovernanceError> {
    if !is_signer(env, address) {
        return Err(GovernanceError::NotSigner);
    }
    Ok(())
}

/// Membership number of a current signer. Each admission gets a fresh one,
/// so a signer that is removed and added back starts with a clean slate.
pub fn membership(env: &Env, address: &Address) -> Option<u32> {
    env.storage()
        .instance()
        .get(&DataKey::Membership(address.clone()))
}

fn admit(env: &Env, signer: &Address) {
    let next: u32 = env
        .storage()
        .instance()
        .get(&DataKey::MembershipSeq)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::Membership(signer.clone()), &next);
    env.storage()
        .instance()
        .set(&DataKey::MembershipSeq, &(next + 1));
}

pub fn threshold(env: &Env) -> Result<u32, GovernanceError> {
    env.storage()
        .instance()
        .get(&DataKey::Threshold)
        .ok_or(GovernanceError::NotInitialized)
}

/// Validates and stores the founding signer set.
pub fn init(env: &Env, signers: &Vec<Address>, threshold: u32) -> Result<(), GovernanceError> {
    if signers.is_empty() {
        return Err(GovernanceError::EmptySignersList);
    }
    if signers.len() > MAX_SIGNERS {
        return Err(GovernanceError::TooManySigners);
    }
    if threshold == 0 {
        return Err(GovernanceError::InvalidThreshold);
    }
    if threshold > signers.len() {
        return Err(GovernanceError::ThresholdExceedsSigners);
    }

    let null = config::null_address(env);
    let mut unique: Vec<Address> = Vec::new(env);
    for signer in signers.iter() {
        if signer == null {
            return Err(GovernanceError::InvalidSigner);
        }
        if unique.contains(&signer) {
            return Err(GovernanceError::DuplicateSigner);
        }
        admit(env, &signer);
        unique.push_back(signer);
    }

    env.storage().instance().set(&DataKey::Signers, &unique);
    env.storage().instance().set(&DataKey::Threshold, &threshold);
    Ok(())
}

pub fn add(env: &Env, signer: &Address) -> Result<(), GovernanceError> {
    let mut signers = all(env);
    push_checked(env, &mut signers, signer)?;
    env.storage().instance().set(&DataKey::Signers, &signers);
    Ok(())
}

/// Adds every address or none of them. Returns how many were added.
pub fn add_batch(env: &Env, new_signers: &Vec<Address>) -> Result<u32, GovernanceError> {
    if new_signers.len() > MAX_BATCH_SIZE {
        return Err(GovernanceError::BatchTooLarge);
    }
    let mut signers = all(env);
    for signer in new_signers.iter() {
        push_checked(env, &mut signers, &signer)?;
    }
    env.storage().instance().set(&DataKey::Signers, &signers);
    Ok(new_signers.len())
}

fn push_checked(
    env: &Env,
    signers: &mut Vec<Address>,
    signer: &Address,
) -> Result<(), GovernanceError> {
    if *signer == config::null_address(env) {
        return Err(GovernanceError::InvalidSigner);
    }
    if signers.contains(signer) {
        return Err(GovernanceError::DuplicateSigner);
    }
    if signers.len() >= MAX_SIGNERS {
        return Err(GovernanceError::TooManySigners);
    }
    signers.push_back(signer.clone());
    admit(env, signer);

    log!(env, "signer added", signers.len());
    SignerAdded {
        signer: signer.clone(),
        signer_count: signers.len(),
    }
    .publish(env);
    Ok(())
}

pub fn remove(env: &Env, signer: &Address) -> Result<(), GovernanceError> {
    let mut signers = all(env);
    let index = signers
        .first_index_of(signer)
        .ok_or(GovernanceError::SignerNotFound)?;

    let threshold = threshold(env)?;
    if signers.len() - 1 < threshold {
        return Err(GovernanceError::ThresholdExceedsSigners);
    }

    signers.remove(index);
    env.storage().instance().set(&DataKey::Signers, &signers);
    env.storage()
        .instance()
        .remove(&DataKey::Membership(signer.clone()));
    emergency::forget_approval(env, signer);

    log!(env, "signer removed", signers.len());
    SignerRemoved {
        signer: signer.clone(),
        signer_count: signers.len(),
    }
    .publish(env);
    Ok(())
}

pub fn change_threshold(env: &Env, new_threshold: u32) -> Result<(), GovernanceError> {
    if new_threshold == 0 {
        return Err(GovernanceError::InvalidThreshold);
    }
    if new_threshold > count(env) {
        return Err(GovernanceError::ThresholdExceedsSigners);
    }

    let old_threshold = threshold(env)?;
    env.storage().instance().set(&DataKey::Threshold, &new_threshold);

    log!(env, "threshold changed", old_threshold, new_threshold);
    ThresholdChanged {
        old_threshold,
        new_threshold,
    }
    .publish(env);
    Ok(())
}
