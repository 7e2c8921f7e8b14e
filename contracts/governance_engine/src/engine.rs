use soroban_sdk::{contract, contractimpl, log, token, Address, Env, String, Symbol, Vec};

use crate::batch;
use crate::config;
use crate::dispatch;
use crate::emergency;
use crate::errors::GovernanceError;
use crate::events::{
    AutoExecuteToggled, BatchProcessed, Deposit, EnginePaused, EngineUnpaused, Initialized,
    RestrictionsToggled, TokenTransferred,
};
use crate::pagination;
use crate::pending;
use crate::proposals;
use crate::reentrancy;
use crate::signers;
use crate::types::{
    BatchResult, Config, DataKey, EmergencyRequest, Payload, PendingPage, Proposal, SignerPage,
};

#[contract]
pub struct GovernanceEngine;

#[contractimpl]
impl GovernanceEngine {
    pub fn initialize(
        env: Env,
        signers: Vec<Address>,
        threshold: u32,
        asset: Address,
        config: Config,
    ) -> Result<(), GovernanceError> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(GovernanceError::AlreadyInitialized);
        }
        config::validate(&config)?;
        signers::init(&env, &signers, threshold)?;

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::Asset, &asset);
        env.storage().instance().set(&DataKey::ProposalCount, &0u64);
        config::set_flag(&env, &DataKey::AutoExecute, true);
        config::set_flag(&env, &DataKey::RestrictCalls, false);
        config::set_flag(&env, &DataKey::Paused, false);
        config::bump_instance(&env);

        log!(&env, "governance engine initialized", signers.len(), threshold);
        Initialized {
            signer_count: signers.len(),
            threshold,
            asset,
        }
        .publish(&env);
        Ok(())
    }

    /// Pulls `amount` of the asset from `from` into the pool.
    pub fn deposit(env: Env, from: Address, amount: i128) -> Result<(), GovernanceError> {
        Self::require_callable(&env)?;
        from.require_auth();
        if amount <= 0 {
            return Err(GovernanceError::ZeroAmount);
        }

        let asset = config::asset(&env)?;
        let client = token::TokenClient::new(&env, &asset);
        match client.try_transfer(&from, &env.current_contract_address(), &amount) {
            Ok(Ok(())) => {}
            _ => return Err(GovernanceError::CallFailed),
        }

        Deposit { from, amount }.publish(&env);
        Ok(())
    }

    pub fn submit(
        env: Env,
        proposer: Address,
        target: Address,
        value: i128,
        payload: Payload,
        description: String,
    ) -> Result<u64, GovernanceError> {
        Self::require_callable(&env)?;
        proposer.require_auth();
        proposals::submit(&env, &proposer, &target, value, payload, description)
    }

    /// Adds `signer`'s confirmation. With auto-execute on, a proposal that is
    /// already executable runs in the same call; returns whether it did.
    pub fn confirm(env: Env, signer: Address, id: u64) -> Result<bool, GovernanceError> {
        Self::require_callable(&env)?;
        signer.require_auth();
        let config = config::load(&env)?;
        let proposal = proposals::confirm(&env, &signer, id, &config)?;
        proposals::try_auto_execute(&env, &signer, proposal, &config)
    }

    pub fn revoke(env: Env, signer: Address, id: u64) -> Result<(), GovernanceError> {
        Self::require_callable(&env)?;
        signer.require_auth();
        proposals::revoke(&env, &signer, id)
    }

    pub fn execute(env: Env, executor: Address, id: u64) -> Result<(), GovernanceError> {
        Self::require_callable(&env)?;
        executor.require_auth();
        let config = config::load(&env)?;
        proposals::execute(&env, &executor, id, &config)
    }

    pub fn cancel_expired(env: Env, caller: Address, id: u64) -> Result<(), GovernanceError> {
        Self::require_callable(&env)?;
        caller.require_auth();
        let config = config::load(&env)?;
        proposals::cancel_expired(&env, &caller, id, &config)
    }

    /// Approves withdrawing `amount` of the pooled asset to `recipient`.
    /// Returns `true` when this approval completed the quorum and paid out.
    pub fn emergency_approve(
        env: Env,
        signer: Address,
        recipient: Address,
        amount: i128,
    ) -> Result<bool, GovernanceError> {
        Self::require_callable(&env)?;
        signer.require_auth();
        let asset = config::asset(&env)?;
        emergency::approve(&env, &signer, &asset, &recipient, amount)
    }

    /// Same as `emergency_approve` for any token the engine holds.
    pub fn emergency_approve_token(
        env: Env,
        signer: Address,
        token: Address,
        recipient: Address,
        amount: i128,
    ) -> Result<bool, GovernanceError> {
        Self::require_callable(&env)?;
        signer.require_auth();
        emergency::approve(&env, &signer, &token, &recipient, amount)
    }

    pub fn batch_confirm(
        env: Env,
        signer: Address,
        ids: Vec<u64>,
    ) -> Result<BatchResult, GovernanceError> {
        Self::require_callable(&env)?;
        signer.require_auth();
        batch::confirm(&env, &signer, &ids)
    }

    pub fn batch_cancel_expired(
        env: Env,
        caller: Address,
        ids: Vec<u64>,
    ) -> Result<BatchResult, GovernanceError> {
        Self::require_callable(&env)?;
        caller.require_auth();
        batch::cancel_expired(&env, &caller, &ids)
    }

    pub fn add_signer(env: Env, signer: Address) -> Result<(), GovernanceError> {
        Self::require_governance(&env)?;
        signers::add(&env, &signer)
    }

    pub fn add_signers_batch(env: Env, new_signers: Vec<Address>) -> Result<(), GovernanceError> {
        Self::require_governance(&env)?;
        let added = signers::add_batch(&env, &new_signers)?;
        BatchProcessed {
            operation: Symbol::new(&env, "add_signers"),
            processed: added,
            examined: new_signers.len(),
        }
        .publish(&env);
        Ok(())
    }

    pub fn remove_signer(env: Env, signer: Address) -> Result<(), GovernanceError> {
        Self::require_governance(&env)?;
        signers::remove(&env, &signer)
    }

    pub fn change_threshold(env: Env, threshold: u32) -> Result<(), GovernanceError> {
        Self::require_governance(&env)?;
        signers::change_threshold(&env, threshold)
    }

    pub fn pause(env: Env) -> Result<(), GovernanceError> {
        Self::require_governance(&env)?;
        if config::flag(&env, &DataKey::Paused) {
            return Err(GovernanceError::AlreadyPaused);
        }
        config::set_flag(&env, &DataKey::Paused, true);

        log!(&env, "engine paused");
        EnginePaused {
            timestamp: env.ledger().timestamp(),
        }
        .publish(&env);
        Ok(())
    }

    pub fn unpause(env: Env) -> Result<(), GovernanceError> {
        Self::require_governance(&env)?;
        if !config::flag(&env, &DataKey::Paused) {
            return Err(GovernanceError::NotPaused);
        }
        config::set_flag(&env, &DataKey::Paused, false);
        emergency::reset(&env);

        log!(&env, "engine unpaused");
        EngineUnpaused {
            timestamp: env.ledger().timestamp(),
        }
        .publish(&env);
        Ok(())
    }

    pub fn toggle_auto_execute(env: Env) -> Result<(), GovernanceError> {
        Self::require_governance(&env)?;
        let enabled = !config::flag(&env, &DataKey::AutoExecute);
        config::set_flag(&env, &DataKey::AutoExecute, enabled);
        AutoExecuteToggled { enabled }.publish(&env);
        Ok(())
    }

    pub fn toggle_function_restrictions(env: Env) -> Result<(), GovernanceError> {
        Self::require_governance(&env)?;
        let enabled = !config::flag(&env, &DataKey::RestrictCalls);
        config::set_flag(&env, &DataKey::RestrictCalls, enabled);
        RestrictionsToggled { enabled }.publish(&env);
        Ok(())
    }

    pub fn set_function_allowance(
        env: Env,
        target: Address,
        selector: Symbol,
        allowed: bool,
    ) -> Result<(), GovernanceError> {
        Self::require_governance(&env)?;
        proposals::set_function_allowance(&env, &target, &selector, allowed);
        Ok(())
    }

    /// Moves any token the engine holds.
    pub fn transfer_token(
        env: Env,
        token: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), GovernanceError> {
        Self::require_governance(&env)?;
        if amount <= 0 {
            return Err(GovernanceError::ZeroAmount);
        }
        if to == config::null_address(&env) || to == env.current_contract_address() {
            return Err(GovernanceError::InvalidRecipient);
        }
        dispatch::transfer(&env, &token, &to, amount)?;
        TokenTransferred { token, to, amount }.publish(&env);
        Ok(())
    }

    pub fn get_proposal(env: Env, id: u64) -> Result<Proposal, GovernanceError> {
        Self::require_initialized(&env)?;
        proposals::load(&env, id)
    }

    pub fn get_confirmation_count(env: Env, id: u64) -> Result<u32, GovernanceError> {
        Self::require_initialized(&env)?;
        proposals::load(&env, id)?;
        Ok(proposals::confirmation_count(&env, id))
    }

    /// Current signers that have confirmed `id`.
    pub fn get_confirmations(env: Env, id: u64) -> Result<Vec<Address>, GovernanceError> {
        Self::require_initialized(&env)?;
        proposals::load(&env, id)?;
        Ok(proposals::confirmers(&env, id))
    }

    pub fn has_confirmed(env: Env, id: u64, signer: Address) -> bool {
        proposals::has_confirmed(&env, id, &signer)
    }

    pub fn is_expired(env: Env, id: u64) -> Result<bool, GovernanceError> {
        Self::require_initialized(&env)?;
        let config = config::load(&env)?;
        let proposal = proposals::load(&env, id)?;
        Ok(proposals::is_expired(&env, &proposal, &config))
    }

    pub fn list_pending_paginated(
        env: Env,
        page: u32,
        page_size: u32,
    ) -> Result<PendingPage, GovernanceError> {
        Self::require_initialized(&env)?;
        pagination::pending_page(&env, page, page_size)
    }

    pub fn list_signers_paginated(
        env: Env,
        page: u32,
        page_size: u32,
    ) -> Result<SignerPage, GovernanceError> {
        Self::require_initialized(&env)?;
        pagination::signer_page(&env, page, page_size)
    }

    pub fn get_emergency_approval_count(env: Env) -> u32 {
        emergency::approvals(&env).len()
    }

    pub fn has_emergency_approval(env: Env, signer: Address) -> bool {
        emergency::has_approval(&env, &signer)
    }

    pub fn get_emergency_request(env: Env) -> Option<EmergencyRequest> {
        emergency::request(&env)
    }

    pub fn get_threshold(env: Env) -> Result<u32, GovernanceError> {
        signers::threshold(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        config::flag(&env, &DataKey::Paused)
    }

    pub fn get_proposal_count(env: Env) -> u64 {
        proposals::count(&env)
    }

    pub fn get_pending_count(env: Env) -> u32 {
        pending::count(&env)
    }

    pub fn get_config(env: Env) -> Result<Config, GovernanceError> {
        config::load(&env)
    }

    pub fn get_asset(env: Env) -> Result<Address, GovernanceError> {
        config::asset(&env)
    }

    /// The engine's balance of the pooled asset.
    pub fn get_balance(env: Env) -> Result<i128, GovernanceError> {
        let asset = config::asset(&env)?;
        dispatch::balance(&env, &asset)
    }

    pub fn is_auto_execute_enabled(env: Env) -> bool {
        config::flag(&env, &DataKey::AutoExecute)
    }

    pub fn is_function_restricted(env: Env) -> bool {
        config::flag(&env, &DataKey::RestrictCalls)
    }

    pub fn is_function_allowed(env: Env, target: Address, selector: Symbol) -> bool {
        proposals::is_function_allowed(&env, &target, &selector)
    }

    pub fn get_signers(env: Env) -> Vec<Address> {
        signers::all(&env)
    }

    pub fn get_signer_count(env: Env) -> u32 {
        signers::count(&env)
    }

    pub fn is_signer(env: Env, address: Address) -> bool {
        signers::is_signer(&env, &address)
    }

    fn require_initialized(env: &Env) -> Result<(), GovernanceError> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(GovernanceError::NotInitialized);
        }
        Ok(())
    }

    /// Gate for every externally reachable mutating entry point.
    fn require_callable(env: &Env) -> Result<(), GovernanceError> {
        Self::require_initialized(env)?;
        reentrancy::ensure_free(env)?;
        config::bump_instance(env);
        Ok(())
    }

    fn require_governance(env: &Env) -> Result<(), GovernanceError> {
        Self::require_initialized(env)?;
        if !dispatch::in_governance_context(env) {
            return Err(GovernanceError::MustUseGovernance);
        }
        Ok(())
    }
}
