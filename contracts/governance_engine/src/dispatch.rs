//! The engine's single "invoke" capability.
//!
//! A proposal moves `value` units of the asset to its target and then, for a
//! `Payload::Call`, invokes the named function there. When the target is the
//! engine itself the call is routed to the engine's own governance entry
//! points inside a governance context, so self-configuration goes through the
//! same public functions any outside caller sees.

use soroban_sdk::{token, Address, Env, Symbol, TryFromVal, Val, Vec};

use crate::config;
use crate::engine::GovernanceEngine;
use crate::errors::GovernanceError;
use crate::types::{Call, DataKey, Payload, Proposal};

pub fn invoke(env: &Env, proposal: &Proposal) -> Result<(), GovernanceError> {
    if proposal.value > 0 {
        let asset = config::asset(env)?;
        transfer(env, &asset, &proposal.target, proposal.value)?;
    }

    match &proposal.payload {
        Payload::None => Ok(()),
        Payload::Call(call) if proposal.target == env.current_contract_address() => {
            govern(env, call)
        }
        Payload::Call(call) => {
            let result = env.try_invoke_contract::<Val, soroban_sdk::Error>(
                &proposal.target,
                &call.function,
                call.args.clone(),
            );
            match result {
                Ok(Ok(_)) => Ok(()),
                _ => Err(GovernanceError::CallFailed),
            }
        }
    }
}

/// Moves `amount` of `token` out of the engine.
pub fn transfer(
    env: &Env,
    token: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), GovernanceError> {
    let client = token::TokenClient::new(env, token);
    match client.try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(GovernanceError::CallFailed),
    }
}

pub fn balance(env: &Env, token: &Address) -> Result<i128, GovernanceError> {
    let client = token::TokenClient::new(env, token);
    match client.try_balance(&env.current_contract_address()) {
        Ok(Ok(balance)) => Ok(balance),
        _ => Err(GovernanceError::CallFailed),
    }
}

pub fn in_governance_context(env: &Env) -> bool {
    config::flag(env, &DataKey::GovernanceContext)
}

fn govern(env: &Env, call: &Call) -> Result<(), GovernanceError> {
    config::set_flag(env, &DataKey::GovernanceContext, true);
    let result = route(env, call);
    env.storage().instance().remove(&DataKey::GovernanceContext);
    result
}

fn route(env: &Env, call: &Call) -> Result<(), GovernanceError> {
    let engine = env.clone();
    let args = &call.args;
    let function = &call.function;

    if *function == Symbol::new(env, "add_signer") {
        expect_args(args, 1)?;
        GovernanceEngine::add_signer(engine, arg(env, args, 0)?)
    } else if *function == Symbol::new(env, "add_signers_batch") {
        expect_args(args, 1)?;
        GovernanceEngine::add_signers_batch(engine, arg(env, args, 0)?)
    } else if *function == Symbol::new(env, "remove_signer") {
        expect_args(args, 1)?;
        GovernanceEngine::remove_signer(engine, arg(env, args, 0)?)
    } else if *function == Symbol::new(env, "change_threshold") {
        expect_args(args, 1)?;
        GovernanceEngine::change_threshold(engine, arg(env, args, 0)?)
    } else if *function == Symbol::new(env, "pause") {
        expect_args(args, 0)?;
        GovernanceEngine::pause(engine)
    } else if *function == Symbol::new(env, "unpause") {
        expect_args(args, 0)?;
        GovernanceEngine::unpause(engine)
    } else if *function == Symbol::new(env, "toggle_auto_execute") {
        expect_args(args, 0)?;
        GovernanceEngine::toggle_auto_execute(engine)
    } else if *function == Symbol::new(env, "toggle_function_restrictions") {
        expect_args(args, 0)?;
        GovernanceEngine::toggle_function_restrictions(engine)
    } else if *function == Symbol::new(env, "set_function_allowance") {
        expect_args(args, 3)?;
        GovernanceEngine::set_function_allowance(
            engine,
            arg(env, args, 0)?,
            arg(env, args, 1)?,
            arg(env, args, 2)?,
        )
    } else if *function == Symbol::new(env, "transfer_token") {
        expect_args(args, 3)?;
        GovernanceEngine::transfer_token(
            engine,
            arg(env, args, 0)?,
            arg(env, args, 1)?,
            arg(env, args, 2)?,
        )
    } else {
        // The engine never acts in a signer's role on itself.
        Err(GovernanceError::UnauthorizedRole)
    }
}

fn expect_args(args: &Vec<Val>, len: u32) -> Result<(), GovernanceError> {
    if args.len() != len {
        return Err(GovernanceError::InvalidPayload);
    }
    Ok(())
}

fn arg<T>(env: &Env, args: &Vec<Val>, index: u32) -> Result<T, GovernanceError>
where
    T: TryFromVal<Env, Val>,
{
    let raw = args.get(index).ok_or(GovernanceError::InvalidPayload)?;
    T::try_from_val(env, &raw).map_err(|_| GovernanceError::InvalidPayload)
}
