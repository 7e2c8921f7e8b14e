//! Bounded batch operations over caller-supplied proposal ids.
//!
//! Ineligible ids are skipped. Each id costs budget units whether or not it
//! was processed; the loop stops before an id whose full cost no longer fits.

use soroban_sdk::{log, symbol_short, Address, Env, Symbol, Vec};

use crate::config::{self, CANCEL_COST, CONFIRM_COST, MAX_BATCH_SIZE, SKIP_COST};
use crate::errors::GovernanceError;
use crate::events::BatchProcessed;
use crate::proposals;
use crate::signers;
use crate::types::{BatchResult, Config};

pub fn confirm(env: &Env, signer: &Address, ids: &Vec<u64>) -> Result<BatchResult, GovernanceError> {
    run(env, signer, ids, CONFIRM_COST, symbol_short!("confirm"), |config, id| {
        proposals::confirm(env, signer, id, config).map(|_| ())
    })
}

pub fn cancel_expired(
    env: &Env,
    caller: &Address,
    ids: &Vec<u64>,
) -> Result<BatchResult, GovernanceError> {
    run(env, caller, ids, CANCEL_COST, symbol_short!("cancel"), |config, id| {
        proposals::cancel_expired(env, caller, id, config)
    })
}

fn run<F>(
    env: &Env,
    caller: &Address,
    ids: &Vec<u64>,
    cost: u32,
    operation: Symbol,
    mut apply: F,
) -> Result<BatchResult, GovernanceError>
where
    F: FnMut(&Config, u64) -> Result<(), GovernanceError>,
{
    signers::require_signer(env, caller)?;
    if ids.len() > MAX_BATCH_SIZE {
        return Err(GovernanceError::BatchTooLarge);
    }

    let config = config::load(env)?;
    let mut spent = 0u32;
    let mut result = BatchResult {
        processed: 0,
        examined: 0,
    };

    for id in ids.iter() {
        if spent + cost > config.batch_budget {
            break;
        }
        result.examined += 1;
        match apply(&config, id) {
            Ok(()) => {
                result.processed += 1;
                spent += cost;
            }
            Err(_) => spent += SKIP_COST,
        }
    }

    log!(env, "batch processed", result.processed, result.examined);
    BatchProcessed {
        operation,
        processed: result.processed,
        examined: result.examined,
    }
    .publish(env);
    Ok(result)
}
