#![no_std]

mod batch;
mod config;
mod dispatch;
mod emergency;
mod engine;
mod errors;
mod events;
mod pagination;
mod pending;
mod proposals;
mod reentrancy;
mod signers;
mod types;

pub use config::{
    default_config, BPS_DENOMINATOR, CANCEL_COST, CONFIRM_COST, MAX_BATCH_SIZE, MAX_PAGE_SIZE,
    MAX_SIGNERS, SKIP_COST,
};
pub use engine::{GovernanceEngine, GovernanceEngineClient};
pub use errors::GovernanceError;
pub use types::{
    BatchResult, Call, Config, EmergencyRequest, PageInfo, Payload, PendingPage, Proposal,
    SignerPage,
};

mod test_batch;
mod test_emergency;
mod test_events;
