use soroban_sdk::{contracttype, Address, String, Symbol, Val, Vec};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Signers,
    Membership(Address),
    MembershipSeq,
    Threshold,
    Config,
    Asset,
    Paused,
    AutoExecute,
    RestrictCalls,
    ProposalCount,
    Proposal(u64),
    Confirmation(u64, Address),
    PendingCount,
    PendingBucket(u32),
    PendingSlot(u64),
    FunctionAllowed(Address, Symbol),
    EmergencyApprovals,
    EmergencyRequest,
    ReentrancyLock,
    GovernanceContext,
}

/// Timing, emergency cap and batch budget. Fixed at initialization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Seconds after submission before a proposal may execute.
    pub execution_delay: u64,
    /// Seconds after submission before an unexecuted proposal may be cancelled.
    pub expiry_window: u64,
    /// Emergency withdrawal cap in basis points of the current balance.
    pub emergency_fraction_bps: u32,
    /// Cost units a single batch call may spend.
    pub batch_budget: u32,
}

/// A contract function to invoke on the proposal target.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Call {
    pub function: Symbol,
    pub args: Vec<Val>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Payload {
    /// Plain value transfer to the target.
    None,
    Call(Call),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proposal {
    pub id: u64,
    pub proposer: Address,
    pub target: Address,
    pub value: i128,
    pub payload: Payload,
    pub description: String,
    pub submitted_at: u64,
    pub executed: bool,
    pub cancelled: bool,
}

impl Proposal {
    pub fn is_finalized(&self) -> bool {
        self.executed || self.cancelled
    }

    pub fn selector(&self) -> Option<Symbol> {
        match &self.payload {
            Payload::None => None,
            Payload::Call(call) => Some(call.function.clone()),
        }
    }
}

/// The withdrawal the current emergency round is approving.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyRequest {
    pub token: Address,
    pub recipient: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageInfo {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u32,
    pub total_pages: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingPage {
    pub ids: Vec<u64>,
    pub info: PageInfo,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignerPage {
    pub signers: Vec<Address>,
    pub info: PageInfo,
}

/// Outcome of a batch call. `examined` ids were inspected; resubmit the rest.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchResult {
    pub processed: u32,
    pub examined: u32,
}
