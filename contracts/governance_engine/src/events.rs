use soroban_sdk::{contractevent, Address, Symbol};

#[contractevent(topics = ["governance", "initialized"])]
pub struct Initialized {
    pub signer_count: u32,
    pub threshold: u32,
    pub asset: Address,
}

#[contractevent(topics = ["governance", "submitted"])]
pub struct ProposalSubmitted {
    pub id: u64,
    pub proposer: Address,
    pub target: Address,
    pub value: i128,
}

#[contractevent(topics = ["governance", "confirmed"])]
pub struct ProposalConfirmed {
    pub id: u64,
    pub signer: Address,
    pub confirmations: u32,
}

#[contractevent(topics = ["governance", "revoked"])]
pub struct ConfirmationRevoked {
    pub id: u64,
    pub signer: Address,
    pub confirmations: u32,
}

#[contractevent(topics = ["governance", "executed"])]
pub struct ProposalExecuted {
    pub id: u64,
    pub executor: Address,
}

#[contractevent(topics = ["governance", "cancelled"])]
pub struct ProposalCancelled {
    pub id: u64,
    pub cancelled_by: Address,
}

#[contractevent(topics = ["governance", "emergency_approval"])]
pub struct EmergencyApprovalGranted {
    pub signer: Address,
    pub approvals: u32,
}

#[contractevent(topics = ["governance", "emergency_withdraw"])]
pub struct EmergencyWithdrawal {
    pub token: Address,
    pub recipient: Address,
    pub amount: i128,
}

#[contractevent(topics = ["governance", "signer_added"])]
pub struct SignerAdded {
    pub signer: Address,
    pub signer_count: u32,
}

#[contractevent(topics = ["governance", "signer_removed"])]
pub struct SignerRemoved {
    pub signer: Address,
    pub signer_count: u32,
}

#[contractevent(topics = ["governance", "threshold_changed"])]
pub struct ThresholdChanged {
    pub old_threshold: u32,
    pub new_threshold: u32,
}

#[contractevent(topics = ["governance", "paused"])]
pub struct EnginePaused {
    pub timestamp: u64,
}

#[contractevent(topics = ["governance", "unpaused"])]
pub struct EngineUnpaused {
    pub timestamp: u64,
}

#[contractevent(topics = ["governance", "auto_execute"])]
pub struct AutoExecuteToggled {
    pub enabled: bool,
}

#[contractevent(topics = ["governance", "restrictions"])]
pub struct RestrictionsToggled {
    pub enabled: bool,
}

#[contractevent(topics = ["governance", "allowance_set"])]
pub struct FunctionAllowanceSet {
    pub target: Address,
    pub selector: Symbol,
    pub allowed: bool,
}

#[contractevent(topics = ["governance", "batch"])]
pub struct BatchProcessed {
    pub operation: Symbol,
    pub processed: u32,
    pub examined: u32,
}

#[contractevent(topics = ["governance", "deposit"])]
pub struct Deposit {
    pub from: Address,
    pub amount: i128,
}

#[contractevent(topics = ["governance", "token_transfer"])]
pub struct TokenTransferred {
    pub token: Address,
    pub to: Address,
    pub amount: i128,
}
