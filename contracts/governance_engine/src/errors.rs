use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum GovernanceError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidConfig = 3,
    EmptySignersList = 4,

    // Authorization
    NotSigner = 10,
    MustUseGovernance = 11,
    UnauthorizedRole = 12,

    // State
    DoesNotExist = 20,
    AlreadyFinalized = 21,
    AlreadyConfirmed = 22,
    NotConfirmed = 23,
    NotPaused = 24,
    AlreadyPaused = 25,
    Paused = 26,
    AlreadyApproved = 27,
    ReentrantCall = 28,
    RequestMismatch = 29,
    NotEnoughConfirmations = 30,

    // Temporal
    TimelockNotElapsed = 40,
    NotExpired = 41,
    ProposalExpired = 42,

    // Validation
    InvalidTarget = 50,
    InvalidRecipient = 51,
    ZeroAmount = 52,
    ExceedsLimit = 53,
    BatchTooLarge = 54,
    InvalidPageSize = 55,
    PageOutOfBounds = 56,
    InvalidThreshold = 57,
    ThresholdExceedsSigners = 58,
    DuplicateSigner = 59,
    SignerNotFound = 60,
    TooManySigners = 61,
    InvalidSigner = 62,
    InvalidValue = 63,
    InvalidPayload = 64,
    FunctionNotAllowed = 65,

    // External call
    CallFailed = 70,
}
