/// Default initialize/reinitialize timeout (seconds)
pub const DEFAULT_INITIALIZE_TIMEOUT_SECS: u64 = 60;
/// Default timeout for processing one message (seconds)
pub const DEFAULT_PROCESS_TIMEOUT_SECS: u64 = 30;
/// Default abort timeout (seconds)
pub const DEFAULT_ABORT_TIMEOUT_SECS: u64 = 10;
/// Default cleanup timeout (seconds)
pub const DEFAULT_CLEANUP_TIMEOUT_SECS: u64 = 10;
/// Default host timeout (seconds) - how long a child may stay silent before it is considered lost
pub const DEFAULT_HOST_TIMEOUT_SECS: u64 = 300;
/// Default number of attempts for every lifecycle phase
pub const DEFAULT_PHASE_ATTEMPTS: u32 = 3;
