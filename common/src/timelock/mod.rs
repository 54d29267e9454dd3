// Timelock controller types shared by the contract and its clients.
//
// Storage layout used by the contract:
// - Operation timestamp: tl:ts:<operation id>
// - Minimum delay:       tl:min_delay

mod error;
mod events;
mod operation;
mod state;

pub use error::TimelockControllerError;
pub use events::{CallExecuted, CallScheduled, Cancelled, MinDelayChange};
pub use operation::*;
pub use state::OperationState;

/// Timestamp stored for an operation once it has been executed
pub const DONE_TIMESTAMP: u64 = 1;

pub mod prefixes {
    pub const TIMESTAMPS: &[u8] = b"tl:ts:";
    pub const MIN_DELAY: &[u8] = b"tl:min_delay";
}
