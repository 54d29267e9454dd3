// PSP34 non-fungible token types shared by the contract and its clients.
//
// Storage layout used by the contract:
// - Token owner:        psp34:own:<id>
// - Owned token count:  psp34:cnt:<account>
// - Operator approval:  psp34:opr:<owner><operator><option id>
// - Total supply:       psp34:supply
// - Next mint id:       psp34:next

mod error;
mod events;
mod id;

pub use error::Psp34Error;
pub use events::{Approval, Transfer};
pub use id::Id;

/// Storage key prefixes for PSP34 data
pub mod prefixes {
    pub const TOKEN_OWNER: &[u8] = b"psp34:own:";
    pub const OWNED_TOKENS_COUNT: &[u8] = b"psp34:cnt:";
    pub const OPERATOR_APPROVALS: &[u8] = b"psp34:opr:";
    pub const TOTAL_SUPPLY: &[u8] = b"psp34:supply";
    pub const NEXT_ID: &[u8] = b"psp34:next";
}
