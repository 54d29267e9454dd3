// Showgame local node
// Instant-seal chain hosting the native contracts, served through NodeApi

#![allow(clippy::type_complexity)]
#![allow(clippy::uninlined_format_args)]

extern crate log;

pub mod config;
pub mod core;
pub mod rpc;

pub use crate::core::{
    Blockchain, BlockchainError, DispatchError, DispatchOutcome, Extrinsic, ExtrinsicCall,
    ExtrinsicReceipt,
};
pub use rpc::{LocalNode, LocalNodeBuilder, NodeApi};
