// Shared types for the showgame contract workspace: binary codec, hashing
// and keys, contract metadata, and the PSP34 / timelock / access control
// types that cross the client <-> contract boundary.

pub mod access_control;
pub mod config;
pub mod contract;
pub mod crypto;
pub mod logger;
pub mod psp34;
pub mod serializer;
pub mod time;
pub mod timelock;
