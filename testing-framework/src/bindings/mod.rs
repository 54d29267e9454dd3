// File: testing-framework/src/bindings/mod.rs
//
// Typed bindings
//
// One module per contract, in the shape a metadata driven generator emits:
// a `Constructors*` factory that deploys, and a `Contract*` handle with
// `query()` and `tx()` views whose methods mirror the contract messages.

pub mod my_psp34;
pub mod my_timelock_controller;

pub use my_psp34::{ConstructorsMyPsp34, ContractMyPsp34};
pub use my_timelock_controller::{ConstructorsMyTimelockController, ContractMyTimelockController};
