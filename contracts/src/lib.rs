// Native implementations of the showgame contracts.
//
// Contracts are stateless codes driven through the `Environment` host
// trait; a node hosts them by implementing that trait per call frame.

pub mod access_control;
pub mod code;
pub mod env;
pub mod error;
pub mod psp34;
pub mod storage;
pub mod timelock_controller;

#[cfg(test)]
mod mock;

use std::sync::Arc;

pub use code::ContractCode;
pub use env::{CallParams, EnvExt, Environment};
pub use error::{EnvError, ExecError, MessageError, MessageResult};
pub use psp34::{MyPsp34, MyPsp34Hooked};
pub use timelock_controller::MyTimelockController;

/// Every contract code shipped with this crate
pub fn all_codes() -> Vec<Arc<dyn ContractCode>> {
    vec![
        Arc::new(MyPsp34),
        Arc::new(MyPsp34Hooked),
        Arc::new(MyTimelockController),
    ]
}
