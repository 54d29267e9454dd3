mod abi;
mod event;
mod result;
mod selector;

pub use abi::*;
pub use event::*;
pub use result::ExecReturnValue;
pub use selector::*;
