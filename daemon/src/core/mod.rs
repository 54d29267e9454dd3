pub mod block;
pub mod blockchain;
pub mod cache;
pub mod error;
pub mod executor;
pub mod gas;
pub mod registry;
pub mod state;

pub use block::{Block, DispatchOutcome, Extrinsic, ExtrinsicCall, ExtrinsicReceipt};
pub use blockchain::Blockchain;
pub use error::{BlockchainError, DispatchError};
pub use executor::{contract_address, BlockContext, ExecOutput};
pub use registry::CodeRegistry;
pub use state::{ChainState, ContractInfo};
