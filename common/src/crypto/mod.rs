mod account;
mod hash;
mod keypair;

pub mod error;

pub use account::*;
pub use error::CryptoError;
pub use hash::*;
pub use keypair::*;
