pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Native balances are u128 with 12 decimals
pub type Balance = u128;
pub const COIN_DECIMALS: u8 = 12;
pub const COIN_VALUE: Balance = 10u128.pow(COIN_DECIMALS as u32);

// Every dev account is endowed with this amount at genesis
pub const DEV_ENDOWMENT: Balance = 1_000_000 * COIN_VALUE;

// Seeds of the well known development accounts, in signer order
pub const DEV_SEEDS: [&str; 6] = ["//Alice", "//Bob", "//Charlie", "//Dave", "//Eve", "//Ferdie"];

// Gas limit used by clients when the caller does not provide one
pub const DEFAULT_GAS_LIMIT: u64 = 50_000_000;

// Nested contract calls deeper than this fail with CallDepthExceeded
pub const MAX_CALL_DEPTH: usize = 32;

// Max size of a single storage value and of call input
pub const MAX_STORAGE_VALUE_SIZE: usize = 16 * 1024;
pub const MAX_CALL_INPUT_SIZE: usize = 16 * 1024;

// Gas schedule
pub const GAS_BASE_CALL: u64 = 10_000;
pub const GAS_BASE_INSTANTIATE: u64 = 50_000;
pub const GAS_STORAGE_READ: u64 = 2_000;
pub const GAS_STORAGE_WRITE: u64 = 5_000;
pub const GAS_PER_BYTE: u64 = 10;
pub const GAS_EVENT: u64 = 1_000;

// Blocks are sealed instantly, this is the minimum timestamp step between
// two consecutive blocks when the clock did not move
pub const DEFAULT_BLOCK_TIME_MILLIS: u64 = 1;
