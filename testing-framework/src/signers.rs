// File: testing-framework/src/signers.rs
//
// Well known development signers, endowed by the local node at genesis.

use showgame_common::{config::DEV_SEEDS, crypto::KeyPair};

/// Alice, Bob, Charlie, Dave, Eve and Ferdie, in that order
pub fn get_signers() -> Vec<KeyPair> {
    DEV_SEEDS.iter().map(|seed| KeyPair::from_seed(seed)).collect()
}

/// A dev signer by name, case insensitive
pub fn get_signer(name: &str) -> Option<KeyPair> {
    DEV_SEEDS
        .iter()
        .find(|seed| seed.trim_start_matches("//").eq_ignore_ascii_case(name))
        .map(|seed| KeyPair::from_seed(seed))
}
