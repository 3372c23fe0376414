//! Pedersen-style commitments used by the proof of shuffle: derived
//! generators, the permutation commitment and the commitment chain.

/// Commitment chains over permuted challenges.
pub mod chain;
/// Generator derivation.
pub mod generators;
/// Permutation commitments.
pub mod permutation;

pub use self::{
    chain::{chain_recursive, running_exponents, CommitmentChain},
    generators::{derive_generator, MixGenerators},
    permutation::PermutationCommitment,
};
