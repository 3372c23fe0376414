#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Engine configuration from defaults and the environment.
pub mod config;

/// Exponential ElGamal ciphertexts and ciphertext rows.
///
/// Rows are re-encrypted by the shuffle and combined column-wise by the
/// proof of shuffle.
pub mod elgamal;

/// The crate error type.
pub mod errors;

/// Prime-order subgroups of `Z_p^*`: parameters, scalars, elements and keys.
///
/// All supported groups share the 256-bit order `q = 2^256 - 189`.
pub mod group;

/// Generic cryptographic key management traits.
///
/// Defines common interfaces for public and secret key operations that
/// are implemented by specific cryptographic schemes.
pub mod keys;

/// Pedersen-style commitments for the proof of shuffle.
pub mod pedersen;

/// Batched exponentiation `Π b_i^{e_i} mod p` and the worker pool that
/// drives it.
pub mod prodpow;

/// Verifiable re-encryption shuffle.
///
/// Permutes and re-encrypts a set of ciphertext rows and proves, with the
/// batched Terelius-Wikström argument, that the output is a shuffle of the
/// input.
pub mod shuffle;

/// Fiat-Shamir challenges over a `merlin` transcript.
pub mod transcript;

// Re-export commonly used types for convenience
pub use config::MixnetConfig;
pub use elgamal::{Ciphertext, VectorCiphertext};
pub use errors::MixnetError;
pub use group::{ElGamalKeypair, ElGamalPublicKey, ElGamalSecretKey, ElementModP, ElementModQ, GroupContext};
pub use prodpow::{Engine, ProdPow, ProdPowAlg, WorkerPool};
pub use shuffle::{shuffle_and_prove, verify_shuffle, Permutation, ProofOfShuffle, Shuffle, ShuffleProver, ShuffleVerifier};
