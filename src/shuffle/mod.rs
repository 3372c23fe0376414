//! Re-encryption shuffle of ciphertext rows and its proof.

/// Permutations of row indices.
pub mod permutation;
/// The proof object and its challenges.
pub mod proof;
/// Proof generation.
pub mod prover;
/// The shuffle operator.
#[allow(clippy::module_inception)]
pub mod shuffle;
/// Proof verification.
pub mod verifier;
/// Scalar and element vectors, scalar matrices.
pub mod vectorutil;

use rand::{CryptoRng, Rng};

use crate::{
    elgamal::VectorCiphertext,
    errors::MixnetError,
    group::{ElGamalPublicKey, GroupContext},
    prodpow::Engine,
};

// Re-export
pub use self::{
    permutation::Permutation,
    proof::{ProofCommitment, ProofOfShuffle, ProofReply},
    prover::{ProverState, ShuffleProver},
    shuffle::Shuffle,
    vectorutil::{MatrixQ, VectorP, VectorQ},
    verifier::ShuffleVerifier,
};

/// Shuffles `rows` and proves the shuffle under `mix_name`.
///
/// Returns the mixed rows and the proof; the permutation and nonces are
/// dropped.
pub fn shuffle_and_prove<R: Rng + CryptoRng>(
    engine: &Engine,
    group: &GroupContext,
    mix_name: &str,
    pk: &ElGamalPublicKey,
    rows: &[VectorCiphertext],
    rng: &mut R,
) -> Result<(Vec<VectorCiphertext>, ProofOfShuffle), MixnetError> {
    let shuffle = Shuffle::shuffle(engine, group, rows, pk, rng)?;
    let proof = ShuffleProver::from_shuffle(engine, group, mix_name, pk, rows, &shuffle)?.prove(rng)?;
    Ok((shuffle.mixed, proof))
}

/// Verifies that `mixed` is a shuffle of `rows` under `pk`.
pub fn verify_shuffle(
    engine: &Engine,
    group: &GroupContext,
    pk: &ElGamalPublicKey,
    rows: &[VectorCiphertext],
    mixed: &[VectorCiphertext],
    proof: &ProofOfShuffle,
) -> Result<bool, MixnetError> {
    ShuffleVerifier::new(engine, group, pk, rows, mixed)?.verify(proof)
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
