//! Exponential ElGamal ciphertexts and fixed-width ciphertext rows.

/// Single ciphertexts.
pub mod elgamal;
/// Rows of ciphertexts.
pub mod vector;

pub use self::{
    elgamal::Ciphertext,
    vector::{row_width, VectorCiphertext},
};
