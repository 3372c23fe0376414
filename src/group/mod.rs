//! Prime-order subgroups of (Z/pZ)* and the scalar field Z_q.

/// Built-in domain parameters.
pub mod constants;
/// Group parameters and element arithmetic.
pub mod context;
/// Scalars and group elements.
pub mod element;
/// ElGamal key types.
pub mod keys;

pub use self::{
    context::GroupContext,
    element::{ElementModP, ElementModQ, SCALAR_BYTES},
    keys::{ElGamalKeypair, ElGamalPublicKey, ElGamalSecretKey},
};
