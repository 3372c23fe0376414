//! Deterministic derivation of independent generators.
//!
//! Generator `i` of a mix is SHAKE256 over
//!
//! ```text
//! "mixnet-shuffle/generators/v1"
//!   || u64be(len(mix_name)) || mix_name
//!   || u64be(len(seed))     || seed
//!   || u64be(len(p))        || p
//!   || u64be(i) || u32be(attempt)
//! ```
//!
//! squeezed to `|p| + 16` bytes, reduced mod p and raised to the cofactor r.
//! Attempts that land on 0 or 1 are retried with the next attempt counter.
//! Index 0 is `h0`; indices `1..=n` are the permutation generators.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

use crate::{
    errors::MixnetError,
    group::{ElementModP, GroupContext},
    prodpow::Engine,
    shuffle::vectorutil::VectorP,
};

const GENERATOR_TAG: &[u8] = b"mixnet-shuffle/generators/v1";

// Extra squeezed bytes so the reduction mod p is close to uniform.
const EXTRA_BYTES: usize = 16;

/// The generators of one mix: `h0` and `h_1..h_n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MixGenerators {
    /// Base of the commitment chain.
    pub h0: ElementModP,
    /// One generator per row.
    pub generators: VectorP,
}

impl MixGenerators {
    /// Derives `n + 1` generators for `mix_name`. Anyone holding the same
    /// inputs derives the same generators.
    pub fn derive(
        engine: &Engine,
        group: &GroupContext,
        mix_name: &str,
        seed: Option<&[u8]>,
        n: usize,
    ) -> Result<Self, MixnetError> {
        let mut all = engine
            .pool()
            .run_indexed(n + 1, |i| Ok(derive_generator(group, mix_name, seed, i as u64)))?;
        let generators = all.split_off(1);
        let h0 = all
            .pop()
            .ok_or(MixnetError::EmptyInput("generator derivation"))?;
        Ok(MixGenerators {
            h0,
            generators: VectorP::new(generators),
        })
    }

    /// Number of permutation generators.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// True when there are no permutation generators.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

/// Generator number `index` for `mix_name`.
pub fn derive_generator(
    group: &GroupContext,
    mix_name: &str,
    seed: Option<&[u8]>,
    index: u64,
) -> ElementModP {
    let p_bytes = group.p().to_bytes_be();
    let seed = seed.unwrap_or(&[]);
    let mut attempt: u32 = 0;
    loop {
        let mut hasher = Shake256::default();
        hasher.update(GENERATOR_TAG);
        append_sized(&mut hasher, mix_name.as_bytes());
        append_sized(&mut hasher, seed);
        append_sized(&mut hasher, &p_bytes);
        hasher.update(index.to_be_bytes());
        hasher.update(attempt.to_be_bytes());

        let mut out = vec![0u8; group.p_bytes() + EXTRA_BYTES];
        hasher.finalize_xof().read(&mut out);
        let x = BigUint::from_bytes_be(&out) % group.p();
        let h = x.modpow(group.r(), group.p());
        if !h.is_zero() && !h.is_one() {
            return group.element(h);
        }
        attempt += 1;
    }
}

fn append_sized(hasher: &mut Shake256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::prodpow::{ProdPowAlg, WorkerPool};

    #[test]
    fn generators_are_subgroup_members_test() {
        let group = GroupContext::test_group();
        let engine = Engine::single_threaded(ProdPowAlg::Windowed);
        let gens = MixGenerators::derive(&engine, group, "mix1", None, 10).unwrap();
        assert_eq!(gens.len(), 10);
        assert!(group.is_valid_residue(&gens.h0));
        assert!(gens.generators.validate(group).is_ok());
        assert!(!gens.generators.iter().any(|h| *h == gens.h0 || h == group.g()));
    }

    #[test]
    fn derivation_is_deterministic_test() {
        let group = GroupContext::test_group();
        let single = Engine::single_threaded(ProdPowAlg::Windowed);
        let parallel = Engine::with_prodpow(WorkerPool::new(3).unwrap(), ProdPowAlg::Windowed.build());
        let a = MixGenerators::derive(&single, group, "mix1", Some(&b"seed"[..]), 25).unwrap();
        let b = MixGenerators::derive(&parallel, group, "mix1", Some(&b"seed"[..]), 25).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.h0, derive_generator(group, "mix1", Some(&b"seed"[..]), 0));
        assert_eq!(a.generators[4], derive_generator(group, "mix1", Some(&b"seed"[..]), 5));
    }

    #[test]
    fn derivation_is_domain_separated_test() {
        let group = GroupContext::test_group();
        let base = derive_generator(group, "mix1", None, 1);
        assert_ne!(base, derive_generator(group, "mix2", None, 1));
        assert_ne!(base, derive_generator(group, "mix1", Some(&b"s"[..]), 1));
        assert_ne!(base, derive_generator(group, "mix1", None, 2));
        // the length prefix keeps ("mix1", "s") apart from ("mix1s", "")
        assert_ne!(
            derive_generator(group, "mix1", Some(&b"s"[..]), 1),
            derive_generator(group, "mix1s", None, 1)
        );
    }

    #[test]
    fn prefix_is_stable_test() {
        let group = GroupContext::test_group();
        let engine = Engine::single_threaded(ProdPowAlg::Windowed);
        let short = MixGenerators::derive(&engine, group, "mix", None, 3).unwrap();
        let long = MixGenerators::derive(&engine, group, "mix", None, 8).unwrap();
        assert_eq!(short.h0, long.h0);
        assert_eq!(short.generators.as_slice(), &long.generators.as_slice()[..3]);
    }
}
