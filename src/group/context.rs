//! Domain parameters and modular arithmetic over the order-q subgroup.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;

use crate::errors::MixnetError;
use crate::group::constants::{
    PRODUCTION_G_BYTES, PRODUCTION_P_BYTES, PRODUCTION_R_BYTES, TEST_G_BYTES, TEST_P_BYTES,
    TEST_R_BYTES,
};
use crate::group::element::{ElementModP, ElementModQ, Q};

static PRODUCTION: Lazy<GroupContext> = Lazy::new(|| {
    GroupContext::from_trusted(
        "production-2048",
        &PRODUCTION_P_BYTES,
        &PRODUCTION_R_BYTES,
        &PRODUCTION_G_BYTES,
    )
});

static TEST_GROUP: Lazy<GroupContext> = Lazy::new(|| {
    GroupContext::from_trusted("test-512", &TEST_P_BYTES, &TEST_R_BYTES, &TEST_G_BYTES)
});

/// A prime-order subgroup of (Z/pZ)* with `p = q * r + 1`.
///
/// The context is immutable and shared read-only by every worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupContext {
    name: String,
    p: BigUint,
    r: BigUint,
    g: ElementModP,
    p_bytes: usize,
}

impl GroupContext {
    /// The 2048-bit group used for real elections.
    pub fn production() -> &'static GroupContext {
        &PRODUCTION
    }

    /// A 512-bit group with the same q. Only suitable for tests and demos.
    pub fn test_group() -> &'static GroupContext {
        &TEST_GROUP
    }

    /// Builds a group from custom parameters.
    ///
    /// Checks that `p = q * r + 1` and that `g` generates the order-q
    /// subgroup. Primality of `p` is the caller's responsibility.
    pub fn new(name: &str, p: BigUint, r: BigUint, g: BigUint) -> Result<Self, MixnetError> {
        if p != &*Q * &r + BigUint::one() {
            return Err(MixnetError::InvalidGroup("p is not q * r + 1"));
        }
        if g <= BigUint::one() || g >= p {
            return Err(MixnetError::InvalidGroup("generator out of range"));
        }
        if !g.modpow(&Q, &p).is_one() {
            return Err(MixnetError::InvalidGroup("generator order is not q"));
        }
        let p_bytes = ((p.bits() + 7) / 8) as usize;
        Ok(GroupContext {
            name: name.to_string(),
            p,
            r,
            g: ElementModP(g, p_bytes),
            p_bytes,
        })
    }

    // Built-in parameters are checked by the tests below.
    fn from_trusted(name: &str, p: &[u8], r: &[u8], g: &[u8]) -> Self {
        let p = BigUint::from_bytes_be(p);
        let p_bytes = ((p.bits() + 7) / 8) as usize;
        GroupContext {
            name: name.to_string(),
            p,
            r: BigUint::from_bytes_be(r),
            g: ElementModP(BigUint::from_bytes_be(g), p_bytes),
            p_bytes,
        }
    }

    /// Human-readable parameter set name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The modulus p.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// The subgroup order q.
    pub fn q(&self) -> &BigUint {
        &Q
    }

    /// The cofactor r.
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// The subgroup generator g.
    pub fn g(&self) -> &ElementModP {
        &self.g
    }

    /// Byte length of a fixed-width element encoding.
    pub fn p_bytes(&self) -> usize {
        self.p_bytes
    }

    /// The identity element.
    pub fn one(&self) -> ElementModP {
        self.element(BigUint::one())
    }

    /// `a * b mod p`
    pub fn mul_p(&self, a: &ElementModP, b: &ElementModP) -> ElementModP {
        self.element((&a.0 * &b.0) % &self.p)
    }

    /// `a^-1 mod p`, via Fermat's little theorem.
    pub fn inv_p(&self, a: &ElementModP) -> ElementModP {
        let exp = &self.p - BigUint::from(2u32);
        self.element(a.0.modpow(&exp, &self.p))
    }

    /// `a / b mod p`
    pub fn div_p(&self, a: &ElementModP, b: &ElementModP) -> ElementModP {
        self.mul_p(a, &self.inv_p(b))
    }

    /// `base^exp mod p`
    pub fn pow_p(&self, base: &ElementModP, exp: &ElementModQ) -> ElementModP {
        self.element(base.0.modpow(&exp.0, &self.p))
    }

    /// `g^exp mod p`
    pub fn g_pow_p(&self, exp: &ElementModQ) -> ElementModP {
        self.pow_p(&self.g, exp)
    }

    /// Product of all elements of `iter`; the identity when empty.
    pub fn prod_p<'a, I>(&self, iter: I) -> ElementModP
    where
        I: IntoIterator<Item = &'a ElementModP>,
    {
        iter.into_iter()
            .fold(self.one(), |acc, x| self.mul_p(&acc, x))
    }

    /// Wraps a residue without checking it.
    pub(crate) fn element(&self, value: BigUint) -> ElementModP {
        ElementModP(value, self.p_bytes)
    }

    /// True iff `0 < x < p` and `x^q = 1 mod p`.
    pub fn is_valid_residue(&self, x: &ElementModP) -> bool {
        !x.0.is_zero() && x.0 < self.p && x.0.modpow(&Q, &self.p).is_one()
    }

    /// Wraps `value` as a subgroup element, rejecting non-members.
    pub fn element_mod_p(&self, value: BigUint) -> Result<ElementModP, MixnetError> {
        let x = self.element(value);
        if self.is_valid_residue(&x) {
            Ok(x)
        } else {
            Err(MixnetError::NotInSubgroup)
        }
    }

    /// Fails unless `x` is a subgroup element encoded at this group's width.
    pub fn check_element(&self, x: &ElementModP) -> Result<(), MixnetError> {
        if x.width() != self.p_bytes {
            return Err(MixnetError::InvalidEncoding {
                expected: self.p_bytes,
                actual: x.width(),
            });
        }
        if self.is_valid_residue(x) {
            Ok(())
        } else {
            Err(MixnetError::NotInSubgroup)
        }
    }

    /// Big-endian encoding left-padded to the byte length of p.
    pub fn element_to_bytes(&self, x: &ElementModP) -> Vec<u8> {
        let raw = x.value().to_bytes_be();
        let mut out = vec![0u8; self.p_bytes.saturating_sub(raw.len())];
        out.extend_from_slice(&raw);
        out
    }

    /// Decodes a fixed-width element and checks subgroup membership.
    pub fn element_from_bytes(&self, bytes: &[u8]) -> Result<ElementModP, MixnetError> {
        if bytes.len() != self.p_bytes {
            return Err(MixnetError::InvalidEncoding {
                expected: self.p_bytes,
                actual: bytes.len(),
            });
        }
        self.element_mod_p(BigUint::from_bytes_be(bytes))
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::OsRng;

    fn check_params(group: &GroupContext) {
        let rebuilt = GroupContext::new(
            group.name(),
            group.p().clone(),
            group.r().clone(),
            group.g().value().clone(),
        )
        .unwrap();
        assert_eq!(&rebuilt, group);
    }

    #[test]
    fn builtin_groups_are_consistent_test() {
        check_params(GroupContext::test_group());
        check_params(GroupContext::production());
        assert_eq!(GroupContext::test_group().p_bytes(), 64);
        assert_eq!(GroupContext::production().p_bytes(), 256);
    }

    #[test]
    fn new_rejects_bad_parameters_test() {
        let group = GroupContext::test_group();
        let bad_p = group.p() + BigUint::one();
        assert!(GroupContext::new("x", bad_p, group.r().clone(), group.g().value().clone()).is_err());
        assert!(GroupContext::new("x", group.p().clone(), group.r().clone(), BigUint::one()).is_err());
        // 2 is not in the order-q subgroup of the test group
        let two = BigUint::from(2u32);
        assert_eq!(
            GroupContext::new("x", group.p().clone(), group.r().clone(), two),
            Err(MixnetError::InvalidGroup("generator order is not q"))
        );
    }

    #[test]
    fn arithmetic_test() {
        let group = GroupContext::test_group();
        let a = ElementModQ::random(&mut OsRng);
        let b = ElementModQ::random(&mut OsRng);
        let ga = group.g_pow_p(&a);
        let gb = group.g_pow_p(&b);
        assert_eq!(group.mul_p(&ga, &gb), group.g_pow_p(&(&a + &b)));
        assert_eq!(group.div_p(&ga, &gb), group.g_pow_p(&(&a - &b)));
        assert_eq!(group.mul_p(&ga, &group.inv_p(&ga)), group.one());
        assert_eq!(group.pow_p(&ga, &b), group.g_pow_p(&(&a * &b)));
        assert_eq!(group.prod_p(vec![&ga, &gb]), group.mul_p(&ga, &gb));
        assert_eq!(group.prod_p(Vec::<&ElementModP>::new()), group.one());
        assert_eq!(group.g_pow_p(&-&a), group.inv_p(&ga));
    }

    #[test]
    fn membership_test() {
        let group = GroupContext::test_group();
        assert!(group.is_valid_residue(group.g()));
        assert!(group.is_valid_residue(&group.one()));
        assert!(!group.is_valid_residue(&group.element(BigUint::zero())));
        assert!(!group.is_valid_residue(&group.element(group.p().clone())));
        // p - 1 has order 2
        let minus_one = group.p() - BigUint::one();
        assert_eq!(group.element_mod_p(minus_one), Err(MixnetError::NotInSubgroup));
    }

    #[test]
    fn element_bytes_test() {
        let group = GroupContext::test_group();
        let x = group.g_pow_p(&ElementModQ::random(&mut OsRng));
        let bytes = group.element_to_bytes(&x);
        assert_eq!(bytes.len(), group.p_bytes());
        assert_eq!(group.element_from_bytes(&bytes).unwrap(), x);

        let one = group.element_to_bytes(&group.one());
        assert_eq!(one.len(), 64);
        assert_eq!(one[63], 1);
        assert!(group.element_from_bytes(&one[1..]).is_err());
    }
}
