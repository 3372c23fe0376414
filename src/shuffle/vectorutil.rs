//! Vectors and matrices of scalars and group elements.
//!
//! Every binary operation is length-checked; mismatched operands fail with
//! [`MixnetError::LengthMismatch`] rather than truncating.

use core::ops::Index;

use array2d::Array2D;
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use serde_derive::{Deserialize, Serialize};

use crate::{
    errors::{check_len, MixnetError},
    group::{ElementModP, ElementModQ, GroupContext},
    shuffle::permutation::Permutation,
};

// ------- VectorQ ------- //

/// An ordered vector of scalars.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorQ(pub(crate) Vec<ElementModQ>);

impl VectorQ {
    /// Wraps `elems`.
    pub fn new(elems: Vec<ElementModQ>) -> Self {
        VectorQ(elems)
    }

    /// `n` uniform scalars.
    pub fn random<R: RngCore + CryptoRng>(n: usize, rng: &mut R) -> Self {
        VectorQ((0..n).map(|_| ElementModQ::random(rng)).collect())
    }

    /// Small-valued scalars, mostly for tests.
    pub fn from_u64s(values: &[u64]) -> Self {
        VectorQ(values.iter().map(|v| ElementModQ::from_u64(*v)).collect())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries as a slice.
    pub fn as_slice(&self) -> &[ElementModQ] {
        &self.0
    }

    /// Iterator over the entries.
    pub fn iter(&self) -> core::slice::Iter<'_, ElementModQ> {
        self.0.iter()
    }

    /// Component-wise sum.
    pub fn add(&self, other: &VectorQ) -> Result<VectorQ, MixnetError> {
        check_len("VectorQ::add", self.len(), other.len())?;
        Ok(VectorQ(
            self.0.iter().zip(other.0.iter()).map(|(a, b)| a + b).collect(),
        ))
    }

    /// Component-wise product.
    pub fn mul(&self, other: &VectorQ) -> Result<VectorQ, MixnetError> {
        check_len("VectorQ::mul", self.len(), other.len())?;
        Ok(VectorQ(
            self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).collect(),
        ))
    }

    /// Every entry multiplied by `k`.
    pub fn scale(&self, k: &ElementModQ) -> VectorQ {
        VectorQ(self.0.iter().map(|a| a * k).collect())
    }

    /// `self * k + other`, the shape of every vector reply.
    pub fn scale_add(&self, k: &ElementModQ, other: &VectorQ) -> Result<VectorQ, MixnetError> {
        self.scale(k).add(other)
    }

    /// Every entry negated.
    pub fn neg(&self) -> VectorQ {
        VectorQ(self.0.iter().map(|a| -a).collect())
    }

    /// `Σ self_i * other_i`
    pub fn inner_product(&self, other: &VectorQ) -> Result<ElementModQ, MixnetError> {
        check_len("VectorQ::inner_product", self.len(), other.len())?;
        Ok(self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum())
    }

    /// Sum of the entries.
    pub fn sum(&self) -> ElementModQ {
        self.0.iter().sum()
    }

    /// Product of the entries.
    pub fn product(&self) -> ElementModQ {
        self.0.iter().product()
    }

    /// `out[j] = self[psi(j)]`
    pub fn permute(&self, psi: &Permutation) -> Result<VectorQ, MixnetError> {
        check_len("VectorQ::permute", psi.len(), self.len())?;
        Ok(VectorQ((0..self.len()).map(|j| self.0[psi.of(j)].clone()).collect()))
    }

    /// `out[j] = self[psi^-1(j)]`, the inverse of [`permute`](Self::permute).
    pub fn invert(&self, psi: &Permutation) -> Result<VectorQ, MixnetError> {
        check_len("VectorQ::invert", psi.len(), self.len())?;
        Ok(VectorQ((0..self.len()).map(|j| self.0[psi.inv(j)].clone()).collect()))
    }

    /// Inserts `first` at position 0 and drops the last entry.
    pub fn shift_push(&self, first: ElementModQ) -> VectorQ {
        let mut out = Vec::with_capacity(self.len());
        if !self.0.is_empty() {
            out.push(first);
            out.extend_from_slice(&self.0[..self.len() - 1]);
        }
        VectorQ(out)
    }

    /// Running product: `out[i] = Π_{k <= i} self[k]`.
    pub fn aggregate_product(&self) -> VectorQ {
        let mut acc = ElementModQ::one();
        VectorQ(
            self.0
                .iter()
                .map(|x| {
                    acc = &acc * x;
                    acc.clone()
                })
                .collect(),
        )
    }

    /// Linear recurrence over `self` as offsets and `weights` as multipliers:
    /// `out[0] = self[0]`, `out[i] = out[i-1] * weights[i] + self[i]`.
    pub fn rec_lin(&self, weights: &VectorQ) -> Result<VectorQ, MixnetError> {
        check_len("VectorQ::rec_lin", self.len(), weights.len())?;
        let mut out: Vec<ElementModQ> = Vec::with_capacity(self.len());
        for (i, (b, w)) in self.0.iter().zip(weights.0.iter()).enumerate() {
            let next = match i {
                0 => b.clone(),
                _ => &(&out[i - 1] * w) + b,
            };
            out.push(next);
        }
        Ok(VectorQ(out))
    }

    pub(crate) fn values(&self) -> Vec<&BigUint> {
        self.0.iter().map(|x| x.value()).collect()
    }
}

impl Index<usize> for VectorQ {
    type Output = ElementModQ;
    fn index(&self, i: usize) -> &ElementModQ {
        &self.0[i]
    }
}

// ------- VectorP ------- //

/// An ordered vector of group elements.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorP(pub(crate) Vec<ElementModP>);

impl VectorP {
    /// Wraps `elems`.
    pub fn new(elems: Vec<ElementModP>) -> Self {
        VectorP(elems)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries as a slice.
    pub fn as_slice(&self) -> &[ElementModP] {
        &self.0
    }

    /// Iterator over the entries.
    pub fn iter(&self) -> core::slice::Iter<'_, ElementModP> {
        self.0.iter()
    }

    /// Component-wise product.
    pub fn mul(&self, group: &GroupContext, other: &VectorP) -> Result<VectorP, MixnetError> {
        check_len("VectorP::mul", self.len(), other.len())?;
        Ok(VectorP(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(a, b)| group.mul_p(a, b))
                .collect(),
        ))
    }

    /// Component-wise power, `out[i] = self[i]^exps[i]`.
    pub fn pow(&self, group: &GroupContext, exps: &VectorQ) -> Result<VectorP, MixnetError> {
        check_len("VectorP::pow", self.len(), exps.len())?;
        Ok(VectorP(
            self.0
                .iter()
                .zip(exps.0.iter())
                .map(|(a, k)| group.pow_p(a, k))
                .collect(),
        ))
    }

    /// Product of the entries.
    pub fn prod(&self, group: &GroupContext) -> ElementModP {
        group.prod_p(self.0.iter())
    }

    /// Fails unless every entry lies in the subgroup.
    pub fn validate(&self, group: &GroupContext) -> Result<(), MixnetError> {
        self.0.iter().try_for_each(|x| group.check_element(x))
    }

    pub(crate) fn values(&self) -> Vec<&BigUint> {
        self.0.iter().map(|x| x.value()).collect()
    }
}

impl Index<usize> for VectorP {
    type Output = ElementModP;
    fn index(&self, i: usize) -> &ElementModP {
        &self.0[i]
    }
}

// ------- MatrixQ ------- //

/// An N x W matrix of scalars; the re-encryption nonces of a shuffle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatrixQ {
    inner: Array2D<ElementModQ>,
}

impl MatrixQ {
    /// Builds a matrix from equal-width rows.
    pub fn from_rows(rows: &[VectorQ]) -> Result<MatrixQ, MixnetError> {
        let first = rows.first().ok_or(MixnetError::EmptyInput("MatrixQ::from_rows"))?;
        let width = first.len();
        let mut flat = Vec::with_capacity(rows.len() * width);
        for (row, v) in rows.iter().enumerate() {
            if v.len() != width {
                return Err(MixnetError::InvalidWidth {
                    row,
                    expected: width,
                    actual: v.len(),
                });
            }
            flat.extend_from_slice(v.as_slice());
        }
        Ok(MatrixQ {
            inner: Array2D::from_row_major(&flat, rows.len(), width),
        })
    }

    /// A matrix of uniform scalars.
    pub fn random<R: RngCore + CryptoRng>(nrows: usize, ncols: usize, rng: &mut R) -> Self {
        let flat: Vec<ElementModQ> = (0..nrows * ncols).map(|_| ElementModQ::random(rng)).collect();
        MatrixQ {
            inner: Array2D::from_row_major(&flat, nrows, ncols),
        }
    }

    /// Number of rows N.
    pub fn nrows(&self) -> usize {
        self.inner.num_rows()
    }

    /// Number of columns W.
    pub fn ncols(&self) -> usize {
        self.inner.num_columns()
    }

    /// Entry `(i, j)`, if in range.
    pub fn get(&self, i: usize, j: usize) -> Option<&ElementModQ> {
        self.inner.get(i, j)
    }

    /// All rows, in order.
    pub fn rows(&self) -> Vec<VectorQ> {
        self.inner.as_rows().into_iter().map(VectorQ).collect()
    }

    /// All columns, in order.
    pub fn columns(&self) -> Vec<VectorQ> {
        self.inner.as_columns().into_iter().map(VectorQ).collect()
    }

    /// Per column j, `Σ_i self[i][j] * e[i]`.
    pub fn column_inner_product(&self, e: &VectorQ) -> Result<VectorQ, MixnetError> {
        check_len("MatrixQ::column_inner_product", self.nrows(), e.len())?;
        self.columns()
            .iter()
            .map(|col| col.inner_product(e))
            .collect::<Result<Vec<_>, _>>()
            .map(VectorQ)
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
