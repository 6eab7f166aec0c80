//! Dense linear algebra over GF(2).
//!
//! Rows are bit-packed into `u64` words, so adding two rows is a word-wise
//! XOR. The solver only ever needs elimination, nullspaces and the
//! enumeration of a spanned subspace, which is all this module provides.

use std::ops::BitXorAssign;

use contracts::*;

const WORD_BITS: usize = u64::BITS as usize;

/// A fixed-length vector over GF(2).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitRow {
    len: usize,
    words: Vec<u64>,
}

impl BitRow {
    /// The zero vector of length `len`.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            words: vec![0; len.div_ceil(WORD_BITS)],
        }
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True for the length-zero vector.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entry `index`.
    #[must_use]
    #[debug_requires(index < self.len)]
    pub fn get(&self, index: usize) -> bool {
        (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    /// Overwrites entry `index`.
    #[debug_requires(index < self.len)]
    pub fn set(&mut self, index: usize, value: bool) {
        let mask = 1u64 << (index % WORD_BITS);
        if value {
            self.words[index / WORD_BITS] |= mask;
        } else {
            self.words[index / WORD_BITS] &= !mask;
        }
    }

    /// Adds 1 to entry `index`.
    #[debug_requires(index < self.len)]
    pub fn flip(&mut self, index: usize) {
        self.words[index / WORD_BITS] ^= 1u64 << (index % WORD_BITS);
    }

    /// True when every entry is 0.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Indices of the non-zero entries, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &word)| {
            let mut rest = word;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(w * WORD_BITS + bit)
            })
        })
    }
}

impl BitXorAssign<&BitRow> for BitRow {
    fn bitxor_assign(&mut self, rhs: &BitRow) {
        debug_assert_eq!(self.len, rhs.len, "rows of different length");
        for (word, other) in self.words.iter_mut().zip(&rhs.words) {
            *word ^= other;
        }
    }
}

/// A matrix over GF(2) with a fixed number of columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gf2Matrix {
    cols: usize,
    rows: Vec<BitRow>,
}

impl Gf2Matrix {
    /// An empty matrix with `cols` columns.
    #[must_use]
    pub const fn new(cols: usize) -> Self {
        Self {
            cols,
            rows: Vec::new(),
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The rows, in insertion order unless reduced.
    #[must_use]
    pub const fn rows(&self) -> &[BitRow] {
        self.rows.as_slice()
    }

    /// Appends a row of length [`Self::cols`].
    #[debug_requires(row.len() == self.cols)]
    pub fn push_row(&mut self, row: BitRow) {
        self.rows.push(row);
    }

    /// Drops duplicate and all-zero rows. Neither changes the nullspace.
    pub fn dedup_rows(&mut self) {
        self.rows.retain(|row| !row.is_zero());
        self.rows.sort_unstable();
        self.rows.dedup();
    }

    /// Brings the matrix to reduced row echelon form in place and returns the
    /// pivot column of each non-zero row. Zero rows end up at the bottom.
    #[debug_ensures(ret.windows(2).all(|w| w[0] < w[1]))]
    pub fn rref(&mut self) -> Vec<usize> {
        let mut pivots = Vec::new();
        for col in 0..self.cols {
            let row = pivots.len();
            let Some(found) = (row..self.rows.len()).find(|&r| self.rows[r].get(col)) else {
                continue;
            };
            self.rows.swap(row, found);
            let pivot = self.rows[row].clone();
            for (r, other) in self.rows.iter_mut().enumerate() {
                if r != row && other.get(col) {
                    *other ^= &pivot;
                }
            }
            pivots.push(col);
        }
        pivots
    }

    /// A basis of `{ x : M x = 0 }`, one vector per free column.
    #[must_use]
    pub fn nullspace(&self) -> Vec<BitRow> {
        let mut reduced = self.clone();
        let pivots = reduced.rref();

        let mut is_pivot = vec![false; self.cols];
        for &col in &pivots {
            is_pivot[col] = true;
        }

        (0..self.cols)
            .filter(|&col| !is_pivot[col])
            .map(|free| {
                let mut v = BitRow::zeros(self.cols);
                v.set(free, true);
                for (row, &col) in pivots.iter().enumerate() {
                    if reduced.rows[row].get(free) {
                        v.set(col, true);
                    }
                }
                v
            })
            .collect()
    }
}

/// Every non-zero vector of the subspace spanned by linearly independent
/// `basis` vectors, each exactly once, in Gray-code order: consecutive
/// vectors differ by a single basis vector.
///
/// The basis must have fewer than 64 vectors.
#[derive(Clone, Debug)]
pub struct Span<'b> {
    basis: &'b [BitRow],
    current: Option<BitRow>,
    step: u64,
    end: u64,
}

impl<'b> Span<'b> {
    /// Iterates the non-zero vectors spanned by `basis`.
    #[must_use]
    #[debug_requires(basis.len() < 64)]
    pub fn new(basis: &'b [BitRow]) -> Self {
        Self {
            basis,
            current: basis.first().map(|v| BitRow::zeros(v.len())),
            step: 1,
            end: 1u64 << basis.len(),
        }
    }
}

impl Iterator for Span<'_> {
    type Item = BitRow;

    fn next(&mut self) -> Option<BitRow> {
        if self.step >= self.end {
            return None;
        }
        let current = self.current.as_mut()?;
        *current ^= &self.basis[self.step.trailing_zeros() as usize];
        self.step += 1;
        Some(current.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.end - self.step).ok();
        (left.unwrap_or(usize::MAX), left)
    }
}
