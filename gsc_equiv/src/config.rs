//! Settings for the equivalence solver.

use contracts::*;

/// Largest basis whose span still fits the 64-bit Gray-code counter.
pub const MAX_SPAN_DIM: usize = 63;

/// Settings for [`are_lc_equiv`](crate::are_lc_equiv).
///
/// - max_basis_dim: refuse to enumerate solution spaces spanned by more
///   basis vectors than this. The enumeration visits `2^dim - 1` vectors.
///   Bases of more than [`MAX_SPAN_DIM`] vectors are always refused.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EquivConfig {
    /// Largest solution-space dimension to enumerate.
    pub max_basis_dim: Option<usize>,
}

impl EquivConfig {
    /// Default settings: no limit beyond [`MAX_SPAN_DIM`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`Self::max_basis_dim`].
    #[must_use]
    #[ensures(ret.max_basis_dim == max_basis_dim)]
    pub fn with_max_basis_dim(mut self, max_basis_dim: Option<usize>) -> Self {
        self.max_basis_dim = max_basis_dim;
        self
    }

    /// The effective limit.
    #[must_use]
    pub fn basis_limit(&self) -> usize {
        self.max_basis_dim.map_or(MAX_SPAN_DIM, |max| max.min(MAX_SPAN_DIM))
    }
}
