use serde::{Deserialize, Serialize};
use std::fmt;

/// Tagged description of a graph state's alphabet.
///
/// Dispatch over canonicalization strategies and operation families is done
/// by matching on this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphKind {
    /// `p = 2, m = 1`: an ordinary simple graph, every weight is 1.
    Qubit,
    /// `p > 2, m = 1`: edge weights in `[1, p)`.
    Prime {
        /// The prime `p`.
        prime: u32,
    },
    /// `m > 1`: every qudit is split into `power` member vertices.
    PrimePower {
        /// The prime `p`.
        prime: u32,
        /// The power `m`.
        power: u32,
        /// Number of qudit families `F`.
        families: usize,
    },
}

impl GraphKind {
    /// The prime `p`.
    #[must_use]
    pub const fn prime(&self) -> u32 {
        match self {
            Self::Qubit => 2,
            Self::Prime { prime } | Self::PrimePower { prime, .. } => *prime,
        }
    }

    /// The power `m`, 1 unless prime-power.
    #[must_use]
    pub const fn power(&self) -> u32 {
        match self {
            Self::Qubit | Self::Prime { .. } => 1,
            Self::PrimePower { power, .. } => *power,
        }
    }

    /// `d = p^m`.
    #[must_use]
    pub fn dimension(&self) -> u64 {
        u64::from(self.prime()).pow(self.power())
    }

    /// `p = 2, m = 1`.
    #[must_use]
    pub const fn is_qubit(&self) -> bool {
        matches!(self, Self::Qubit)
    }

    /// `m > 1`.
    #[must_use]
    pub const fn is_prime_power(&self) -> bool {
        matches!(self, Self::PrimePower { .. })
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Qubit => write!(f, "qubit (d = 2)"),
            Self::Prime { prime } => write!(f, "prime qudit (d = {prime})"),
            Self::PrimePower {
                prime,
                power,
                families,
            } => write!(f, "prime-power qudit (d = {prime}^{power}, {families} families)"),
        }
    }
}

/// Trial-division primality test.
#[must_use]
pub fn is_prime(a: u32) -> bool {
    if a < 2 {
        return false;
    }
    let a = u64::from(a);
    (2..).take_while(|x: &u64| x * x <= a).all(|x| a % x != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primes() {
        let found: Vec<u32> = (0..30).filter(|&x| is_prime(x)).collect();
        assert_eq!(found, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn dimension() {
        assert_eq!(GraphKind::Qubit.dimension(), 2);
        assert_eq!(GraphKind::Prime { prime: 5 }.dimension(), 5);
        let kind = GraphKind::PrimePower {
            prime: 3,
            power: 2,
            families: 4,
        };
        assert_eq!(kind.dimension(), 9);
    }
}
