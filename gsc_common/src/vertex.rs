use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque vertex identifier.
///
/// Simple and prime graph states use [`Vertex::Plain`]. Prime-power states
/// split every qudit (a *family*) into `m` member sub-vertices, addressed as
/// [`Vertex::Member`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Vertex {
    /// A plain integer vertex.
    Plain(u32),
    /// Member `member` of qudit family `family`.
    Member {
        /// Family (qudit) index.
        family: u32,
        /// Member index inside the family, `0 <= member < m`.
        member: u32,
    },
}

impl Vertex {
    /// Plain vertex constructor.
    #[must_use]
    pub const fn plain(id: u32) -> Self {
        Self::Plain(id)
    }

    /// Family member constructor.
    #[must_use]
    pub const fn member(family: u32, member: u32) -> Self {
        Self::Member { family, member }
    }

    /// True for [`Vertex::Plain`].
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        matches!(self, Self::Plain(_))
    }

    /// Family index, for member vertices.
    #[must_use]
    pub const fn family(&self) -> Option<u32> {
        match self {
            Self::Member { family, .. } => Some(*family),
            Self::Plain(_) => None,
        }
    }

    /// Member index, for member vertices.
    #[must_use]
    pub const fn member_index(&self) -> Option<u32> {
        match self {
            Self::Member { member, .. } => Some(*member),
            Self::Plain(_) => None,
        }
    }

    /// Plain id, flattening a member vertex to its family id.
    #[must_use]
    pub const fn flat_id(&self) -> u32 {
        match self {
            Self::Plain(id) => *id,
            Self::Member { family, .. } => *family,
        }
    }
}

impl From<u32> for Vertex {
    fn from(id: u32) -> Self {
        Self::Plain(id)
    }
}

impl From<(u32, u32)> for Vertex {
    fn from((family, member): (u32, u32)) -> Self {
        Self::Member { family, member }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(id) => write!(f, "{id}"),
            Self::Member { family, member } => write!(f, "({family}, {member})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_by_family_then_member() {
        let mut vs = vec![
            Vertex::member(1, 0),
            Vertex::member(0, 1),
            Vertex::member(0, 0),
        ];
        vs.sort();
        assert_eq!(
            vs,
            vec![
                Vertex::member(0, 0),
                Vertex::member(0, 1),
                Vertex::member(1, 0)
            ]
        );
    }

    #[test]
    fn display() {
        assert_eq!(Vertex::plain(3).to_string(), "3");
        assert_eq!(Vertex::member(2, 1).to_string(), "(2, 1)");
    }
}
