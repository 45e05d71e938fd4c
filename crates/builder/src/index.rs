use std::fmt;

use atoi::FromRadix10;

/// A vertex identifier: a non-negative integer strictly less than
/// `N_vertices` (`spec.md` §3.1). Grounded on the generic `Idx` trait
/// pattern used elsewhere for graph node indices, simplified to a
/// concrete `u64` newtype: this codebase never needs to parametrize
/// over multiple index widths the way a general-purpose graph library
/// does, so the generic trait machinery would be unused abstraction.
/// `parse` is kept because `cli::dimacs`'s DIMACS reader reuses the same
/// byte-level integer parsing for its `a u v w` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VertexId(u64);

impl VertexId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Parses a decimal vertex id from the start of `bytes`, returning
    /// the id and the number of bytes consumed.
    pub fn parse(bytes: &[u8]) -> (Self, usize) {
        let (id, len) = u64::from_radix_10(bytes);
        (Self(id), len)
    }
}

impl From<u64> for VertexId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_a_decimal_prefix() {
        let (id, len) = VertexId::parse(b"42 rest");
        assert_eq!(id, VertexId::new(42));
        assert_eq!(len, 2);
    }
}
