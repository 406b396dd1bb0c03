//! Content hash identifiers.

use sha1::{Digest, Sha1};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::DiffError;

/// A 20-byte content hash, comparable for equality and total order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid([u8; 20]);

impl Oid {
    pub const UNKNOWN: Self = Self([0; 20]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 20]
    }

    pub fn hash_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(bytes);
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Short hex form used by `index <old>..<new>` patch lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl Default for Oid {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl Display for Oid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl FromStr for Oid {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes =
            hex::decode(s).map_err(|_| DiffError::invalid_input(format!("not hex: {s}")))?;
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| DiffError::invalid_input(format!("wrong oid length: {s}")))?;
        Ok(Self(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_oid_is_unknown() {
        assert!(Oid::UNKNOWN.is_zero());
        assert!(Oid::default().is_zero());
    }

    #[test]
    fn hash_roundtrips_through_display() {
        let oid = Oid::hash_bytes(b"hello world");
        let parsed: Oid = oid.to_string().parse().unwrap();
        assert_eq!(oid, parsed);
    }

    #[test]
    fn distinct_content_hashes_differ() {
        assert_ne!(Oid::hash_bytes(b"a"), Oid::hash_bytes(b"b"));
    }
}
