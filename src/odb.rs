//! Object database: resolves content hashes to byte buffers. Out of scope
//! per spec.md §1 ("the object database... interfaces, not components to
//! reimplement") — this module only defines the contract and a default,
//! in-memory implementation good enough to drive the rest of the crate in
//! isolation and in tests.

use std::collections::HashMap;

use crate::error::{DiffError, Result};
use crate::oid::Oid;

pub trait ObjectDatabase {
    fn read_blob(&self, oid: Oid) -> Result<Vec<u8>>;
}

/// Trivial content-addressed store, keyed by the same hash the rest of
/// the crate uses. Not meant to be a real loose-object/pack store — just
/// enough to exercise the engine end to end.
#[derive(Default)]
pub struct InMemoryOdb {
    blobs: HashMap<Oid, Vec<u8>>,
}

impl InMemoryOdb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `bytes`, stores them, and returns the resulting oid.
    pub fn insert(&mut self, bytes: impl Into<Vec<u8>>) -> Oid {
        let bytes = bytes.into();
        let oid = Oid::hash_bytes(&bytes);
        self.blobs.insert(oid, bytes);
        oid
    }
}

impl ObjectDatabase for InMemoryOdb {
    fn read_blob(&self, oid: Oid) -> Result<Vec<u8>> {
        self.blobs
            .get(&oid)
            .cloned()
            .ok_or_else(|| DiffError::not_found(format!("blob {oid}")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_read_roundtrips() {
        let mut odb = InMemoryOdb::new();
        let oid = odb.insert(b"hello".to_vec());
        assert_eq!(odb.read_blob(oid).unwrap(), b"hello");
    }

    #[test]
    fn missing_blob_is_not_found() {
        let odb = InMemoryOdb::new();
        let err = odb.read_blob(Oid::hash_bytes(b"nope")).unwrap_err();
        assert!(matches!(err.downcast_ref::<DiffError>(), Some(DiffError::NotFound(_))));
    }
}
