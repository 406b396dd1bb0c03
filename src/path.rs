//! Paths, in the stored representation the enumerators compare against
//! each other: a plain UTF-8 string with `/` separators. Directory entries
//! carry a trailing `/` once inserted into a [`crate::delta::DeltaList`] or
//! intermediate tuple so that byte-wise ordering lines up with tree and
//! index order (spec.md §3's "`/`-suffix trick").
//!
//! Unlike the teacher's interned, `'static`-arena path type, this is a
//! plain owned `String` wrapper — the diff engine doesn't need a
//! whole-repository arena, just a comparable, cheaply-cloned path.

use std::fmt::{self, Display, Formatter};

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PathKey(String);

impl PathKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append `/` if not already directory-suffixed, so sort order aligns
    /// a directory entry with its (lexicographically interleaved) children.
    pub fn with_trailing_slash(&self) -> Self {
        if self.0.ends_with('/') || self.0.is_empty() {
            self.clone()
        } else {
            Self(format!("{}/", self.0))
        }
    }

    pub fn join(&self, child: &str) -> Self {
        if self.0.is_empty() {
            Self(child.to_owned())
        } else if self.0.ends_with('/') {
            Self(format!("{}{}", self.0, child))
        } else {
            Self(format!("{}/{}", self.0, child))
        }
    }

    pub fn starts_with(&self, prefix: &PathKey) -> bool {
        self.0.starts_with(prefix.as_str())
    }

    /// Parent directory path, suffixed with `/`, or `None` at the root.
    pub fn parent(&self) -> Option<PathKey> {
        let trimmed = self.0.trim_end_matches('/');
        let idx = trimmed.rfind('/')?;
        Some(Self(trimmed[..=idx].to_owned()))
    }
}

impl Display for PathKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PathKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "PathKey({:?})", self.0)
    }
}

impl From<&str> for PathKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for PathKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_idempotent() {
        let p = PathKey::new("foo");
        assert_eq!(p.with_trailing_slash().as_str(), "foo/");
        assert_eq!(p.with_trailing_slash().with_trailing_slash().as_str(), "foo/");
    }

    #[test]
    fn directory_suffix_sorts_between_siblings() {
        // `foo.txt` < `foo/` < `foo0` byte-wise: '.' (0x2e) < '/' (0x2f) < '0' (0x30)
        let mut paths =
            vec![PathKey::new("foo0"), PathKey::new("foo/"), PathKey::new("foo.txt")];
        paths.sort();
        assert_eq!(paths[0].as_str(), "foo.txt");
        assert_eq!(paths[1].as_str(), "foo/");
        assert_eq!(paths[2].as_str(), "foo0");
    }

    #[test]
    fn join_handles_trailing_slash() {
        assert_eq!(PathKey::new("a/").join("b").as_str(), "a/b");
        assert_eq!(PathKey::new("a").join("b").as_str(), "a/b");
        assert_eq!(PathKey::new("").join("b").as_str(), "b");
    }

    #[test]
    fn parent_strips_one_component() {
        assert_eq!(PathKey::new("a/b/c").parent().unwrap().as_str(), "a/b/");
        assert_eq!(PathKey::new("a/").parent(), None);
    }
}
