//! Ignore-rule lookup. Out of scope per spec.md §1 ("the ignore
//! engine... interfaces, not components to reimplement") — consumed here
//! through [`IgnoreEngine`], with a default adapter over the `ignore`
//! crate's `gitignore::Gitignore` matcher.

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

pub trait IgnoreEngine {
    fn is_ignored(&self, path: &str, is_dir: bool) -> bool;
}

/// Default adapter: a single compiled gitignore matcher scoped to one
/// root. C4 acquires/releases this per directory in the teacher's code;
/// here a caller builds it once for the workdir root and reuses it, since
/// `Gitignore` already walks parent `.gitignore` files lazily.
pub struct GitignoreEngine {
    matcher: Gitignore,
}

impl GitignoreEngine {
    pub fn for_root(root: &Path) -> Self {
        let mut builder = GitignoreBuilder::new(root);
        builder.add(root.join(".gitignore"));
        let matcher = builder.build().unwrap_or_else(|_| Gitignore::empty());
        Self { matcher }
    }
}

impl IgnoreEngine for GitignoreEngine {
    fn is_ignored(&self, path: &str, is_dir: bool) -> bool {
        self.matcher.matched_path_or_any_parents(path, is_dir).is_ignore()
    }
}

/// Ignores nothing. Useful for tests and as a neutral default.
pub struct NeverIgnore;

impl IgnoreEngine for NeverIgnore {
    fn is_ignored(&self, _path: &str, _is_dir: bool) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn gitignore_matches_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join(".gitignore")).unwrap();
        writeln!(f, "*.log").unwrap();
        drop(f);

        let engine = GitignoreEngine::for_root(dir.path());
        assert!(engine.is_ignored("build.log", false));
        assert!(!engine.is_ignored("main.rs", false));
    }

    #[test]
    fn never_ignore_always_false() {
        assert!(!NeverIgnore.is_ignored("anything", true));
    }
}
