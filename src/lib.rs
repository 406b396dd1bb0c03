//! The diff engine of a content-addressed version control library:
//! tree↔tree, tree↔index, and index↔workdir comparison, plus the driver
//! and formatter that turn a list of per-path deltas into unified-diff
//! output.

pub mod attr;
pub mod delta;
pub mod diff_index;
pub mod diff_tree;
pub mod diff_workdir;
pub mod driver;
pub mod error;
pub mod ignore_engine;
pub mod index;
pub mod linediff;
pub mod mode;
pub mod odb;
pub mod oid;
pub mod path;
pub mod patch;
pub mod pathspec;
pub mod status;
pub mod tree;
pub mod workdir;

pub use delta::{DeltaList, DeltaRecord, DiffOptions, Status};
pub use diff_index::diff_index_to_tree;
pub use diff_tree::diff_tree_to_tree;
pub use diff_workdir::diff_workdir_to_index;
pub use driver::{diff_blobs, for_each, DiffCallbacks};
pub use mode::FileMode;
pub use oid::Oid;
pub use patch::{print_compact, print_patch};
