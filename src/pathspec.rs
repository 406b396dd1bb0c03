//! Path filtering. Declared in [`crate::delta::DiffOptions`] but not
//! honored — spec.md §9 explicitly permits leaving this reserved and
//! documented rather than implemented. No patterns are stored and no
//! matching is performed; the type exists only so `DiffOptions`' shape
//! matches spec.md §6.
#[derive(Clone, Default, Debug)]
pub struct Pathspec;
