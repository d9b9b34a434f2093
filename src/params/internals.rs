//! The author-facing trait implemented by `#[derive(Params)]` (spec §3a).

use super::declaration::ParamDecl;
use super::lookup::lookup_index;

/// Implemented by a plugin's parameter struct via `#[derive(Params)]`. Both methods return
/// `'static` data built once at compile time: `declarations()` in field-declaration order, and
/// `lookup_table()` as a sorted `(id_hash, index)` table over the same indices.
pub trait Params {
    fn declarations() -> &'static [ParamDecl];
    fn lookup_table() -> &'static [(u32, usize)];

    /// Find a parameter's declaration index by its stable id hash, in `O(log N)`.
    fn index_of(id_hash: u32) -> Option<usize> {
        lookup_index(Self::lookup_table(), id_hash)
    }
}
