//! `O(log N)` lookup from a parameter's stable id hash to its declaration index (spec §4.8, §9).
//!
//! The table itself — a `&'static [(u32, usize)]` sorted by hash — is built and validated for
//! duplicate/colliding hashes at macro-expansion time by `zplugin_derive`; this module only
//! supplies the binary search used against it at block rate by the CLAP wrapper.

/// Find the declaration index whose id hash is `id_hash` in a table sorted ascending by hash.
/// Returns `None` if no entry matches.
pub fn lookup_index(table: &[(u32, usize)], id_hash: u32) -> Option<usize> {
    table
        .binary_search_by_key(&id_hash, |&(hash, _)| hash)
        .ok()
        .map(|position| table[position].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_present_hash() {
        let table = [(10, 0), (20, 1), (30, 2)];
        assert_eq!(lookup_index(&table, 20), Some(1));
    }

    #[test]
    fn missing_hash_is_none() {
        let table = [(10, 0), (20, 1), (30, 2)];
        assert_eq!(lookup_index(&table, 25), None);
    }

    #[test]
    fn empty_table() {
        let table: [(u32, usize); 0] = [];
        assert_eq!(lookup_index(&table, 1), None);
    }
}
