//! Stable grouping of extract rows by natural key

use std::hash::Hash;

use indexmap::IndexMap;

/// Partition rows by key in a single pass.
///
/// Groups come out in first-appearance order of their key and keep the input
/// order of their rows. Rows without a key are left out.
pub fn group_by_key<'a, T, K, F>(rows: &'a [T], mut key: F) -> IndexMap<K, Vec<&'a T>>
where
    K: Hash + Eq,
    F: FnMut(&'a T) -> Option<K>,
{
    let mut groups: IndexMap<K, Vec<&'a T>> = IndexMap::new();
    for row in rows {
        if let Some(k) = key(row) {
            groups.entry(k).or_default().push(row);
        }
    }
    groups
}

/// First row of a group satisfying `pred`, scanning in group order
pub fn first_where<'a, T>(group: &[&'a T], pred: impl Fn(&T) -> bool) -> Option<&'a T> {
    group.iter().copied().find(|&row| pred(row))
}
