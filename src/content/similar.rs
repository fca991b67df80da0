use std::collections::HashSet;

use super::Record;

pub const SIMILAR_LIMIT: usize = 3;

/// Records that can be compared by keyword overlap. Keywords match as exact,
/// case-sensitive strings.
pub trait Keyworded: Record {
    fn keywords(&self) -> &[String];
}

/// Rank `pool` against the record with `target_id` by the number of shared
/// keywords. Candidates without overlap are dropped; equal scores keep fetch
/// order. An unknown target or one without keywords yields nothing.
pub fn rank_similar<T: Keyworded>(target_id: &str, pool: Vec<T>, limit: usize) -> Vec<T> {
    let wanted: HashSet<String> = match pool.iter().find(|r| r.id() == target_id) {
        Some(target) => target.keywords().iter().cloned().collect(),
        None => return Vec::new(),
    };
    if wanted.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, T)> = pool
        .into_iter()
        .filter(|c| c.id() != target_id && !c.keywords().is_empty())
        .filter_map(|c| {
            let overlap = c
                .keywords()
                .iter()
                .map(String::as_str)
                .collect::<HashSet<&str>>()
                .into_iter()
                .filter(|k| wanted.contains(*k))
                .count();
            (overlap > 0).then_some((overlap, c))
        })
        .collect();

    // stable: ties stay in fetch order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, c)| c).collect()
}
