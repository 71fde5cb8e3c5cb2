use std::collections::BTreeSet;

use combogen_core::{Item, MAX_TYPES, TypeLabel};

/// Turn per-pool counts into labeled items.
///
/// Items are emitted pool by pool and ascending within a pool; that order
/// drives enumeration order downstream. `[1, 2, 1]` yields `A1 B1 B2 C1`.
pub fn expand(counts: &[u32]) -> Vec<Item> {
    debug_assert!(counts.len() <= MAX_TYPES, "pool count exceeds label range");

    counts
        .iter()
        .enumerate()
        .filter_map(|(pool, count)| TypeLabel::from_index(pool).map(|label| (label, *count)))
        .flat_map(|(label, count)| (1..=count).map(move |index| Item::new(label, index)))
        .collect()
}

/// Number of distinct type labels present in `items`.
pub fn distinct_types(items: &[Item]) -> usize {
    items
        .iter()
        .map(|item| item.type_label)
        .collect::<BTreeSet<_>>()
        .len()
}
