use std::collections::HashSet;

use combogen_core::{Item, SelectionSet, TypeLabel};

/// Enumerate every selection of `length` items with no two sharing a type.
///
/// Selections are increasing-index subsequences of `items`, produced in the
/// order a depth-first walk with ascending start index visits them. A length
/// of zero or one larger than `items` yields an empty set rather than an error.
pub fn enumerate(items: &[Item], length: usize) -> SelectionSet {
    if length == 0 || length > items.len() {
        return SelectionSet::new();
    }

    let mut search = Search {
        items,
        length,
        current: Vec::with_capacity(length),
        used_types: HashSet::new(),
        selections: SelectionSet::new(),
    };
    search.visit(0);
    search.selections
}

struct Search<'a> {
    items: &'a [Item],
    length: usize,
    current: Vec<&'a Item>,
    used_types: HashSet<TypeLabel>,
    selections: SelectionSet,
}

impl Search<'_> {
    fn visit(&mut self, start: usize) {
        if self.current.len() == self.length {
            // `current` is reused by the walk; emit an owned snapshot.
            let selection = self.current.iter().map(|item| item.name.clone()).collect();
            self.selections.push(selection);
            return;
        }

        let items = self.items;
        for (index, item) in items.iter().enumerate().skip(start) {
            if !self.used_types.insert(item.type_label) {
                continue;
            }
            self.current.push(item);

            self.visit(index + 1);

            self.current.pop();
            self.used_types.remove(&item.type_label);
        }
    }
}
