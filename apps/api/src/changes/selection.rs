use std::collections::BTreeSet;

use serde::Serialize;

/// Which entries of the current change list are active.
///
/// Bound to one list by its length; a new list gets a new set (all selected).
/// Out-of-range indices are ignored, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSet {
    len: usize,
    selected: BTreeSet<usize>,
}

impl SelectionSet {
    /// Default selection for a freshly published list: everything active.
    pub fn all(len: usize) -> Self {
        Self {
            len,
            selected: (0..len).collect(),
        }
    }

    pub fn none(len: usize) -> Self {
        Self {
            len,
            selected: BTreeSet::new(),
        }
    }

    pub fn from_indices(len: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            len,
            selected: indices.into_iter().filter(|&i| i < len).collect(),
        }
    }

    pub fn select_all(&mut self) {
        self.selected = (0..self.len).collect();
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    /// Flips one entry. Returns the new state, or `None` if out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        if self.selected.remove(&index) {
            Some(false)
        } else {
            self.selected.insert(index);
            Some(true)
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Active indices, ascending.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
