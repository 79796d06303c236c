//! The set of record ids marked for action.

use std::collections::HashSet;

use crate::record::RecordId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: HashSet<RecordId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: RecordId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Clear when as many ids are selected as are visible, otherwise select
    /// every visible id.
    ///
    /// This compares counts, not sets: a selection that has drifted from the
    /// visible list but happens to have the same size is treated as "all".
    pub fn toggle_all(&mut self, visible: &[RecordId]) {
        if self.ids.len() == visible.len() {
            self.ids.clear();
        } else {
            self.ids = visible.iter().copied().collect();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Header-checkbox state; same count rule as `toggle_all`.
    pub fn all_selected(&self, visible_len: usize) -> bool {
        self.ids.len() == visible_len
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn remove(&mut self, ids: &[RecordId]) {
        for id in ids {
            self.ids.remove(id);
        }
    }

    /// Drop every id not in `present`.
    pub fn retain(&mut self, present: &HashSet<RecordId>) {
        self.ids.retain(|id| present.contains(id));
    }
}

impl FromIterator<RecordId> for Selection {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_its_own_inverse() {
        let mut sel: Selection = [1, 4].into_iter().collect();
        let before = sel.clone();

        for id in [1, 2, 99] {
            sel.toggle(id);
            sel.toggle(id);
            assert_eq!(sel, before);
        }
    }

    #[test]
    fn toggle_all_clears_when_everything_is_selected() {
        let visible = [1, 2, 3, 4, 5];
        let mut sel: Selection = visible.into_iter().collect();
        sel.toggle_all(&visible);
        assert!(sel.is_empty());
    }

    #[test]
    fn toggle_all_selects_everything_from_partial() {
        let visible = [1, 2, 3, 4, 5];
        let mut sel: Selection = [1, 3, 5].into_iter().collect();
        sel.toggle_all(&visible);
        assert_eq!(sel.ids(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn toggle_all_compares_counts_only() {
        // Same size as the visible list but different members: treated as "all".
        let mut sel: Selection = [7, 8].into_iter().collect();
        assert!(sel.all_selected(2));
        sel.toggle_all(&[1, 2]);
        assert!(sel.is_empty());
    }

    #[test]
    fn remove_and_retain() {
        let mut sel: Selection = [1, 2, 3, 4].into_iter().collect();
        sel.remove(&[2, 10]);
        assert_eq!(sel.ids(), vec![1, 3, 4]);

        let present: HashSet<RecordId> = [3, 4, 5].into_iter().collect();
        sel.retain(&present);
        assert_eq!(sel.ids(), vec![3, 4]);
    }
}
