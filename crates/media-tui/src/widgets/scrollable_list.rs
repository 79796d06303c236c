//! Cursor + scroll window over a list of items.

pub struct ScrollableList<T> {
    items: Vec<T>,
    pub selected: usize,
    pub scroll_offset: usize,
}

impl<T> Default for ScrollableList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            scroll_offset: 0,
        }
    }
}

impl<T: PartialEq> ScrollableList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the items, keeping the cursor on the same item when it
    /// survived and clamping it otherwise.
    pub fn set_items(&mut self, items: Vec<T>) {
        let current = self.items.get(self.selected).and_then(|cur| items.iter().position(|i| i == cur));
        self.items = items;
        match current {
            Some(pos) => self.selected = pos,
            None => self.clamp(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        self.selected = (self.selected + n).min(self.items.len().saturating_sub(1));
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    /// (index, &item) pairs visible in `height` rows.
    /// Call ensure_visible first to update scroll_offset.
    pub fn visible_items(&self, height: usize) -> Vec<(usize, &T)> {
        if height == 0 || self.items.is_empty() {
            return Vec::new();
        }
        let start = self.scroll_offset.min(self.items.len());
        let end = (start + height).min(self.items.len());
        (start..end).map(|i| (i, &self.items[i])).collect()
    }

    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected + 1 - height;
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn clamp(&mut self) {
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        if self.scroll_offset > self.selected {
            self.scroll_offset = self.selected;
        }
    }
}
