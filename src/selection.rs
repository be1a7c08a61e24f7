use serde::Serialize;

/// An ordered sibling set with a bounded cursor. No wraparound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionList<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> SelectionList<T> {
    /// Cursor starts on the first item.
    pub fn new(items: Vec<T>) -> Self { Self { items, index: 0 } }

    pub fn items(&self) -> &[T] { &self.items }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// `None` when the list is empty.
    pub fn index(&self) -> Option<usize> {
        if self.items.is_empty() { None } else { Some(self.index) }
    }

    pub fn current(&self) -> Option<&T> { self.items.get(self.index) }

    /// Out-of-range indices are ignored. Returns whether the cursor moved.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.items.len() { return false; }
        let moved = index != self.index;
        self.index = index;
        moved
    }

    pub fn prev(&mut self) -> bool {
        match self.index.checked_sub(1) {
            Some(i) => self.select(i),
            None => false,
        }
    }

    pub fn next(&mut self) -> bool { self.select(self.index + 1) }

    pub fn at_start(&self) -> bool { self.index == 0 }
    pub fn at_end(&self) -> bool { self.index + 1 >= self.items.len() }
}

impl<T: Clone> SelectionList<T> {
    pub fn from_refs(items: &[&T]) -> Self { Self::new(items.iter().map(|t| (*t).clone()).collect()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_stays_in_bounds() {
        let mut list = SelectionList::new(vec!["a", "b", "c"]);
        assert_eq!(list.current(), Some(&"a"));
        assert!(!list.prev());
        assert_eq!(list.index(), Some(0));

        assert!(list.next());
        assert!(list.next());
        assert!(!list.next());
        assert_eq!(list.current(), Some(&"c"));
        assert!(list.at_end());

        assert!(!list.select(3));
        assert_eq!(list.index(), Some(2));
        assert!(list.select(0));
        assert!(list.at_start());
    }

    #[test]
    fn empty_list_has_no_cursor() {
        let mut list: SelectionList<u8> = SelectionList::new(Vec::new());
        assert_eq!(list.index(), None);
        assert_eq!(list.current(), None);
        assert!(!list.next());
        assert!(!list.prev());
        assert!(!list.select(0));
    }
}
