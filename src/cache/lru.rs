//! Recency List Module
//!
//! Least Recently Used ordering for cache eviction.

// == Link ==
#[derive(Debug)]
struct Link {
    key: String,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Doubly-linked access order over keys, stored in a slab.
///
/// - Front (`oldest`) = least recently used
/// - Back (`newest`) = most recently used
///
/// Every node lives at a stable slot index handed out by `push_newest`, so
/// promoting or removing a known key is O(1). Freed slots are reused.
/// Passing a slot that is not currently linked is a caller bug.
#[derive(Debug, Default)]
pub struct RecencyList {
    links: Vec<Link>,
    free: Vec<usize>,
    oldest: Option<usize>,
    newest: Option<usize>,
    len: usize,
}

impl RecencyList {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    // == Push Newest ==
    /// Appends a key as most recently used and returns its slot.
    pub fn push_newest(&mut self, key: String) -> usize {
        let link = Link {
            key,
            prev: self.newest,
            next: None,
        };

        let slot = match self.free.pop() {
            Some(slot) => {
                self.links[slot] = link;
                slot
            }
            None => {
                self.links.push(link);
                self.links.len() - 1
            }
        };

        match self.newest {
            Some(newest) => self.links[newest].next = Some(slot),
            None => self.oldest = Some(slot),
        }
        self.newest = Some(slot);
        self.len += 1;
        slot
    }

    // == Touch ==
    /// Marks a slot as most recently used.
    pub fn touch(&mut self, slot: usize) {
        if self.newest == Some(slot) {
            return;
        }

        self.unlink(slot);

        // slot was not the newest, so the list is non-empty after unlinking
        self.links[slot].prev = self.newest;
        if let Some(newest) = self.newest {
            self.links[newest].next = Some(slot);
        }
        self.newest = Some(slot);
    }

    // == Remove ==
    /// Unlinks a slot and returns its key.
    pub fn remove(&mut self, slot: usize) -> String {
        self.unlink(slot);
        self.free.push(slot);
        self.len -= 1;
        std::mem::take(&mut self.links[slot].key)
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        let slot = self.oldest?;
        Some(self.remove(slot))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.links.clear();
        self.free.clear();
        self.oldest = None;
        self.newest = None;
        self.len = 0;
    }

    // == Iter ==
    /// Walks keys from least to most recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.oldest,
        }
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.links[slot].prev, self.links[slot].next);

        match prev {
            Some(prev) => self.links[prev].next = next,
            None => self.oldest = next,
        }
        match next {
            Some(next) => self.links[next].prev = prev,
            None => self.newest = prev,
        }

        self.links[slot].prev = None;
        self.links[slot].next = None;
    }
}

/// Iterator over keys, oldest first.
pub struct Iter<'a> {
    list: &'a RecencyList,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let link = &self.list.links[slot];
        self.cursor = link.next;
        Some(link.key.as_str())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList) -> Vec<&str> {
        list.iter().collect()
    }

    #[test]
    fn test_new_list_is_empty() {
        let list = RecencyList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.iter().next(), None);
    }

    #[test]
    fn test_push_orders_oldest_first() {
        let mut list = RecencyList::new();

        list.push_newest("a".to_string());
        list.push_newest("b".to_string());
        list.push_newest("c".to_string());

        assert_eq!(list.len(), 3);
        assert_eq!(list.iter().next(), Some("a"));
        assert_eq!(keys(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_touch_moves_to_newest() {
        let mut list = RecencyList::new();

        let a = list.push_newest("a".to_string());
        list.push_newest("b".to_string());
        list.push_newest("c".to_string());

        list.touch(a);

        assert_eq!(list.iter().next(), Some("b"));
        assert_eq!(keys(&list), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_touch_middle_and_newest() {
        let mut list = RecencyList::new();

        list.push_newest("a".to_string());
        let b = list.push_newest("b".to_string());
        let c = list.push_newest("c".to_string());

        list.touch(b);
        assert_eq!(keys(&list), vec!["a", "c", "b"]);

        // Touching the newest is a no-op
        list.touch(b);
        assert_eq!(keys(&list), vec!["a", "c", "b"]);

        list.touch(c);
        assert_eq!(keys(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_touch_single_element() {
        let mut list = RecencyList::new();
        let only = list.push_newest("only".to_string());

        list.touch(only);

        assert_eq!(keys(&list), vec!["only"]);
        assert_eq!(list.pop_oldest(), Some("only".to_string()));
        assert!(list.is_empty());
    }

    #[test]
    fn test_pop_oldest_in_order() {
        let mut list = RecencyList::new();

        list.push_newest("key1".to_string());
        list.push_newest("key2".to_string());
        list.push_newest("key3".to_string());

        assert_eq!(list.pop_oldest(), Some("key1".to_string()));
        assert_eq!(list.pop_oldest(), Some("key2".to_string()));
        assert_eq!(list.len(), 1);
        assert_eq!(list.pop_oldest(), Some("key3".to_string()));
        assert_eq!(list.pop_oldest(), None);
    }

    #[test]
    fn test_remove_middle() {
        let mut list = RecencyList::new();

        list.push_newest("key1".to_string());
        let key2 = list.push_newest("key2".to_string());
        list.push_newest("key3".to_string());

        assert_eq!(list.remove(key2), "key2");

        assert_eq!(list.len(), 2);
        assert_eq!(keys(&list), vec!["key1", "key3"]);
    }

    #[test]
    fn test_remove_ends() {
        let mut list = RecencyList::new();

        let first = list.push_newest("first".to_string());
        list.push_newest("middle".to_string());
        let last = list.push_newest("last".to_string());

        list.remove(last);
        list.remove(first);

        assert_eq!(keys(&list), vec!["middle"]);
        assert_eq!(list.iter().next(), Some("middle"));
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut list = RecencyList::new();

        let a = list.push_newest("a".to_string());
        list.push_newest("b".to_string());
        list.remove(a);

        let c = list.push_newest("c".to_string());

        assert_eq!(c, a);
        assert_eq!(keys(&list), vec!["b", "c"]);
    }

    #[test]
    fn test_clear() {
        let mut list = RecencyList::with_capacity(4);

        list.push_newest("a".to_string());
        list.push_newest("b".to_string());
        list.clear();

        assert!(list.is_empty());
        assert_eq!(keys(&list), Vec::<&str>::new());

        list.push_newest("c".to_string());
        assert_eq!(keys(&list), vec!["c"]);
    }
}
