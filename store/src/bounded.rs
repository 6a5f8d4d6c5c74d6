//! Append-only list with a fixed retention cap
//!
//! Chat history and the notification queue both grow by appending and
//! shed their oldest entries once full. [`BoundedList`] is the one place
//! that rule lives: every way of putting items into the list (push,
//! wholesale replace, deserialize) leaves at most `CAP` items, and always
//! the newest ones in their original relative order.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::VecDeque;

/// Ordered list holding at most `CAP` items, oldest evicted first
///
/// # Example
///
/// ```
/// use vibes_store::bounded::BoundedList;
///
/// let mut recent: BoundedList<u32, 3> = BoundedList::new();
/// for n in 1..=5 {
///     recent.push(n);
/// }
/// assert_eq!(recent.to_vec(), vec![3, 4, 5]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedList<T, const CAP: usize> {
    items: VecDeque<T>,
}

impl<T, const CAP: usize> BoundedList<T, CAP> {
    /// Maximum number of retained items
    pub const CAPACITY: usize = CAP;

    /// Create an empty list
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Build a list from `items`, keeping only the newest `CAP`
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        let mut list = Self {
            items: items.into(),
        };
        list.keep_last(CAP);
        list
    }

    /// Append an item, evicting the oldest if the list is full
    ///
    /// Returns the evicted item, if any.
    pub fn push(&mut self, item: T) -> Option<T> {
        self.items.push_back(item);
        if self.items.len() > CAP {
            self.items.pop_front()
        } else {
            None
        }
    }

    /// Replace the whole contents, keeping only the newest `CAP` of `items`
    pub fn replace(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.clear();
        for item in items {
            self.push(item);
        }
    }

    /// Drop the oldest items until at most `n` remain
    ///
    /// Returns how many items were dropped.
    pub fn keep_last(&mut self, n: usize) -> usize {
        let n = n.min(CAP);
        let excess = self.items.len().saturating_sub(n);
        self.items.drain(..excess);
        excess
    }

    /// Keep only the items matching `keep`, preserving their order
    ///
    /// Returns how many items were dropped.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(keep);
        before - self.items.len()
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of items held
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest item
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.items.front()
    }

    /// Newest item
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// The newest `n` items, oldest first
    pub fn newest(&self, n: usize) -> impl Iterator<Item = &T> {
        self.items.iter().skip(self.items.len().saturating_sub(n))
    }

    /// Copy the items out, oldest first
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().cloned().collect()
    }
}

impl<T, const CAP: usize> Default for BoundedList<T, CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const CAP: usize> FromIterator<T> for BoundedList<T, CAP> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.replace(iter);
        list
    }
}

impl<'a, T, const CAP: usize> IntoIterator for &'a BoundedList<T, CAP> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize, const CAP: usize> Serialize for BoundedList<T, CAP> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

impl<'de, T: Deserialize<'de>, const CAP: usize> Deserialize<'de> for BoundedList<T, CAP> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from_vec)
    }
}
