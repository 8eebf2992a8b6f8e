#![forbid(unsafe_code)]

//! Items and the ordered sequence that owns them.
//!
//! # Invariants
//!
//! 1. The `position` values of live items form a contiguous permutation of
//!    `0..N-1`: no duplicates, no gaps. The reorder engine may violate this
//!    transiently mid-step but restores it before the step returns.
//! 2. Item ids are never reused while the item is live; a [`Sequence::rebuild`]
//!    destroys every old item and mints fresh ids.
//! 3. `items()` is always sorted by `position`.

use std::collections::HashMap;

use ahash::RandomState;

/// Hash map keyed by [`ItemId`], using the crate-wide fast hasher.
pub type PositionMap = HashMap<ItemId, usize, RandomState>;

/// Stable opaque identifier for one sequence item.
///
/// Assigned by the owning [`Sequence`] at creation time. The id carries no
/// ordering meaning; visual order lives in [`Item::position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u32);

impl ItemId {
    /// Construct an id from its raw value.
    ///
    /// Intended for test fixtures and embeddings that persist ids; ids used
    /// with a [`Sequence`] must have come from that sequence.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw value of this id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// One element of the reorderable sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Stable identifier.
    pub id: ItemId,
    /// Opaque payload; irrelevant to selection and reordering.
    pub content: String,
    /// Current 0-based rank in the visual order.
    pub position: usize,
}

/// The ordered collection of all live items.
///
/// Kept sorted by `position`. Replaced wholesale by [`rebuild`](Self::rebuild);
/// individual items are never inserted or removed.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    items: Vec<Item>,
    next_id: u32,
}

impl Sequence {
    /// Create an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy all current items and create fresh ones, positioned `0..N-1`
    /// in iteration order.
    pub fn rebuild<I, S>(&mut self, contents: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items.clear();
        for (position, content) in contents.into_iter().enumerate() {
            let id = ItemId(self.next_id);
            self.next_id += 1;
            self.items.push(Item {
                id,
                content: content.into(),
                position,
            });
        }
    }

    /// Rebuild with one item per character of `text`.
    pub fn rebuild_from_text(&mut self, text: &str) {
        self.rebuild(text.chars().map(String::from));
    }

    /// Number of live items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the sequence has no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All live items, sorted by position.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The current position of an item, if it is live.
    #[must_use]
    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.get(id).map(|item| item.position)
    }

    /// The id of the item at a given position, if any.
    #[must_use]
    pub fn id_at(&self, position: usize) -> Option<ItemId> {
        self.items
            .iter()
            .find(|item| item.position == position)
            .map(|item| item.id)
    }

    /// Item ids in position order.
    #[must_use]
    pub fn order(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Whether positions form a contiguous `0..N-1` permutation.
    #[must_use]
    pub fn is_contiguous_permutation(&self) -> bool {
        let mut seen = vec![false; self.items.len()];
        for item in &self.items {
            match seen.get_mut(item.position) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    /// Positions of every live item keyed by id.
    ///
    /// Snapshot helper for tests and the group-move precomputation.
    #[must_use]
    pub fn positions(&self) -> PositionMap {
        self.items
            .iter()
            .map(|item| (item.id, item.position))
            .collect()
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.items.iter_mut()
    }

    pub(crate) fn sort_by_position(&mut self) {
        self.items.sort_by_key(|item| item.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuild_from_text_positions_are_contiguous() {
        let mut seq = Sequence::new();
        seq.rebuild_from_text("abc");

        assert_eq!(seq.len(), 3);
        assert!(seq.is_contiguous_permutation());
        let contents: Vec<&str> = seq.items().iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, ["a", "b", "c"]);
        for (i, item) in seq.items().iter().enumerate() {
            assert_eq!(item.position, i);
        }
    }

    #[test]
    fn rebuild_never_reuses_ids() {
        let mut seq = Sequence::new();
        seq.rebuild_from_text("ab");
        let first: Vec<ItemId> = seq.order();

        seq.rebuild_from_text("ab");
        for id in seq.order() {
            assert!(!first.contains(&id));
        }
    }

    #[test]
    fn position_of_and_id_at_agree() {
        let mut seq = Sequence::new();
        seq.rebuild_from_text("abcd");

        for item in seq.items() {
            assert_eq!(seq.position_of(item.id), Some(item.position));
            assert_eq!(seq.id_at(item.position), Some(item.id));
        }
        assert_eq!(seq.position_of(ItemId::from_raw(999)), None);
        assert_eq!(seq.id_at(4), None);
    }

    #[test]
    fn empty_sequence() {
        let seq = Sequence::new();
        assert!(seq.is_empty());
        assert!(seq.is_contiguous_permutation());
        assert!(seq.order().is_empty());
    }

    #[test]
    fn permutation_check_catches_duplicates_and_gaps() {
        let mut seq = Sequence::new();
        seq.rebuild_from_text("abc");

        for item in seq.items_mut() {
            if item.content == "b" {
                item.position = 0; // duplicate of a's slot
            }
        }
        assert!(!seq.is_contiguous_permutation());

        for item in seq.items_mut() {
            if item.content == "b" {
                item.position = 5; // gap
            }
        }
        assert!(!seq.is_contiguous_permutation());
    }
}
