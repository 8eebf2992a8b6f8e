#![forbid(unsafe_code)]

//! Selection state: click toggles and lasso membership.
//!
//! [`SelectionManager`] owns the set of currently selected item ids.
//! Membership changes flow out through [`RenderSink::set_selected`], and
//! only on actual changes, so repeated lasso updates with the same
//! rectangle are silent.
//!
//! # Invariants
//!
//! 1. An id is in the set only while its item is live; a sequence rebuild
//!    clears the set ([`reset`](SelectionManager::reset)).
//! 2. [`update_lasso`](SelectionManager::update_lasso) recomputes membership
//!    for every live item from scratch each call: it is idempotent, and
//!    items that left the rectangle mid-gesture are deselected.

use std::collections::BTreeSet;

use crate::geometry::Rect;
use crate::host::{GeometryProvider, RenderSink};
use crate::item::{ItemId, Sequence};

/// Owns the set of selected item ids.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: BTreeSet<ItemId>,
}

impl SelectionManager {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of selected items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether `id` is selected.
    #[inline]
    #[must_use]
    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    /// The selected ids, ascending.
    #[inline]
    #[must_use]
    pub fn members(&self) -> &BTreeSet<ItemId> {
        &self.selected
    }

    /// Flip the selection state of one item. No effect on other members.
    ///
    /// Used for ctrl-modified clicks on an item.
    pub fn toggle_one<S: RenderSink>(&mut self, id: ItemId, sink: &mut S) {
        if self.selected.remove(&id) {
            sink.set_selected(id, false);
        } else {
            self.selected.insert(id);
            sink.set_selected(id, true);
        }
    }

    /// Empty the selection, notifying the sink for each removed member.
    pub fn clear_all<S: RenderSink>(&mut self, sink: &mut S) {
        for id in std::mem::take(&mut self.selected) {
            sink.set_selected(id, false);
        }
    }

    /// Clear the selection, then select exactly `id`.
    ///
    /// Used when a drag starts on an item that is not already part of a
    /// multi-item selection.
    pub fn select_only<S: RenderSink>(&mut self, id: ItemId, sink: &mut S) {
        self.clear_all(sink);
        self.selected.insert(id);
        sink.set_selected(id, true);
    }

    /// Drop all state without sink notifications.
    ///
    /// For sequence rebuilds, where the old items no longer exist and there
    /// is nothing left to unmark.
    pub fn reset(&mut self) {
        self.selected.clear();
    }

    /// Set membership for every live item to exactly "does its bounding
    /// rectangle intersect `rect`".
    ///
    /// Geometry is queried live from the host, never cached.
    pub fn update_lasso<H>(&mut self, rect: Rect, sequence: &Sequence, host: &mut H)
    where
        H: GeometryProvider + RenderSink,
    {
        for item in sequence.items() {
            let inside = host
                .bounding_rect(item.id)
                .is_some_and(|bounds| rect.intersects(&bounds));

            if inside {
                if self.selected.insert(item.id) {
                    host.set_selected(item.id, true);
                }
            } else if self.selected.remove(&item.id) {
                host.set_selected(item.id, false);
            }
        }
    }
}
