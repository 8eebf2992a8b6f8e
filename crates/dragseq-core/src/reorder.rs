#![forbid(unsafe_code)]

//! Position reconciliation for single-item and group drags.
//!
//! [`ReorderEngine`] owns the canonical [`Sequence`] and recomputes item
//! positions while a drag is in progress.
//!
//! # State Machine
//!
//! `Idle → SingleDrag → Idle` or `Idle → GroupDrag → Idle`. A drag is
//! entered by [`begin_single`](ReorderEngine::begin_single) /
//! [`begin_group`](ReorderEngine::begin_group) and left by
//! [`finish`](ReorderEngine::finish) or [`cancel`](ReorderEngine::cancel).
//! Cancel keeps the last applied positions; there is no rollback.
//!
//! # Invariants
//!
//! 1. A single-item move is a single-slot rotation: every item strictly
//!    between the old and new anchor position shifts one slot toward the
//!    vacated end, so the relative order of all untouched items is
//!    preserved and positions stay a contiguous permutation.
//! 2. A rejected move (out-of-range target, group pushed past either end)
//!    changes nothing: moves are applied whole or not at all.
//! 3. Group member offsets are fixed at drag start and never recomputed
//!    mid-gesture.
//!
//! # Failure Modes
//!
//! - The group move shifts the non-member band by exactly `members.len()`
//!   regardless of how the member offsets are distributed. When the offsets
//!   are not a contiguous run ending at the anchor on the travel side, the
//!   recomputed positions can collide or skip slots. This matches the
//!   long-standing behavior embeddings depend on; it is documented here
//!   rather than patched.

use std::collections::{BTreeSet, HashMap};

use ahash::RandomState;

use crate::host::RenderSink;
use crate::item::{ItemId, PositionMap, Sequence};

/// Whether a drag moves one item or an anchored group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    /// One item follows the pointer.
    Single,
    /// The whole selection follows the anchor at fixed offsets.
    Group,
}

/// Transient per-gesture drag state.
#[derive(Debug, Clone)]
struct DragContext {
    kind: DragKind,
    anchor: ItemId,
    members: BTreeSet<ItemId>,
    /// Signed position delta of each member relative to the anchor,
    /// captured at drag start.
    offsets: HashMap<ItemId, isize, RandomState>,
    /// Most recently applied target position for the anchor.
    last_anchor_target: usize,
}

/// Owns the sequence and applies drag moves to it.
#[derive(Debug, Default)]
pub struct ReorderEngine {
    sequence: Sequence,
    drag: Option<DragContext>,
}

impl ReorderEngine {
    /// Create an engine with an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The owned sequence.
    #[inline]
    #[must_use]
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Whether a drag is in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The kind of the active drag, if any.
    #[must_use]
    pub fn drag_kind(&self) -> Option<DragKind> {
        self.drag.as_ref().map(|ctx| ctx.kind)
    }

    /// Replace the whole sequence, discarding any active drag.
    pub fn rebuild<I, S>(&mut self, contents: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drag = None;
        self.sequence.rebuild(contents);
    }

    /// Replace the sequence with one item per character of `text`.
    pub fn rebuild_from_text(&mut self, text: &str) {
        self.drag = None;
        self.sequence.rebuild_from_text(text);
    }

    /// Start a single-item drag anchored at `anchor`.
    ///
    /// Returns `false` (and stays Idle) if `anchor` is not live. Any drag
    /// already in progress is finished first.
    pub fn begin_single<S: RenderSink>(&mut self, anchor: ItemId, sink: &mut S) -> bool {
        self.finish(sink);
        let Some(position) = self.sequence.position_of(anchor) else {
            return false;
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "drag.begin_single", anchor = anchor.raw(), position);

        sink.set_dragging(anchor, true);
        self.drag = Some(DragContext {
            kind: DragKind::Single,
            anchor,
            members: BTreeSet::from([anchor]),
            offsets: HashMap::from_iter([(anchor, 0)]),
            last_anchor_target: position,
        });
        true
    }

    /// Start a group drag of `members` anchored at `anchor`.
    ///
    /// Each member's offset from the anchor is captured now and stays fixed
    /// for the whole gesture. Returns `false` if the anchor is not live, is
    /// not a member, or any member is not live.
    pub fn begin_group<S: RenderSink>(
        &mut self,
        anchor: ItemId,
        members: &BTreeSet<ItemId>,
        sink: &mut S,
    ) -> bool {
        self.finish(sink);
        let Some(anchor_position) = self.sequence.position_of(anchor) else {
            return false;
        };
        if !members.contains(&anchor) {
            return false;
        }

        let mut offsets = HashMap::with_capacity_and_hasher(members.len(), RandomState::new());
        for &id in members {
            let Some(position) = self.sequence.position_of(id) else {
                return false;
            };
            offsets.insert(id, position as isize - anchor_position as isize);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "drag.begin_group",
            anchor = anchor.raw(),
            members = members.len()
        );

        for &id in members {
            sink.set_dragging(id, true);
        }
        self.drag = Some(DragContext {
            kind: DragKind::Group,
            anchor,
            members: members.clone(),
            offsets,
            last_anchor_target: anchor_position,
        });
        true
    }

    /// Apply a move step with `target` as the item now under the pointer.
    ///
    /// Ignored when Idle or when `target` is not live.
    pub fn drag_to<S: RenderSink>(&mut self, target: ItemId, sink: &mut S) {
        let Some(position) = self.sequence.position_of(target) else {
            return;
        };
        self.drag_to_position(position, sink);
    }

    /// Apply a move step with the anchor heading to `target` position.
    ///
    /// Ignored when Idle, when the target equals the last applied anchor
    /// target, or when the move would place any item outside `0..N`.
    pub fn drag_to_position<S: RenderSink>(&mut self, target: usize, sink: &mut S) {
        match self.drag_kind() {
            Some(DragKind::Single) => self.apply_single_move(target, sink),
            Some(DragKind::Group) => self.apply_group_move(target, sink),
            None => {}
        }
    }

    /// End the drag, keeping all applied positions.
    pub fn finish<S: RenderSink>(&mut self, sink: &mut S) {
        if let Some(ctx) = self.drag.take() {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "drag.finish", anchor = ctx.anchor.raw());
            for &id in &ctx.members {
                sink.set_dragging(id, false);
            }
        }
    }

    /// Terminate the drag after an interruption (pointer left the window).
    ///
    /// Identical to [`finish`](Self::finish): applied positions are kept,
    /// nothing is rolled back.
    pub fn cancel<S: RenderSink>(&mut self, sink: &mut S) {
        self.finish(sink);
    }
}

impl ReorderEngine {
    /// Single-slot rotation: the anchor lands on `target`, and every other
    /// item between the old and new anchor position shifts one slot toward
    /// the vacated end.
    fn apply_single_move<S: RenderSink>(&mut self, target: usize, sink: &mut S) {
        let Some(ctx) = self.drag.as_mut() else {
            return;
        };
        if target >= self.sequence.len() || target == ctx.last_anchor_target {
            return;
        }

        let last = ctx.last_anchor_target;
        let direction: isize = if target > last { 1 } else { -1 };
        let start = last.min(target);
        let end = last.max(target);

        for item in self.sequence.items_mut() {
            if item.id == ctx.anchor {
                item.position = target;
            } else if item.position >= start && item.position <= end {
                item.position = (item.position as isize - direction) as usize;
            }
        }
        ctx.last_anchor_target = target;

        #[cfg(feature = "tracing")]
        tracing::trace!(message = "drag.single_step", from = last, to = target);

        self.sequence.sort_by_position();
        sink.set_order(&self.sequence.order());
        debug_assert!(self.sequence.is_contiguous_permutation());
    }

    /// Band shift: non-members between the old and new anchor target move
    /// by `members.len()` opposite to the travel direction; members land at
    /// `target + offset`.
    ///
    /// All new positions are computed up front; if any would fall outside
    /// `0..N`, the whole step is skipped. Collisions between in-range
    /// positions are applied as computed (see module docs).
    fn apply_group_move<S: RenderSink>(&mut self, target: usize, sink: &mut S) {
        let Some(ctx) = self.drag.as_mut() else {
            return;
        };
        let len = self.sequence.len() as isize;
        if target as isize >= len || target == ctx.last_anchor_target {
            return;
        }

        let max_offset = ctx.offsets.values().copied().max().unwrap_or(0);
        let min_offset = ctx.offsets.values().copied().min().unwrap_or(0);
        let anchor_target = target as isize;
        // The group must not be pushed off either end of the sequence.
        if anchor_target + max_offset >= len || anchor_target + min_offset < 0 {
            #[cfg(feature = "tracing")]
            tracing::trace!(message = "drag.group_step_rejected", target);
            return;
        }

        let last = ctx.last_anchor_target;
        let size = ctx.members.len() as isize;
        let rightward = target > last;

        let mut new_positions: PositionMap =
            HashMap::with_capacity_and_hasher(self.sequence.len(), RandomState::new());
        for item in self.sequence.items() {
            let new_position = if let Some(offset) = ctx.offsets.get(&item.id) {
                anchor_target + offset
            } else {
                let position = item.position as isize;
                let in_band = if rightward {
                    item.position > last && item.position <= target
                } else {
                    item.position >= target && item.position < last
                };
                if !in_band {
                    position
                } else if rightward {
                    position - size
                } else {
                    position + size
                }
            };
            if new_position < 0 || new_position >= len {
                return;
            }
            new_positions.insert(item.id, new_position as usize);
        }

        for item in self.sequence.items_mut() {
            if let Some(&new_position) = new_positions.get(&item.id) {
                item.position = new_position;
            }
        }
        ctx.last_anchor_target = target;

        #[cfg(feature = "tracing")]
        tracing::trace!(message = "drag.group_step", from = last, to = target);

        self.sequence.sort_by_position();
        sink.set_order(&self.sequence.order());
    }
}
