#![forbid(unsafe_code)]

//! Gesture dispatch: routes pointer events to selection and reorder state.
//!
//! [`GestureDispatcher`] owns the [`SelectionManager`] and the
//! [`ReorderEngine`] and decides, on pointer-down, which gesture starts:
//!
//! - down on an item inside a multi-item selection → group drag of the
//!   whole selection, anchored at that item;
//! - down on any other item → that item becomes the sole selection and a
//!   single-item drag starts;
//! - down on empty space → the selection is cleared and a lasso starts.
//!
//! Pointer-moves feed exactly the one active gesture; pointer-up finalizes
//! it and pointer-leave terminates it the same way (applied positions and
//! selection are kept, never rolled back).
//!
//! # Invariants
//!
//! 1. At most one gesture (drag or lasso) is active at a time.
//! 2. Ctrl-modified presses never start a gesture; ctrl semantics live
//!    entirely on the discrete `Click` event (toggle one item).
//! 3. A drag whose pointer never crosses into another item's cell leaves
//!    the order untouched; the net effect is the selection change applied
//!    at pointer-down.
//!
//! # Failure Modes
//!
//! - A move that resolves to no item while a drag is active is skipped.
//! - The dispatcher never synthesizes `Click` events from `Up`; the
//!   platform decides what constitutes a discrete click and should not
//!   deliver one for a pointer-up that ended a lasso or a moved drag.

use crate::event::{Modifiers, PointerEvent};
use crate::geometry::{Point, Rect};
use crate::host::{GeometryProvider, HitTest, RenderSink};
use crate::item::Sequence;
use crate::reorder::ReorderEngine;
use crate::selection::SelectionManager;

/// Which gesture is currently consuming pointer-moves.
#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureState {
    Idle,
    Drag,
    Lasso {
        /// Pointer position at gesture start, fixed for the whole gesture.
        origin: Point,
    },
}

/// Platform-neutral entry point: feeds pointer events to the selection
/// manager and the reorder engine.
#[derive(Debug)]
pub struct GestureDispatcher {
    selection: SelectionManager,
    engine: ReorderEngine,
    gesture: GestureState,
}

impl Default for GestureDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureDispatcher {
    /// Create a dispatcher with an empty sequence and selection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            selection: SelectionManager::new(),
            engine: ReorderEngine::new(),
            gesture: GestureState::Idle,
        }
    }

    /// The selection state.
    #[inline]
    #[must_use]
    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// The reorder engine.
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &ReorderEngine {
        &self.engine
    }

    /// The current sequence.
    #[inline]
    #[must_use]
    pub fn sequence(&self) -> &Sequence {
        self.engine.sequence()
    }

    /// Whether a drag gesture is in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.engine.is_dragging()
    }

    /// Replace the whole sequence with one item per character of `text`.
    ///
    /// Destroys all current items and the selection, terminates any active
    /// gesture, and pushes the fresh order to the sink.
    pub fn apply_text<H: RenderSink>(&mut self, text: &str, host: &mut H) {
        self.engine.rebuild_from_text(text);
        self.selection.reset();
        self.gesture = GestureState::Idle;
        host.set_order(&self.engine.sequence().order());

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "dispatcher.apply_text", items = self.sequence().len());
    }

    /// Process one pointer event.
    ///
    /// Events must be delivered serially; each call runs to completion and
    /// restores the position-permutation invariant before returning.
    pub fn process<H>(&mut self, event: &PointerEvent, host: &mut H)
    where
        H: GeometryProvider + HitTest + RenderSink,
    {
        match *event {
            PointerEvent::Down { point, modifiers } => {
                self.on_pointer_down(point, modifiers, host);
            }
            PointerEvent::Move { point } => self.on_pointer_move(point, host),
            PointerEvent::Up => self.on_pointer_up(host),
            PointerEvent::Leave => self.on_pointer_leave(host),
            PointerEvent::Click { point, modifiers } => self.on_click(point, modifiers, host),
        }
    }
}

impl GestureDispatcher {
    fn on_pointer_down<H>(&mut self, point: Point, modifiers: Modifiers, host: &mut H)
    where
        H: GeometryProvider + HitTest + RenderSink,
    {
        // Ctrl-modified presses belong to the click path (toggle); they
        // must not rewrite the selection or start a gesture.
        if modifiers.ctrl() {
            return;
        }

        match host.item_at(point) {
            Some(anchor) => {
                let started = if self.selection.is_selected(anchor) && self.selection.len() > 1 {
                    let members = self.selection.members().clone();
                    self.engine.begin_group(anchor, &members, host)
                } else {
                    self.selection.select_only(anchor, host);
                    self.engine.begin_single(anchor, host)
                };
                if started {
                    self.gesture = GestureState::Drag;
                }
            }
            None => {
                self.selection.clear_all(host);
                self.gesture = GestureState::Lasso { origin: point };

                #[cfg(feature = "tracing")]
                tracing::debug!(message = "dispatcher.lasso_start", x = point.x, y = point.y);
            }
        }
    }

    fn on_pointer_move<H>(&mut self, point: Point, host: &mut H)
    where
        H: GeometryProvider + HitTest + RenderSink,
    {
        match self.gesture {
            GestureState::Idle => {}
            GestureState::Drag => {
                if let Some(target) = host.item_at(point) {
                    self.engine.drag_to(target, host);
                }
            }
            GestureState::Lasso { origin } => {
                let rect = Rect::from_corners(origin, point).intersection(&host.container_rect());
                self.selection.update_lasso(rect, self.engine.sequence(), host);
            }
        }
    }

    fn on_pointer_up<H: RenderSink>(&mut self, host: &mut H) {
        if self.gesture == GestureState::Drag {
            self.engine.finish(host);
        }
        self.gesture = GestureState::Idle;
    }

    fn on_pointer_leave<H: RenderSink>(&mut self, host: &mut H) {
        if self.gesture == GestureState::Drag {
            self.engine.cancel(host);

            #[cfg(feature = "tracing")]
            tracing::debug!(message = "dispatcher.drag_interrupted");
        }
        self.gesture = GestureState::Idle;
    }

    fn on_click<H>(&mut self, point: Point, modifiers: Modifiers, host: &mut H)
    where
        H: HitTest + RenderSink,
    {
        match host.item_at(point) {
            Some(id) => {
                if modifiers.ctrl() {
                    self.selection.toggle_one(id, host);
                }
                // Plain clicks on an item are a no-op here: the selection
                // was already applied on pointer-down.
            }
            None => {
                if !modifiers.ctrl() {
                    self.selection.clear_all(host);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemId;

    const CELL: f32 = 10.0;

    /// Host with items laid out as a single row of `CELL`-sized boxes and
    /// empty space below them. Hit testing always reflects the last
    /// `set_order` notification.
    struct RowHost {
        order: Vec<ItemId>,
        selected: Vec<ItemId>,
        dragging: Vec<ItemId>,
    }

    impl RowHost {
        fn new() -> Self {
            Self {
                order: Vec::new(),
                selected: Vec::new(),
                dragging: Vec::new(),
            }
        }
    }

    impl GeometryProvider for RowHost {
        fn bounding_rect(&self, id: ItemId) -> Option<Rect> {
            let slot = self.order.iter().position(|&i| i == id)?;
            Some(Rect::new(slot as f32 * CELL, 0.0, CELL, CELL))
        }

        fn container_rect(&self) -> Rect {
            Rect::new(0.0, 0.0, self.order.len() as f32 * CELL, 2.0 * CELL)
        }
    }

    impl HitTest for RowHost {
        fn item_at(&self, point: Point) -> Option<ItemId> {
            self.order
                .iter()
                .copied()
                .find(|&id| self.bounding_rect(id).is_some_and(|r| r.contains(point)))
        }
    }

    impl RenderSink for RowHost {
        fn set_order(&mut self, order: &[ItemId]) {
            self.order = order.to_vec();
        }

        fn set_selected(&mut self, id: ItemId, selected: bool) {
            if selected {
                self.selected.push(id);
            } else {
                self.selected.retain(|&i| i != id);
            }
        }

        fn set_dragging(&mut self, id: ItemId, dragging: bool) {
            if dragging {
                self.dragging.push(id);
            } else {
                self.dragging.retain(|&i| i != id);
            }
        }
    }

    /// Center of the cell at visual slot `slot`.
    fn cell(slot: usize) -> Point {
        Point::new(slot as f32 * CELL + CELL / 2.0, CELL / 2.0)
    }

    /// A point in the empty space below the row.
    fn empty_space(x: f32) -> Point {
        Point::new(x, CELL + CELL / 2.0)
    }

    fn setup(text: &str) -> (GestureDispatcher, RowHost) {
        let mut dispatcher = GestureDispatcher::new();
        let mut host = RowHost::new();
        dispatcher.apply_text(text, &mut host);
        (dispatcher, host)
    }

    fn contents(dispatcher: &GestureDispatcher) -> String {
        dispatcher
            .sequence()
            .items()
            .iter()
            .map(|item| item.content.as_str())
            .collect()
    }

    #[test]
    fn down_on_unselected_item_selects_exactly_it() {
        let (mut dispatcher, mut host) = setup("abc");
        let b = dispatcher.sequence().id_at(1).unwrap();

        dispatcher.process(&PointerEvent::down(cell(1)), &mut host);

        assert_eq!(dispatcher.selection().len(), 1);
        assert!(dispatcher.selection().is_selected(b));
        assert!(dispatcher.is_dragging());
        assert_eq!(host.dragging, [b]);
    }

    #[test]
    fn zero_distance_drag_changes_selection_only() {
        let (mut dispatcher, mut host) = setup("abc");

        dispatcher.process(&PointerEvent::down(cell(0)), &mut host);
        dispatcher.process(&PointerEvent::Up, &mut host);

        assert_eq!(contents(&dispatcher), "abc");
        assert_eq!(dispatcher.selection().len(), 1);
        assert!(!dispatcher.is_dragging());
        assert!(host.dragging.is_empty());
    }

    #[test]
    fn drag_across_cells_reorders() {
        let (mut dispatcher, mut host) = setup("abc");

        dispatcher.process(&PointerEvent::down(cell(0)), &mut host);
        dispatcher.process(&PointerEvent::moved(cell(1)), &mut host);
        dispatcher.process(&PointerEvent::moved(cell(2)), &mut host);
        dispatcher.process(&PointerEvent::Up, &mut host);

        assert_eq!(contents(&dispatcher), "bca");
        assert!(dispatcher.sequence().is_contiguous_permutation());
    }

    #[test]
    fn move_outside_any_cell_is_ignored_mid_drag() {
        let (mut dispatcher, mut host) = setup("abc");

        dispatcher.process(&PointerEvent::down(cell(0)), &mut host);
        dispatcher.process(&PointerEvent::moved(empty_space(5.0)), &mut host);

        assert_eq!(contents(&dispatcher), "abc");
        assert!(dispatcher.is_dragging());
    }

    #[test]
    fn leave_terminates_drag_keeping_positions() {
        let (mut dispatcher, mut host) = setup("abc");

        dispatcher.process(&PointerEvent::down(cell(0)), &mut host);
        dispatcher.process(&PointerEvent::moved(cell(1)), &mut host);
        dispatcher.process(&PointerEvent::Leave, &mut host);

        assert_eq!(contents(&dispatcher), "bac");
        assert!(!dispatcher.is_dragging());
        assert!(host.dragging.is_empty());

        // Further moves are ignored once the gesture ended.
        dispatcher.process(&PointerEvent::moved(cell(2)), &mut host);
        assert_eq!(contents(&dispatcher), "bac");
    }

    #[test]
    fn ctrl_down_starts_no_gesture() {
        let (mut dispatcher, mut host) = setup("abc");

        dispatcher.process(
            &PointerEvent::Down {
                point: cell(0),
                modifiers: Modifiers::CTRL,
            },
            &mut host,
        );

        assert!(!dispatcher.is_dragging());
        assert!(dispatcher.selection().is_empty());
    }

    #[test]
    fn ctrl_click_toggles_one_item() {
        let (mut dispatcher, mut host) = setup("abc");
        let a = dispatcher.sequence().id_at(0).unwrap();

        let ctrl_click = PointerEvent::Click {
            point: cell(0),
            modifiers: Modifiers::CTRL,
        };
        dispatcher.process(&ctrl_click, &mut host);
        assert!(dispatcher.selection().is_selected(a));

        dispatcher.process(&ctrl_click, &mut host);
        assert!(!dispatcher.selection().is_selected(a));
    }

    #[test]
    fn plain_click_on_empty_space_clears_selection() {
        let (mut dispatcher, mut host) = setup("abc");

        dispatcher.process(
            &PointerEvent::Click {
                point: cell(1),
                modifiers: Modifiers::CTRL,
            },
            &mut host,
        );
        assert_eq!(dispatcher.selection().len(), 1);

        dispatcher.process(&PointerEvent::click(empty_space(5.0)), &mut host);
        assert!(dispatcher.selection().is_empty());
        assert!(host.selected.is_empty());
    }

    #[test]
    fn plain_click_on_item_is_a_no_op() {
        let (mut dispatcher, mut host) = setup("abc");
        let a = dispatcher.sequence().id_at(0).unwrap();

        dispatcher.process(&PointerEvent::down(cell(0)), &mut host);
        dispatcher.process(&PointerEvent::Up, &mut host);
        dispatcher.process(&PointerEvent::click(cell(0)), &mut host);

        assert!(dispatcher.selection().is_selected(a));
    }

    #[test]
    fn lasso_selects_and_reshapes() {
        let (mut dispatcher, mut host) = setup("abcd");

        dispatcher.process(&PointerEvent::down(empty_space(12.0)), &mut host);
        dispatcher.process(&PointerEvent::moved(cell(2)), &mut host);

        let b = dispatcher.sequence().id_at(1).unwrap();
        let c = dispatcher.sequence().id_at(2).unwrap();
        assert!(dispatcher.selection().is_selected(b));
        assert!(dispatcher.selection().is_selected(c));
        assert_eq!(dispatcher.selection().len(), 2);

        // Shrink back towards the origin: c leaves the rectangle.
        dispatcher.process(&PointerEvent::moved(cell(1)), &mut host);
        assert!(dispatcher.selection().is_selected(b));
        assert_eq!(dispatcher.selection().len(), 1);

        dispatcher.process(&PointerEvent::Up, &mut host);
        assert_eq!(dispatcher.selection().len(), 1);
    }

    #[test]
    fn down_on_multi_selected_item_drags_the_group() {
        let (mut dispatcher, mut host) = setup("abcde");
        let b = dispatcher.sequence().id_at(1).unwrap();
        let c = dispatcher.sequence().id_at(2).unwrap();

        for slot in [1, 2] {
            dispatcher.process(
                &PointerEvent::Click {
                    point: cell(slot),
                    modifiers: Modifiers::CTRL,
                },
                &mut host,
            );
        }

        dispatcher.process(&PointerEvent::down(cell(2)), &mut host);
        assert_eq!(dispatcher.engine().drag_kind(), Some(crate::DragKind::Group));
        assert_eq!(host.dragging.len(), 2);

        dispatcher.process(&PointerEvent::moved(cell(3)), &mut host);
        dispatcher.process(&PointerEvent::Up, &mut host);

        assert_eq!(contents(&dispatcher), "adbce");
        // The selection survives a group drag.
        assert!(dispatcher.selection().is_selected(b));
        assert!(dispatcher.selection().is_selected(c));
        assert!(host.dragging.is_empty());
    }

    #[test]
    fn apply_text_resets_everything() {
        let (mut dispatcher, mut host) = setup("abc");

        dispatcher.process(&PointerEvent::down(cell(0)), &mut host);
        dispatcher.process(&PointerEvent::moved(cell(1)), &mut host);
        dispatcher.apply_text("xyz", &mut host);

        assert_eq!(contents(&dispatcher), "xyz");
        assert!(dispatcher.selection().is_empty());
        assert!(!dispatcher.is_dragging());
        assert_eq!(host.order.len(), 3);
    }
}
