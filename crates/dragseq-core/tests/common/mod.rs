//! Shared fake host: items rendered as a single row of fixed-size cells
//! with empty space below, hit testing kept in sync with `set_order`.

use std::collections::BTreeSet;

use dragseq_core::{GeometryProvider, HitTest, ItemId, Point, Rect, RenderSink};

/// Width and height of one item cell.
pub const CELL: f32 = 10.0;

pub struct FakeHost {
    /// Visual order, updated by `set_order`.
    pub order: Vec<ItemId>,
    pub selected: BTreeSet<ItemId>,
    pub dragging: BTreeSet<ItemId>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            selected: BTreeSet::new(),
            dragging: BTreeSet::new(),
        }
    }
}

impl GeometryProvider for FakeHost {
    fn bounding_rect(&self, id: ItemId) -> Option<Rect> {
        let slot = self.order.iter().position(|&i| i == id)?;
        Some(Rect::new(slot as f32 * CELL, 0.0, CELL, CELL))
    }

    fn container_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.order.len() as f32 * CELL, 2.0 * CELL)
    }
}

impl HitTest for FakeHost {
    fn item_at(&self, point: Point) -> Option<ItemId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.bounding_rect(id).is_some_and(|r| r.contains(point)))
    }
}

impl RenderSink for FakeHost {
    fn set_order(&mut self, order: &[ItemId]) {
        self.order = order.to_vec();
    }

    fn set_selected(&mut self, id: ItemId, selected: bool) {
        if selected {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
    }

    fn set_dragging(&mut self, id: ItemId, dragging: bool) {
        if dragging {
            self.dragging.insert(id);
        } else {
            self.dragging.remove(&id);
        }
    }
}

/// Center of the cell at visual slot `slot`.
pub fn cell(slot: usize) -> Point {
    Point::new(slot as f32 * CELL + CELL / 2.0, CELL / 2.0)
}

/// A point in the empty space below the row of cells.
pub fn empty_space(x: f32) -> Point {
    Point::new(x, CELL + CELL / 2.0)
}
