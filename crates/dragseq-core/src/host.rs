#![forbid(unsafe_code)]

//! Boundary traits between the core and the embedding platform.
//!
//! The core never touches render handles, pixels, or the platform event
//! loop; it talks to the embedding exclusively through these three traits.
//!
//! # Design Principles
//!
//! - Identity crosses the boundary as [`ItemId`], never as a node or widget
//!   handle. The embedding converts its own handles at the call boundary.
//! - Geometry is queried live, never cached by the core: lasso updates must
//!   see the current render state.
//! - [`RenderSink`] calls are one-way notifications; the core never reads
//!   render state back.
//!
//! The dispatcher is generic over a single host value implementing all
//! three traits, which is the common shape for a widget embedding. Tests
//! implement them on a fake host with a synthetic row layout.

use crate::geometry::{Point, Rect};
use crate::item::ItemId;

/// Supplies live bounding rectangles for items and the container.
pub trait GeometryProvider {
    /// The bounding rectangle of an item in the shared coordinate space,
    /// or `None` if the item is not currently rendered.
    fn bounding_rect(&self, id: ItemId) -> Option<Rect>;

    /// The bounding rectangle of the container holding all items.
    ///
    /// The lasso rectangle is clipped to this.
    fn container_rect(&self) -> Rect;
}

/// Resolves a pointer position to the item under it.
pub trait HitTest {
    /// The item whose rendered box contains `point`, if any.
    fn item_at(&self, point: Point) -> Option<ItemId>;
}

/// Receives render-state notifications from the core.
pub trait RenderSink {
    /// The visual order changed; `order` lists every live item id by
    /// ascending position.
    fn set_order(&mut self, order: &[ItemId]);

    /// An item entered or left the selection.
    fn set_selected(&mut self, id: ItemId, selected: bool);

    /// An item started or stopped being dragged.
    fn set_dragging(&mut self, id: ItemId, dragging: bool);
}
