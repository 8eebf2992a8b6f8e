#![forbid(unsafe_code)]

//! Core: selection state and drag-reorder position reconciliation for a
//! linear sequence of items.
//!
//! # Role
//! `dragseq-core` is the algorithmic layer of a reorderable-sequence
//! widget. It owns which items are selected and what integer position each
//! item holds, and it keeps both consistent while the user clicks,
//! ctrl-clicks, lassos, and drags. It renders nothing and reads no
//! platform input directly.
//!
//! # Primary responsibilities
//! - **GestureDispatcher**: consumes [`PointerEvent`]s and activates the
//!   right gesture (single drag, group drag, or lasso).
//! - **SelectionManager**: click/ctrl-click toggles and rectangle-lasso
//!   membership.
//! - **ReorderEngine**: recomputes every item's position when one item or
//!   a selected group is dragged past others, preserving the relative
//!   order of everything not being dragged.
//!
//! # How it fits in a widget
//! The embedding implements three small traits ([`GeometryProvider`],
//! [`HitTest`], [`RenderSink`]) and forwards its native pointer events.
//! Everything the embedding must redraw arrives as `set_order` /
//! `set_selected` / `set_dragging` notifications.

pub mod dispatcher;
pub mod event;
pub mod geometry;
pub mod host;
pub mod item;
pub mod reorder;
pub mod selection;

pub use dispatcher::GestureDispatcher;
pub use event::{Modifiers, PointerEvent};
pub use geometry::{Point, Rect};
pub use host::{GeometryProvider, HitTest, RenderSink};
pub use item::{Item, ItemId, PositionMap, Sequence};
pub use reorder::{DragKind, ReorderEngine};
pub use selection::SelectionManager;
