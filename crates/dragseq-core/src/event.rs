#![forbid(unsafe_code)]

//! Canonical pointer event types.
//!
//! The embedding platform translates its native input (DOM mouse events,
//! terminal mouse reports, ...) into these events and feeds them to the
//! [`GestureDispatcher`](crate::dispatcher::GestureDispatcher) one at a
//! time. All events derive `Clone` and `PartialEq` for use in tests.
//!
//! # Design Notes
//!
//! - Coordinates are carried as [`Point`]s in the shared widget space.
//! - Events carry raw pointer positions only; resolving a position to an
//!   item happens inside the dispatcher through the
//!   [`HitTest`](crate::host::HitTest) collaborator.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

use crate::geometry::Point;

/// A pointer event delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer button pressed down.
    Down {
        /// Pointer position.
        point: Point,
        /// Modifier keys held during the event.
        modifiers: Modifiers,
    },

    /// Pointer moved while a gesture may be in progress.
    Move {
        /// Pointer position.
        point: Point,
    },

    /// Pointer button released.
    Up,

    /// Pointer left the widget/window entirely.
    Leave,

    /// A discrete click (down and up without intervening drag).
    ///
    /// The platform decides when a down/up pair constitutes a click;
    /// the dispatcher never synthesizes clicks from `Up` events.
    Click {
        /// Pointer position.
        point: Point,
        /// Modifier keys held during the event.
        modifiers: Modifiers,
    },
}

impl PointerEvent {
    /// Create a `Down` event without modifiers.
    #[must_use]
    pub const fn down(point: Point) -> Self {
        Self::Down {
            point,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a `Move` event.
    #[must_use]
    pub const fn moved(point: Point) -> Self {
        Self::Move { point }
    }

    /// Create a `Click` event without modifiers.
    #[must_use]
    pub const fn click(point: Point) -> Self {
        Self::Click {
            point,
            modifiers: Modifiers::NONE,
        }
    }
}

bitflags! {
    /// Modifier keys that can be held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl Modifiers {
    /// Check if Ctrl is held.
    #[inline]
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.contains(Modifiers::CTRL)
    }
}
