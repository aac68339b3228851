//! Items lying on the floor.

use bryte_core::{pixels_to_meters, PickupKind, Rect};
use glam::Vec2;

use crate::pool::Recyclable;

/// Edge length of a pickup in pixels.
pub const PICKUP_DIMENSION_IN_PIXELS: f32 = 8.0;
/// Health restored by a health pickup.
pub const HEALTH_PICKUP_AMOUNT: i32 = 5;

/// Item occupying a pickup slot. [`PickupKind::None`] marks a free slot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pickup {
    /// Type of item.
    pub kind: PickupKind,
    /// Lower-left corner of the item.
    pub position: Vec2,
}

impl Pickup {
    /// Creates an item at `position`.
    #[must_use]
    pub const fn new(kind: PickupKind, position: Vec2) -> Self {
        Self { kind, position }
    }

    /// Area the player has to touch to collect the item.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.position,
            Vec2::splat(pixels_to_meters(PICKUP_DIMENSION_IN_PIXELS)),
        )
    }
}

impl Recyclable for Pickup {
    fn is_free(&self) -> bool {
        self.kind == PickupKind::None
    }
}
