//! Directions, rectangles, tile coordinates and unit conversions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of screen pixels that make up one world meter.
pub const PIXELS_PER_METER: f32 = 16.0;

/// Edge length of a single square tile measured in pixels.
pub const TILE_DIMENSION_IN_PIXELS: u32 = 16;

/// Edge length of a single square tile measured in meters.
pub const TILE_DIMENSION_IN_METERS: f32 = TILE_DIMENSION_IN_PIXELS as f32 / PIXELS_PER_METER;

/// Converts a pixel distance into meters.
#[must_use]
pub fn pixels_to_meters(pixels: f32) -> f32 {
    pixels / PIXELS_PER_METER
}

/// Converts a meter distance into pixels.
#[must_use]
pub fn meters_to_pixels(meters: f32) -> f32 {
    meters * PIXELS_PER_METER
}

/// Cardinal facing shared by characters, projectiles and exits.
///
/// The declaration order is load-bearing: lookup tables such as projectile
/// contact points are indexed by [`Direction::index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward decreasing x.
    Left,
    /// Toward increasing y.
    Up,
    /// Toward increasing x.
    Right,
    /// Toward decreasing y.
    Down,
}

impl Direction {
    /// Every direction in table order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// Position of the direction inside [`Direction::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Up => 1,
            Self::Right => 2,
            Self::Down => 3,
        }
    }

    /// Direction pointing the other way along the same axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
        }
    }

    /// Unit vector for the direction; `Up` points along positive y.
    #[must_use]
    pub fn unit_vector(self) -> Vec2 {
        match self {
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Up => Vec2::new(0.0, 1.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Down => Vec2::new(0.0, -1.0),
        }
    }

    /// Reports whether the direction lies on the x axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Axis-aligned rectangle in world meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    origin: Vec2,
    size: Vec2,
}

impl Rect {
    /// Creates a rectangle anchored at its lower-left corner.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Lower-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width and height of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Corner opposite to the origin.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// Geometric center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// The four corners, lower-left first, counter-clockwise.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        let max = self.max();
        [
            self.origin,
            Vec2::new(max.x, self.origin.y),
            max,
            Vec2::new(self.origin.x, max.y),
        ]
    }

    /// Reports whether two rectangles overlap. Touching edges do not count.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.origin.x < b_max.x
            && other.origin.x < a_max.x
            && self.origin.y < b_max.y
            && other.origin.y < a_max.y
    }

    /// Reports whether the point lies inside the rectangle (max edges exclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.origin.x && point.x < max.x && point.y >= self.origin.y && point.y < max.y
    }
}

/// Location of a single tile expressed as column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zero-based column.
    pub x: u32,
    /// Zero-based row.
    pub y: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Neighbouring tile in the given direction, or `None` when it would be negative.
    ///
    /// Upper bounds are not known here; callers validate against the grid.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::Left => self.x.checked_sub(1).map(|x| Self::new(x, self.y)),
            Direction::Right => self.x.checked_add(1).map(|x| Self::new(x, self.y)),
            Direction::Up => self.y.checked_add(1).map(|y| Self::new(self.x, y)),
            Direction::Down => self.y.checked_sub(1).map(|y| Self::new(self.x, y)),
        }
    }

    /// Manhattan distance between two tiles.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// World-space rectangle covered by the tile.
    #[must_use]
    pub fn bounds(self) -> Rect {
        Rect::new(
            Vec2::new(
                self.x as f32 * TILE_DIMENSION_IN_METERS,
                self.y as f32 * TILE_DIMENSION_IN_METERS,
            ),
            Vec2::splat(TILE_DIMENSION_IN_METERS),
        )
    }

    /// World-space center of the tile.
    #[must_use]
    pub fn center(self) -> Vec2 {
        self.bounds().center()
    }

    /// Converts a world position to the containing tile by truncating toward zero.
    ///
    /// Negative positions have no tile and yield `None`.
    #[must_use]
    pub fn containing(position: Vec2) -> Option<Self> {
        if position.x < 0.0 || position.y < 0.0 || !position.is_finite() {
            return None;
        }
        let x = (position.x / TILE_DIMENSION_IN_METERS) as u32;
        let y = (position.y / TILE_DIMENSION_IN_METERS) as u32;
        Some(Self::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn table_index_matches_declaration_order() {
        for (index, direction) in Direction::ALL.iter().enumerate() {
            assert_eq!(direction.index(), index);
        }
    }

    #[test]
    fn touching_rectangles_do_not_overlap() {
        let a = Rect::new(Vec2::ZERO, Vec2::ONE);
        let b = Rect::new(Vec2::new(1.0, 0.0), Vec2::ONE);
        let c = Rect::new(Vec2::new(0.5, 0.5), Vec2::ONE);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn containing_truncates_toward_zero() {
        let tile = TileCoord::containing(Vec2::new(2.99, 0.01)).expect("positive position");
        assert_eq!(tile, TileCoord::new(2, 0));
        assert!(TileCoord::containing(Vec2::new(-0.1, 3.0)).is_none());
    }

    #[test]
    fn step_refuses_negative_tiles() {
        assert!(TileCoord::new(0, 4).step(Direction::Left).is_none());
        assert!(TileCoord::new(4, 0).step(Direction::Down).is_none());
        assert_eq!(
            TileCoord::new(4, 0).step(Direction::Up),
            Some(TileCoord::new(4, 1))
        );
    }
}
