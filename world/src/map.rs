//! Tile grid of the current room: visuals, solidity, light and exits.

use bryte_core::{Direction, TileCoord};
use glam::Vec2;
use serde::Deserialize;

/// Brightest value a tile can accumulate.
pub const MAX_LIGHT: u8 = u8::MAX;
/// Light removed per tile of Manhattan distance from an emitter.
pub const LIGHT_DECAY: u8 = 24;
/// Farthest distance, in tiles, an emitter reaches.
pub const LIGHT_RADIUS: u32 = 4;
/// Light a room starts from when its layout does not say otherwise.
pub const DEFAULT_BASE_LIGHT: u8 = 32;

/// One cell of the room grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tile {
    /// Visual identifier used by the renderer.
    pub value: u8,
    /// Whether characters and projectiles collide with the tile.
    pub solid: bool,
    /// Light accumulated this frame.
    pub light: u8,
}

/// Doorway to another room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Exit {
    /// Tile the exit occupies in this room.
    pub location: TileCoord,
    /// Side of the room the exit faces.
    pub direction: Direction,
    /// Master-list index of the destination room.
    pub target_map_index: usize,
    /// Tile the player arrives on in the destination room.
    pub target_tile: TileCoord,
}

/// Tile grid of the current room.
#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    width: u8,
    height: u8,
    tiles: Vec<Tile>,
    exits: Vec<Exit>,
    base_light: u8,
}

impl Map {
    /// Creates an empty, non-solid grid of the provided dimensions.
    #[must_use]
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::default(); usize::from(width) * usize::from(height)],
            exits: Vec::new(),
            base_light: DEFAULT_BASE_LIGHT,
        }
    }

    pub(crate) fn from_tiles(width: u8, height: u8, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), usize::from(width) * usize::from(height));
        Self {
            width,
            height,
            tiles,
            exits: Vec::new(),
            base_light: DEFAULT_BASE_LIGHT,
        }
    }

    /// Number of tile columns.
    #[must_use]
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Number of tile rows.
    #[must_use]
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Row-major view of every tile, for renderers.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub fn coordinates_valid(&self, tile: TileCoord) -> bool {
        tile.x < self.width() && tile.y < self.height()
    }

    fn index(&self, tile: TileCoord) -> usize {
        assert!(
            self.coordinates_valid(tile),
            "tile ({}, {}) outside {}x{} map",
            tile.x,
            tile.y,
            self.width,
            self.height
        );
        tile.y as usize * usize::from(self.width) + tile.x as usize
    }

    /// Visual identifier of the tile.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the grid.
    #[must_use]
    pub fn get_coordinate_value(&self, tile: TileCoord) -> u8 {
        self.tiles[self.index(tile)].value
    }

    /// Overwrites the visual identifier of the tile.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the grid.
    pub fn set_coordinate_value(&mut self, tile: TileCoord, value: u8) {
        let index = self.index(tile);
        self.tiles[index].value = value;
    }

    /// Solidity of the tile.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the grid.
    #[must_use]
    pub fn get_coordinate_solid(&self, tile: TileCoord) -> bool {
        self.tiles[self.index(tile)].solid
    }

    /// Overwrites the solidity of the tile.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the grid.
    pub fn set_coordinate_solid(&mut self, tile: TileCoord, solid: bool) {
        let index = self.index(tile);
        self.tiles[index].solid = solid;
    }

    /// Light accumulated on the tile this frame.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the grid.
    #[must_use]
    pub fn get_coordinate_light(&self, tile: TileCoord) -> u8 {
        self.tiles[self.index(tile)].light
    }

    /// Tile containing the world position, if it lies on the grid.
    #[must_use]
    pub fn position_to_tile(&self, position: Vec2) -> Option<TileCoord> {
        TileCoord::containing(position).filter(|tile| self.coordinates_valid(*tile))
    }

    /// Reports whether the point lies on a solid tile. Points off the grid are solid.
    #[must_use]
    pub fn is_position_solid(&self, position: Vec2) -> bool {
        self.position_to_tile(position)
            .map_or(true, |tile| self.get_coordinate_solid(tile))
    }

    /// Light every tile returns to before emitters contribute.
    #[must_use]
    pub const fn base_light(&self) -> u8 {
        self.base_light
    }

    /// Changes the baseline light of the room.
    pub fn set_base_light(&mut self, base_light: u8) {
        self.base_light = base_light;
    }

    /// Clears every tile back to the room's baseline light.
    pub fn reset_light(&mut self) {
        let base = self.base_light;
        for tile in &mut self.tiles {
            tile.light = base;
        }
    }

    /// Adds light around `center`, fading by [`LIGHT_DECAY`] per tile of distance.
    pub fn illuminate(&mut self, center: TileCoord, value: u8) {
        if !self.coordinates_valid(center) {
            return;
        }

        let min_x = center.x.saturating_sub(LIGHT_RADIUS);
        let min_y = center.y.saturating_sub(LIGHT_RADIUS);
        let max_x = (center.x + LIGHT_RADIUS).min(self.width().saturating_sub(1));
        let max_y = (center.y + LIGHT_RADIUS).min(self.height().saturating_sub(1));

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let tile = TileCoord::new(x, y);
                let distance = center.manhattan_distance(tile);
                if distance > LIGHT_RADIUS {
                    continue;
                }
                let falloff = u8::try_from(distance)
                    .unwrap_or(u8::MAX)
                    .saturating_mul(LIGHT_DECAY);
                let contribution = value.saturating_sub(falloff);
                if contribution == 0 {
                    continue;
                }
                let index = self.index(tile);
                let light = &mut self.tiles[index].light;
                *light = light.saturating_add(contribution).min(MAX_LIGHT);
            }
        }
    }

    /// Exits leading out of the room.
    #[must_use]
    pub fn exits(&self) -> &[Exit] {
        &self.exits
    }

    /// Replaces the room's exit list.
    pub fn set_exits(&mut self, exits: Vec<Exit>) {
        self.exits = exits;
    }

    /// Exit located on the tile under the point, if any.
    #[must_use]
    pub fn check_position_exit(&self, position: Vec2) -> Option<&Exit> {
        let tile = TileCoord::containing(position)?;
        self.exits.iter().find(|exit| exit.location == tile)
    }
}
