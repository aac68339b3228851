//! Per-tile overlay of levers, doors, blocks, torches and light detectors.

use std::time::Duration;

use bryte_core::{Direction, Event, ExitState, Stopwatch, TileCoord};
use serde::Deserialize;
use tracing::debug;

use crate::map::Map;

/// Light emitted by a lit torch at its own tile.
pub const TORCH_LIGHT: u8 = 96;
/// Time a lever refuses further activation after being thrown.
pub const LEVER_COOLDOWN: Duration = Duration::from_millis(300);

/// Door occupying an exit tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Door {
    /// Current door state.
    pub state: ExitState,
    /// Side of the room the door faces.
    pub direction: Direction,
    /// Master-list index of the room behind the door.
    pub target_map_index: usize,
    /// Arrival tile in the destination room.
    pub target_tile: TileCoord,
}

impl Door {
    fn activate(&mut self) {
        self.state = match self.state {
            ExitState::Locked | ExitState::Closed => ExitState::Open,
            ExitState::Open => ExitState::Closed,
        };
    }
}

/// Two-state switch that forwards activation to another tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lever {
    /// Whether the lever is thrown.
    pub on: bool,
    /// Countdown until the lever accepts another activation.
    pub cooldown: Stopwatch,
    /// Tile activated whenever the lever is thrown.
    pub target: Option<TileCoord>,
}

/// Fire source that lights nearby tiles and spreads to neighbouring torches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Torch {
    /// Whether the torch burns.
    pub on: bool,
}

/// Sensor that activates its target when the light on its tile crosses a threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LightDetector {
    /// Light level at or above which the detector counts as lit.
    pub threshold: u8,
    /// Whether the last light pass met the threshold.
    pub lit: bool,
    /// Light observed during the last light pass.
    pub light: u8,
    /// Tile activated on every change of the lit condition.
    pub target: Option<TileCoord>,
}

/// Object occupying a single tile of the overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interactive {
    /// Nothing on the tile.
    #[default]
    None,
    /// Door leading to another room.
    Exit(Door),
    /// Switch forwarding activation.
    Lever(Lever),
    /// Block that can be shoved one tile.
    PushableBlock,
    /// Fixed torch.
    Torch(Torch),
    /// Torch mounted on a pushable base.
    PushableTorch(Torch),
    /// Light sensor.
    LightDetector(LightDetector),
}

impl Interactive {
    /// Reports whether characters collide with the interactive.
    #[must_use]
    pub fn is_solid(&self) -> bool {
        match self {
            Self::Exit(door) => door.state != ExitState::Open,
            Self::PushableBlock | Self::PushableTorch(_) => true,
            Self::None | Self::Lever(_) | Self::Torch(_) | Self::LightDetector(_) => false,
        }
    }

    /// Reports whether projectiles stop on the interactive.
    #[must_use]
    pub fn blocks_projectiles(&self) -> bool {
        self.is_solid() || matches!(self, Self::Lever(_))
    }

    /// Reports whether a character can shove the interactive.
    #[must_use]
    pub fn is_pushable(&self) -> bool {
        matches!(self, Self::PushableBlock | Self::PushableTorch(_))
    }

    /// Burning torch carried by the interactive, if any.
    #[must_use]
    pub fn torch(&self) -> Option<&Torch> {
        match self {
            Self::Torch(torch) | Self::PushableTorch(torch) => Some(torch),
            _ => None,
        }
    }

    fn torch_mut(&mut self) -> Option<&mut Torch> {
        match self {
            Self::Torch(torch) | Self::PushableTorch(torch) => Some(torch),
            _ => None,
        }
    }
}

/// Layout description of an interactive, as written in room files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractiveSpec {
    /// Lever with an optional target tile.
    Lever {
        /// Tile the lever forwards activation to.
        #[serde(default)]
        target: Option<TileCoord>,
    },
    /// Pushable block.
    PushableBlock,
    /// Fixed torch.
    Torch {
        /// Whether the torch starts lit.
        #[serde(default)]
        on: bool,
    },
    /// Pushable torch.
    PushableTorch {
        /// Whether the torch starts lit.
        #[serde(default)]
        on: bool,
    },
    /// Light detector.
    LightDetector {
        /// Light level that counts as lit.
        threshold: u8,
        /// Tile activated on every change of the lit condition.
        #[serde(default)]
        target: Option<TileCoord>,
    },
}

impl From<InteractiveSpec> for Interactive {
    fn from(spec: InteractiveSpec) -> Self {
        match spec {
            InteractiveSpec::Lever { target } => Interactive::Lever(Lever {
                target,
                ..Lever::default()
            }),
            InteractiveSpec::PushableBlock => Interactive::PushableBlock,
            InteractiveSpec::Torch { on } => Interactive::Torch(Torch { on }),
            InteractiveSpec::PushableTorch { on } => Interactive::PushableTorch(Torch { on }),
            InteractiveSpec::LightDetector { threshold, target } => {
                Interactive::LightDetector(LightDetector {
                    threshold,
                    target,
                    ..LightDetector::default()
                })
            }
        }
    }
}

/// Grid of interactives parallel to the room map.
#[derive(Clone, Debug, PartialEq)]
pub struct Interactives {
    width: u32,
    height: u32,
    cells: Vec<Interactive>,
}

impl Interactives {
    /// Creates an empty overlay of the provided dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Interactive::None; width as usize * height as usize],
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the coordinate lies inside the overlay.
    #[must_use]
    pub fn coordinates_valid(&self, tile: TileCoord) -> bool {
        tile.x < self.width && tile.y < self.height
    }

    fn index(&self, tile: TileCoord) -> usize {
        assert!(
            self.coordinates_valid(tile),
            "interactive tile ({}, {}) outside {}x{} overlay",
            tile.x,
            tile.y,
            self.width,
            self.height
        );
        tile.y as usize * self.width as usize + tile.x as usize
    }

    /// Interactive on the tile.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the overlay.
    #[must_use]
    pub fn get_from_tile(&self, tile: TileCoord) -> &Interactive {
        &self.cells[self.index(tile)]
    }

    /// Mutable variant of [`Interactives::get_from_tile`].
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the overlay.
    pub fn get_from_tile_mut(&mut self, tile: TileCoord) -> &mut Interactive {
        let index = self.index(tile);
        &mut self.cells[index]
    }

    /// Checked lookup for coordinates derived from world positions.
    #[must_use]
    pub fn get(&self, tile: TileCoord) -> Option<&Interactive> {
        self.coordinates_valid(tile).then(|| self.get_from_tile(tile))
    }

    /// Places an interactive, replacing whatever occupied the tile.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the overlay.
    pub fn set(&mut self, tile: TileCoord, interactive: Interactive) {
        *self.get_from_tile_mut(tile) = interactive;
    }

    /// Solidity of the tile's interactive. Tiles off the overlay are not solid.
    #[must_use]
    pub fn is_solid(&self, tile: TileCoord) -> bool {
        self.get(tile).is_some_and(Interactive::is_solid)
    }

    /// Reports whether the tile holds something a character can shove.
    #[must_use]
    pub fn is_pushable(&self, tile: TileCoord) -> bool {
        self.get(tile).is_some_and(Interactive::is_pushable)
    }

    /// Tiles and interactives in row-major order, skipping empty tiles.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &Interactive)> {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, interactive)| **interactive != Interactive::None)
            .map(move |(index, interactive)| {
                let index = index as u32;
                (TileCoord::new(index % width, index / width), interactive)
            })
    }

    /// Activates the interactive on the tile, following lever chains.
    ///
    /// Every tile reacts at most once per call, so cyclic lever wiring terminates.
    pub fn activate(&mut self, tile: TileCoord, map: &mut Map, out_events: &mut Vec<Event>) {
        let mut visited = Vec::new();
        self.activate_chain(tile, false, map, &mut visited, out_events);
    }

    /// Player activation: locked doors open only by spending a key.
    pub fn player_activate(
        &mut self,
        tile: TileCoord,
        key_count: &mut u8,
        map: &mut Map,
        out_events: &mut Vec<Event>,
    ) {
        let Some(interactive) = self.get(tile).copied() else {
            return;
        };

        match interactive {
            Interactive::Exit(door) => {
                if door.state == ExitState::Locked && *key_count > 0 {
                    debug!(x = tile.x, y = tile.y, "unlocking door");
                    *key_count -= 1;
                    self.activate(tile, map, out_events);
                    out_events.push(Event::ExitUnlocked { tile });
                }
            }
            _ => {
                debug!(x = tile.x, y = tile.y, "activating tile");
                self.activate(tile, map, out_events);
            }
        }
    }

    /// A forwarded activation landing on an empty tile toggles the map solidity there.
    fn activate_chain(
        &mut self,
        tile: TileCoord,
        forwarded: bool,
        map: &mut Map,
        visited: &mut Vec<TileCoord>,
        out_events: &mut Vec<Event>,
    ) {
        if !self.coordinates_valid(tile) || visited.contains(&tile) {
            return;
        }
        visited.push(tile);

        let mut forward = None;
        match self.get_from_tile_mut(tile) {
            Interactive::None => {
                if forwarded && map.coordinates_valid(tile) {
                    let solid = !map.get_coordinate_solid(tile);
                    map.set_coordinate_solid(tile, solid);
                    out_events.push(Event::TileSolidityToggled { tile, solid });
                }
                return;
            }
            Interactive::Exit(door) => door.activate(),
            Interactive::Lever(lever) => {
                if !lever.cooldown.expired() {
                    return;
                }
                lever.on = !lever.on;
                lever.cooldown.reset(LEVER_COOLDOWN);
                forward = lever.target;
            }
            Interactive::Torch(torch) | Interactive::PushableTorch(torch) => {
                torch.on = !torch.on;
                if torch.on {
                    out_events.push(Event::TorchLit { tile });
                }
            }
            Interactive::PushableBlock | Interactive::LightDetector(_) => return,
        }
        out_events.push(Event::InteractiveActivated { tile });

        if let Some(target) = forward {
            self.activate_chain(target, true, map, visited, out_events);
        }
    }

    /// Shoves the pushable interactive on `tile` one tile along `direction`.
    ///
    /// The move is all-or-nothing: the destination must lie on the grid, be
    /// free of solid tiles and interactives, and not be occupied by a character.
    pub fn push<F>(
        &mut self,
        tile: TileCoord,
        direction: Direction,
        map: &Map,
        is_occupied: F,
        out_events: &mut Vec<Event>,
    ) -> bool
    where
        F: Fn(TileCoord) -> bool,
    {
        if !self.is_pushable(tile) {
            return false;
        }
        let Some(destination) = tile.step(direction) else {
            return false;
        };
        if !self.coordinates_valid(destination)
            || !map.coordinates_valid(destination)
            || map.get_coordinate_solid(destination)
            || *self.get_from_tile(destination) != Interactive::None
            || is_occupied(destination)
        {
            return false;
        }

        let moved = std::mem::take(self.get_from_tile_mut(tile));
        self.set(destination, moved);
        debug!(
            from_x = tile.x,
            from_y = tile.y,
            to_x = destination.x,
            to_y = destination.y,
            "pushed interactive"
        );
        out_events.push(Event::BlockPushed {
            from: tile,
            to: destination,
        });
        true
    }

    /// Advances lever cooldowns and spreads fire one tile from every lit torch.
    pub fn update(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let mut burning = Vec::new();
        for (index, interactive) in self.cells.iter_mut().enumerate() {
            match interactive {
                Interactive::Lever(lever) => lever.cooldown.tick(dt),
                Interactive::Torch(torch) | Interactive::PushableTorch(torch) if torch.on => {
                    burning.push(index);
                }
                _ => {}
            }
        }

        let width = self.width.max(1);
        for index in burning {
            let index = index as u32;
            let source = TileCoord::new(index % width, index / width);
            for direction in Direction::ALL {
                let Some(neighbour) = source.step(direction) else {
                    continue;
                };
                if !self.coordinates_valid(neighbour) {
                    continue;
                }
                if let Some(torch) = self.get_from_tile_mut(neighbour).torch_mut() {
                    if !torch.on {
                        torch.on = true;
                        out_events.push(Event::TorchLit { tile: neighbour });
                    }
                }
            }
        }
    }

    /// Adds the light of every burning torch to the map.
    pub fn contribute_light(&self, map: &mut Map) {
        for (tile, interactive) in self.iter() {
            if interactive.torch().is_some_and(|torch| torch.on) {
                map.illuminate(tile, TORCH_LIGHT);
            }
        }
    }

    /// Hands the tile its light from the current frame's light pass.
    ///
    /// Detectors whose lit condition changes activate their target.
    pub fn light(&mut self, tile: TileCoord, value: u8, map: &mut Map, out_events: &mut Vec<Event>) {
        if !self.coordinates_valid(tile) {
            return;
        }
        let Interactive::LightDetector(detector) = self.get_from_tile_mut(tile) else {
            return;
        };

        detector.light = value;
        let lit = value >= detector.threshold;
        if lit == detector.lit {
            return;
        }
        detector.lit = lit;
        let target = detector.target;

        out_events.push(Event::DetectorChanged { tile, lit });
        if let Some(target) = target {
            let mut visited = vec![tile];
            self.activate_chain(target, true, map, &mut visited, out_events);
        }
    }

    /// Writes the map's light into every detector.
    pub fn absorb_light(&mut self, map: &mut Map, out_events: &mut Vec<Event>) {
        let detectors: Vec<TileCoord> = self
            .iter()
            .filter(|(_, interactive)| matches!(interactive, Interactive::LightDetector(_)))
            .map(|(tile, _)| tile)
            .collect();
        for tile in detectors {
            if map.coordinates_valid(tile) {
                let value = map.get_coordinate_light(tile);
                self.light(tile, value, map, out_events);
            }
        }
    }
}
