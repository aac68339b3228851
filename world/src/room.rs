//! Room definitions and the master list a world loads rooms from.

use bryte_core::{Direction, EnemyKind, ExitState, PickupKind, TileCoord};
use serde::Deserialize;
use tracing::warn;

use crate::{
    interactives::{Door, Interactive, InteractiveSpec, Interactives},
    map::{Exit, Map, DEFAULT_BASE_LIGHT},
    WorldError,
};

/// Doorway placed in a room layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ExitSpec {
    /// Tile the door occupies.
    pub location: TileCoord,
    /// Direction the doorway faces, pointing into the room.
    pub direction: Direction,
    /// Master-list index of the destination room.
    pub target_map_index: usize,
    /// Arrival tile in the destination room.
    pub target_tile: TileCoord,
    /// Initial door state.
    #[serde(default = "open_door")]
    pub state: ExitState,
}

fn open_door() -> ExitState {
    ExitState::Open
}

/// Interactive placed on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct InteractivePlacement {
    /// Tile the interactive occupies.
    pub tile: TileCoord,
    /// What to place.
    pub interactive: InteractiveSpec,
}

/// Enemy spawned whenever the room is entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct EnemySpawn {
    /// Species.
    pub kind: EnemyKind,
    /// Tile whose lower-left corner the enemy starts at.
    pub tile: TileCoord,
    /// Initial facing.
    #[serde(default = "default_facing")]
    pub facing: Direction,
    /// Item released on death.
    #[serde(default)]
    pub drop: PickupKind,
}

fn default_facing() -> Direction {
    Direction::Left
}

/// Everything about a room that the binary tile format does not carry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RoomLayout {
    /// Baseline light of every tile.
    pub base_light: u8,
    /// Doors out of the room.
    pub exits: Vec<ExitSpec>,
    /// Levers, blocks, torches and detectors.
    pub interactives: Vec<InteractivePlacement>,
    /// Enemies present on entry.
    pub enemies: Vec<EnemySpawn>,
}

impl Default for RoomLayout {
    fn default() -> Self {
        Self {
            base_light: DEFAULT_BASE_LIGHT,
            exits: Vec::new(),
            interactives: Vec::new(),
            enemies: Vec::new(),
        }
    }
}

/// Tile grid paired with its layout.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomDefinition {
    /// Decoded tile grid.
    pub map: Map,
    /// Exits, interactives and enemies.
    pub layout: RoomLayout,
}

impl RoomDefinition {
    /// Pairs a tile grid with its layout.
    #[must_use]
    pub fn new(map: Map, layout: RoomLayout) -> Self {
        Self { map, layout }
    }

    /// Checks that every placement lies on the grid.
    ///
    /// Exits leading to rooms missing from the master list only raise a
    /// warning; walking through them is refused at run time.
    pub fn validate(&self, index: usize, room_count: usize) -> Result<(), WorldError> {
        let check = |what: &'static str, tile: TileCoord| {
            if self.map.coordinates_valid(tile) {
                Ok(())
            } else {
                Err(WorldError::PlacementOutOfBounds {
                    room: index,
                    what,
                    x: tile.x,
                    y: tile.y,
                })
            }
        };

        for exit in &self.layout.exits {
            check("exit", exit.location)?;
            if exit.target_map_index >= room_count {
                warn!(
                    room = index,
                    target = exit.target_map_index,
                    "exit leads to a room missing from the master list"
                );
            }
        }

        let mut occupied: Vec<TileCoord> =
            self.layout.exits.iter().map(|exit| exit.location).collect();
        for placement in &self.layout.interactives {
            check("interactive", placement.tile)?;
            if occupied.contains(&placement.tile) {
                return Err(WorldError::OverlappingInteractives {
                    room: index,
                    x: placement.tile.x,
                    y: placement.tile.y,
                });
            }
            occupied.push(placement.tile);
        }

        for spawn in &self.layout.enemies {
            check("enemy spawn", spawn.tile)?;
        }
        Ok(())
    }

    /// Builds the live tile grid and interactive overlay for the room.
    #[must_use]
    pub fn instantiate(&self) -> (Map, Interactives) {
        let mut map = self.map.clone();
        map.set_base_light(self.layout.base_light);
        map.set_exits(
            self.layout
                .exits
                .iter()
                .map(|exit| Exit {
                    location: exit.location,
                    direction: exit.direction,
                    target_map_index: exit.target_map_index,
                    target_tile: exit.target_tile,
                })
                .collect(),
        );
        map.reset_light();

        let mut interactives = Interactives::new(map.width(), map.height());
        for exit in &self.layout.exits {
            if interactives.coordinates_valid(exit.location) {
                interactives.set(
                    exit.location,
                    Interactive::Exit(Door {
                        state: exit.state,
                        direction: exit.direction,
                        target_map_index: exit.target_map_index,
                        target_tile: exit.target_tile,
                    }),
                );
            }
        }
        for placement in &self.layout.interactives {
            if interactives.coordinates_valid(placement.tile) {
                interactives.set(placement.tile, Interactive::from(placement.interactive));
            }
        }

        (map, interactives)
    }
}

/// Ordered rooms a world can load.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MasterList {
    rooms: Vec<RoomDefinition>,
}

impl MasterList {
    /// Creates a master list from rooms in index order.
    #[must_use]
    pub fn new(rooms: Vec<RoomDefinition>) -> Self {
        Self { rooms }
    }

    /// Appends a room and returns its index.
    pub fn push(&mut self, room: RoomDefinition) -> usize {
        self.rooms.push(room);
        self.rooms.len() - 1
    }

    /// Room at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RoomDefinition> {
        self.rooms.get(index)
    }

    /// Number of rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Reports whether the list holds no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Validates every room against the list.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.rooms.is_empty() {
            return Err(WorldError::EmptyMasterList);
        }
        for (index, room) in self.rooms.iter().enumerate() {
            room.validate(index, self.rooms.len())?;
            for exit in &room.layout.exits {
                let Some(target) = self.rooms.get(exit.target_map_index) else {
                    continue;
                };
                if !target.map.coordinates_valid(exit.target_tile) {
                    return Err(WorldError::ExitTargetOutOfBounds {
                        room: index,
                        target: exit.target_map_index,
                        x: exit.target_tile.x,
                        y: exit.target_tile.y,
                    });
                }
            }
        }
        Ok(())
    }
}
