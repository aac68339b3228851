#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Bryte.
//!
//! Adapters drive the world exclusively through [`apply`] and observe it
//! through the read-only functions in [`query`].

use std::mem;

use bryte_core::{
    Command, Direction, EnemyKind, Event, Handle, PickupKind, ProjectileKind, Random, TileCoord,
};
use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod character;
pub mod combat;
pub mod enemy;
pub mod interactives;
pub mod map;
pub mod persistence;
pub mod pickup;
pub mod player;
pub mod pool;
pub mod projectile;
pub mod room;
mod step;

use character::KnockbackPolicy;
use enemy::Enemy;
use interactives::Interactives;
use map::Map;
use pickup::Pickup;
use player::Player;
use pool::Pool;
use projectile::Projectile;
pub use room::{EnemySpawn, ExitSpec, InteractivePlacement, MasterList, RoomDefinition, RoomLayout};

/// Seed used when the configuration does not provide one.
pub const DEFAULT_SEED: u64 = 13371;
/// Default number of slots in each entity pool.
pub const DEFAULT_POOL_CAPACITY: usize = 32;

/// Failures that prevent a world from being built.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The master list holds no rooms.
    #[error("master list is empty")]
    EmptyMasterList,
    /// The configured start room does not exist.
    #[error("room {index} is not in the master list of {count} rooms")]
    UnknownRoom {
        /// Requested index.
        index: usize,
        /// Rooms available.
        count: usize,
    },
    /// A layout entry lies outside its room.
    #[error("{what} at ({x}, {y}) lies outside room {room}")]
    PlacementOutOfBounds {
        /// Room index.
        room: usize,
        /// Kind of placement.
        what: &'static str,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
    /// An exit lands the player outside its destination room.
    #[error("exit of room {room} arrives at ({x}, {y}), outside room {target}")]
    ExitTargetOutOfBounds {
        /// Room holding the exit.
        room: usize,
        /// Destination room index.
        target: usize,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
    /// Two layout entries claim the same tile.
    #[error("room {room} places two interactives on ({x}, {y})")]
    OverlappingInteractives {
        /// Room index.
        room: usize,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
    /// The player spawn tile lies outside a room the player spawns in.
    #[error("player spawn ({x}, {y}) lies outside room {room}")]
    SpawnOutOfBounds {
        /// Room index.
        room: usize,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
}

/// Tunables of a world instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed of the shared random generator.
    pub seed: u64,
    /// Master-list index of the first room.
    pub map_index: usize,
    /// Tile the player starts and respawns on.
    pub player_spawn: TileCoord,
    /// Enemy pool size.
    pub enemy_capacity: usize,
    /// Projectile pool size.
    pub projectile_capacity: usize,
    /// Pickup pool size.
    pub pickup_capacity: usize,
    /// Treatment of hits on blinking characters.
    pub knockback: KnockbackPolicy,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            map_index: 0,
            player_spawn: TileCoord::new(1, 1),
            enemy_capacity: DEFAULT_POOL_CAPACITY,
            projectile_capacity: DEFAULT_POOL_CAPACITY,
            pickup_capacity: DEFAULT_POOL_CAPACITY,
            knockback: KnockbackPolicy::default(),
        }
    }
}

/// Inputs latched between frames.
#[derive(Clone, Copy, Debug, Default)]
struct Intent {
    held: [bool; 4],
    attack: bool,
    activate: bool,
    fire: bool,
    bomb: bool,
    blocking: bool,
}

impl Intent {
    fn is_held(&self, direction: Direction) -> bool {
        self.held[direction.index()]
    }

    fn take_attack(&mut self) -> bool {
        mem::take(&mut self.attack)
    }

    fn take_activate(&mut self) -> bool {
        mem::take(&mut self.activate)
    }

    fn take_fire(&mut self) -> bool {
        mem::take(&mut self.fire)
    }

    fn take_bomb(&mut self) -> bool {
        mem::take(&mut self.bomb)
    }
}

/// Represents the authoritative Bryte world state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    master_list: MasterList,
    room_index: usize,
    map: Map,
    interactives: Interactives,
    player: Player,
    enemies: Pool<Enemy>,
    projectiles: Pool<Projectile>,
    pickups: Pool<Pickup>,
    random: Random,
    intent: Intent,
    enemy_think: bool,
    tick_index: u64,
}

impl World {
    /// Creates a world standing in the configured start room.
    pub fn new(config: WorldConfig, master_list: MasterList) -> Result<Self, WorldError> {
        master_list.validate()?;

        let count = master_list.len();
        let start = master_list
            .get(config.map_index)
            .ok_or(WorldError::UnknownRoom {
                index: config.map_index,
                count,
            })?;
        for (room, definition) in [(0, master_list.get(0)), (config.map_index, Some(start))] {
            if let Some(definition) = definition {
                if !definition.map.coordinates_valid(config.player_spawn) {
                    return Err(WorldError::SpawnOutOfBounds {
                        room,
                        x: config.player_spawn.x,
                        y: config.player_spawn.y,
                    });
                }
            }
        }
        let (map, interactives) = start.instantiate();

        let mut world = Self {
            player: Player::new(spawn_position(config.player_spawn)),
            enemies: Pool::with_capacity(config.enemy_capacity),
            projectiles: Pool::with_capacity(config.projectile_capacity),
            pickups: Pool::with_capacity(config.pickup_capacity),
            random: Random::seed(config.seed),
            room_index: config.map_index,
            intent: Intent::default(),
            enemy_think: true,
            tick_index: 0,
            map,
            interactives,
            master_list,
            config,
        };

        let mut events = Vec::new();
        world.spawn_room_enemies(&mut events);
        world.relight(&mut events);
        Ok(world)
    }

    /// Replaces the live room with a fresh copy of the room at `index`.
    ///
    /// Pickups, projectiles and enemies are cleared before the room's own
    /// enemies spawn. Returns `false` without touching anything if the index
    /// is not in the master list.
    fn enter_room(&mut self, index: usize, out_events: &mut Vec<Event>) -> bool {
        let Some(definition) = self.master_list.get(index) else {
            warn!(index, "room is not in the master list");
            out_events.push(Event::RoomLoadRejected { index });
            return false;
        };

        let (map, interactives) = definition.instantiate();
        self.map = map;
        self.interactives = interactives;
        self.room_index = index;

        self.pickups.clear();
        self.projectiles.clear();
        self.enemies.clear();
        self.spawn_room_enemies(out_events);

        info!(
            index,
            width = self.map.width(),
            height = self.map.height(),
            "entered room"
        );
        true
    }

    fn spawn_room_enemies(&mut self, out_events: &mut Vec<Event>) {
        let spawns = self
            .master_list
            .get(self.room_index)
            .map(|definition| definition.layout.enemies.clone())
            .unwrap_or_default();
        for spawn in spawns {
            let _ = self.spawn_enemy(
                spawn.kind,
                spawn_position(spawn.tile),
                spawn.facing,
                spawn.drop,
                out_events,
            );
        }
    }

    fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        position: Vec2,
        facing: Direction,
        drop: PickupKind,
        out_events: &mut Vec<Event>,
    ) -> Option<Handle> {
        match self.enemies.spawn(Enemy::new(kind, position, facing, drop)) {
            Some(enemy) => {
                debug!(kind = kind.name(), x = position.x, y = position.y, "spawned enemy");
                out_events.push(Event::EnemySpawned {
                    enemy,
                    kind,
                    position,
                });
                Some(enemy)
            }
            None => {
                warn!(
                    kind = kind.name(),
                    capacity = self.enemies.capacity(),
                    "enemy pool exhausted"
                );
                out_events.push(Event::EnemySpawnRejected { kind });
                None
            }
        }
    }

    fn spawn_projectile(
        &mut self,
        kind: ProjectileKind,
        position: Vec2,
        facing: Direction,
        out_events: &mut Vec<Event>,
    ) -> Option<Handle> {
        match self.projectiles.spawn(Projectile::new(kind, position, facing)) {
            Some(projectile) => {
                debug!(?kind, ?facing, x = position.x, y = position.y, "spawned projectile");
                out_events.push(Event::ProjectileSpawned {
                    projectile,
                    kind,
                    facing,
                });
                Some(projectile)
            }
            None => {
                warn!(?kind, capacity = self.projectiles.capacity(), "projectile pool exhausted");
                out_events.push(Event::ProjectileSpawnRejected { kind });
                None
            }
        }
    }

    fn spawn_pickup(&mut self, kind: PickupKind, position: Vec2, out_events: &mut Vec<Event>) {
        match self.pickups.spawn(Pickup::new(kind, position)) {
            Some(pickup) => {
                debug!(?kind, x = position.x, y = position.y, "spawned pickup");
                out_events.push(Event::PickupSpawned { pickup, kind });
            }
            None => {
                warn!(?kind, capacity = self.pickups.capacity(), "pickup pool exhausted");
                out_events.push(Event::PickupSpawnRejected { kind });
            }
        }
    }

    /// Recomputes the light field and feeds it to the detectors.
    fn relight(&mut self, out_events: &mut Vec<Event>) {
        self.map.reset_light();
        self.interactives.contribute_light(&mut self.map);
        self.interactives.absorb_light(&mut self.map, out_events);
    }
}

/// Lower-left corner of `tile` in world meters.
fn spawn_position(tile: TileCoord) -> Vec2 {
    tile.bounds().origin()
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            step::run_frame(world, dt, out_events);
        }
        Command::SetDirectionHeld { direction, held } => {
            world.intent.held[direction.index()] = held;
        }
        Command::TriggerAttack => world.intent.attack = true,
        Command::TriggerActivate => world.intent.activate = true,
        Command::TriggerFire => world.intent.fire = true,
        Command::TriggerBomb => world.intent.bomb = true,
        Command::SetBlocking { held } => world.intent.blocking = held,
        Command::SpawnEnemy {
            kind,
            position,
            facing,
            drop,
        } => {
            let _ = world.spawn_enemy(kind, position, facing, drop, out_events);
        }
        Command::GiveKey => {
            world.player.key_count = world.player.key_count.saturating_add(1);
        }
        Command::GiveUpgrade { upgrade } => {
            world.player.give_upgrade(upgrade);
            out_events.push(Event::UpgradeGranted { upgrade });
        }
        Command::ToggleEnemyThink => {
            world.enemy_think = !world.enemy_think;
            debug!(enabled = world.enemy_think, "toggled enemy think");
        }
        Command::LoadRoom { index } => {
            if world.enter_room(index, out_events) {
                let tile = world.config.player_spawn;
                world.player.character.position = spawn_position(tile);
                world.relight(out_events);
                out_events.push(Event::RoomEntered { index, tile });
            }
        }
        Command::RestoreProgress { progress } => world.player.restore(progress),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use bryte_core::{Handle, TileCoord};

    use super::{
        character::KnockbackPolicy, enemy::Enemy, interactives::Interactives, map::Map,
        pickup::Pickup, player::Player, projectile::Projectile, World, WorldConfig,
    };

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Master-list index of the live room.
    #[must_use]
    pub fn room_index(world: &World) -> usize {
        world.room_index
    }

    /// Number of rooms the world can load.
    #[must_use]
    pub fn room_count(world: &World) -> usize {
        world.master_list.len()
    }

    /// Tile grid of the live room.
    #[must_use]
    pub fn map(world: &World) -> &Map {
        &world.map
    }

    /// Interactive overlay of the live room.
    #[must_use]
    pub fn interactives(world: &World) -> &Interactives {
        &world.interactives
    }

    /// The player and its inventory.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Tile under the player's collision center.
    #[must_use]
    pub fn player_tile(world: &World) -> Option<TileCoord> {
        world.player.character.center_tile(&world.map)
    }

    /// Live enemies in slot order.
    pub fn enemies(world: &World) -> impl Iterator<Item = (Handle, &Enemy)> {
        world.enemies.iter()
    }

    /// Number of live enemies.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.live_count()
    }

    /// Resolves an enemy handle.
    #[must_use]
    pub fn enemy(world: &World, handle: Handle) -> Option<&Enemy> {
        world.enemies.get(handle)
    }

    /// Live projectiles in slot order.
    pub fn projectiles(world: &World) -> impl Iterator<Item = (Handle, &Projectile)> {
        world.projectiles.iter()
    }

    /// Live pickups in slot order.
    pub fn pickups(world: &World) -> impl Iterator<Item = (Handle, &Pickup)> {
        world.pickups.iter()
    }

    /// Frames simulated so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Whether enemies currently run their AI.
    #[must_use]
    pub fn enemy_think(world: &World) -> bool {
        world.enemy_think
    }

    /// Active knockback policy.
    #[must_use]
    pub fn knockback(world: &World) -> KnockbackPolicy {
        world.config.knockback
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use bryte_core::PlayerProgress;

    fn single_room(width: u8, height: u8) -> MasterList {
        MasterList::new(vec![RoomDefinition::new(
            Map::new(width, height),
            RoomLayout::default(),
        )])
    }

    #[test]
    fn new_world_starts_in_configured_room() {
        let world = World::new(WorldConfig::default(), single_room(8, 8)).expect("world");
        assert_eq!(query::room_index(&world), 0);
        assert_eq!(query::tick_index(&world), 0);
        assert_eq!(query::player(&world).character.position, Vec2::new(1.0, 1.0));
        assert!(query::enemy_think(&world));
    }

    #[test]
    fn unknown_start_room_is_rejected() {
        let config = WorldConfig {
            map_index: 3,
            ..WorldConfig::default()
        };
        assert!(matches!(
            World::new(config, single_room(4, 4)),
            Err(WorldError::UnknownRoom { index: 3, count: 1 })
        ));
    }

    #[test]
    fn spawn_outside_room_is_rejected() {
        let config = WorldConfig {
            player_spawn: TileCoord::new(6, 1),
            ..WorldConfig::default()
        };
        assert!(matches!(
            World::new(config, single_room(4, 4)),
            Err(WorldError::SpawnOutOfBounds { room: 0, x: 6, y: 1 })
        ));
    }

    #[test]
    fn tick_reports_time_and_counts_frames() {
        let mut world = World::new(WorldConfig::default(), single_room(8, 8)).expect("world");
        let mut events = Vec::new();
        let dt = Duration::from_millis(16);
        apply(&mut world, Command::Tick { dt }, &mut events);
        assert_eq!(events.first(), Some(&Event::TimeAdvanced { dt }));
        assert_eq!(query::tick_index(&world), 1);
    }

    #[test]
    fn missing_room_load_is_rejected() {
        let mut world = World::new(WorldConfig::default(), single_room(8, 8)).expect("world");
        let mut events = Vec::new();
        apply(&mut world, Command::LoadRoom { index: 4 }, &mut events);
        assert_eq!(events, vec![Event::RoomLoadRejected { index: 4 }]);
        assert_eq!(query::room_index(&world), 0);
    }

    #[test]
    fn debug_commands_adjust_state() {
        let mut world = World::new(WorldConfig::default(), single_room(8, 8)).expect("world");
        let mut events = Vec::new();
        apply(&mut world, Command::GiveKey, &mut events);
        apply(&mut world, Command::ToggleEnemyThink, &mut events);
        assert_eq!(query::player(&world).key_count, 1);
        assert!(!query::enemy_think(&world));

        let progress = PlayerProgress {
            health: 12,
            max_health: 30,
            key_count: 2,
            arrow_count: 7,
            max_arrows: 15,
            bomb_count: 1,
            max_bombs: 4,
            has_bow: true,
        };
        apply(&mut world, Command::RestoreProgress { progress }, &mut events);
        assert_eq!(query::player(&world).progress(), progress);
        assert!(events.is_empty());
    }
}
