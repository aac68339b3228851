#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bryte simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing player intents and world requests, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values
//! describing what changed. The leaf utilities every component depends on
//! (geometry, [`Stopwatch`], [`Random`]) live here as well.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod geometry;
mod random;
mod stopwatch;

pub use geometry::{
    meters_to_pixels, pixels_to_meters, Direction, Rect, TileCoord, PIXELS_PER_METER,
    TILE_DIMENSION_IN_METERS, TILE_DIMENSION_IN_PIXELS,
};
pub use random::Random;
pub use stopwatch::Stopwatch;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one frame of the provided duration.
    Tick {
        /// Simulated time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Records whether a movement direction is currently held.
    SetDirectionHeld {
        /// Direction whose key changed.
        direction: Direction,
        /// Whether the key is now held down.
        held: bool,
    },
    /// Requests a melee attack on the next frame.
    TriggerAttack,
    /// Requests activation of the tile the player faces on the next frame.
    TriggerActivate,
    /// Requests an arrow shot on the next frame.
    TriggerFire,
    /// Requests a bomb on the next frame.
    TriggerBomb,
    /// Records whether the shield stance is held.
    SetBlocking {
        /// Whether the block input is held down.
        held: bool,
    },
    /// Requests a new enemy in the current room.
    SpawnEnemy {
        /// Species of the enemy.
        kind: EnemyKind,
        /// Lower-left corner of the enemy in world meters.
        position: Vec2,
        /// Initial facing.
        facing: Direction,
        /// Item dropped when the enemy dies.
        drop: PickupKind,
    },
    /// Grants the player a key.
    GiveKey,
    /// Grants the player a permanent upgrade.
    GiveUpgrade {
        /// Upgrade to apply.
        upgrade: Upgrade,
    },
    /// Toggles whether enemies run their AI.
    ToggleEnemyThink,
    /// Replaces the current room with the room at the provided master-list index.
    LoadRoom {
        /// Index into the world's master list.
        index: usize,
    },
    /// Overwrites the player's progress fields from a save slot.
    RestoreProgress {
        /// Progress record to apply.
        progress: PlayerProgress,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that a frame was simulated.
    TimeAdvanced {
        /// Simulated time covered by the frame.
        dt: Duration,
    },
    /// Confirms that an enemy occupied a pool slot.
    EnemySpawned {
        /// Handle of the slot now owned by the enemy.
        enemy: Handle,
        /// Species of the enemy.
        kind: EnemyKind,
        /// Lower-left corner of the enemy.
        position: Vec2,
    },
    /// Reports that the enemy pool had no free slot.
    EnemySpawnRejected {
        /// Species that failed to spawn.
        kind: EnemyKind,
    },
    /// Confirms that a projectile occupied a pool slot.
    ProjectileSpawned {
        /// Handle of the projectile slot.
        projectile: Handle,
        /// Type of projectile.
        kind: ProjectileKind,
        /// Direction of flight.
        facing: Direction,
    },
    /// Reports that the projectile pool had no free slot.
    ProjectileSpawnRejected {
        /// Type of projectile that failed to spawn.
        kind: ProjectileKind,
    },
    /// Reports that an arrow stopped against a solid or a character.
    ProjectileStuck {
        /// Handle of the projectile slot.
        projectile: Handle,
        /// Character the arrow is stuck in, if any.
        into: Option<CharacterRef>,
    },
    /// Reports that a projectile left play and its slot became free.
    ProjectileExpired {
        /// Handle of the freed projectile slot.
        projectile: Handle,
    },
    /// Confirms that a pickup appeared.
    PickupSpawned {
        /// Handle of the pickup slot.
        pickup: Handle,
        /// Type of item.
        kind: PickupKind,
    },
    /// Reports that the pickup pool had no free slot.
    PickupSpawnRejected {
        /// Type of item that failed to spawn.
        kind: PickupKind,
    },
    /// Reports that the player collected a pickup.
    PickupCollected {
        /// Type of collected item.
        kind: PickupKind,
    },
    /// Reports that a character lost health.
    CharacterDamaged {
        /// Character that was hit.
        target: CharacterRef,
        /// Health removed by the hit.
        amount: i32,
        /// Direction the character is pushed toward.
        direction: Direction,
    },
    /// Reports that a character was set alight.
    CharacterIgnited {
        /// Character that caught fire.
        target: CharacterRef,
    },
    /// Reports that an enemy died and released its slot.
    EnemyKilled {
        /// Handle of the slot the enemy occupied.
        enemy: Handle,
        /// Species of the enemy.
        kind: EnemyKind,
    },
    /// Reports that the player spent a bomb.
    BombUsed {
        /// Center of the player's collision box when the bomb was placed.
        position: Vec2,
    },
    /// Reports that the player received a permanent upgrade.
    UpgradeGranted {
        /// Upgrade that was applied.
        upgrade: Upgrade,
    },
    /// Reports that the player's health reached zero.
    PlayerDied,
    /// Reports that the player restarted at the spawn tile.
    PlayerRespawned {
        /// Room the player restarted in.
        room: usize,
    },
    /// Reports that an interactive reacted to activation.
    InteractiveActivated {
        /// Tile occupied by the interactive.
        tile: TileCoord,
    },
    /// Reports that a lever toggled the solidity of a bare tile.
    TileSolidityToggled {
        /// Affected tile.
        tile: TileCoord,
        /// Solidity after the toggle.
        solid: bool,
    },
    /// Reports that a locked exit was opened with a key.
    ExitUnlocked {
        /// Tile of the exit.
        tile: TileCoord,
    },
    /// Reports that a pushable interactive moved one tile.
    BlockPushed {
        /// Tile the interactive left.
        from: TileCoord,
        /// Tile the interactive now occupies.
        to: TileCoord,
    },
    /// Reports that a torch caught fire.
    TorchLit {
        /// Tile of the torch.
        tile: TileCoord,
    },
    /// Reports that a light detector changed its lit condition.
    DetectorChanged {
        /// Tile of the detector.
        tile: TileCoord,
        /// Whether the detector now sees enough light.
        lit: bool,
    },
    /// Reports that the player entered a room.
    RoomEntered {
        /// Master-list index of the room.
        index: usize,
        /// Tile the player arrived on.
        tile: TileCoord,
    },
    /// Reports that a room index did not resolve to a room.
    RoomLoadRejected {
        /// Master-list index that was requested.
        index: usize,
    },
}

/// Stable reference to a pool slot. Reusing the slot invalidates old handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// Creates a handle for the slot index at the provided generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the pool.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when the handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Identifies a character regardless of role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharacterRef {
    /// The single player character.
    Player,
    /// An enemy occupying a pool slot.
    Enemy(Handle),
}

/// Enemy species known to the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Ground critter that wanders at random.
    Rat,
    /// Flying critter that chases the player.
    Bat,
    /// Slow blob that spits goo along its facing.
    GooSlime,
}

impl EnemyKind {
    /// Human readable species name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rat => "rat",
            Self::Bat => "bat",
            Self::GooSlime => "goo slime",
        }
    }
}

/// Items that can lie on the floor. `None` marks a free pickup slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    /// No item; the slot is free.
    #[default]
    None,
    /// Restores health.
    Health,
    /// Opens one locked door.
    Key,
    /// Refills arrows.
    Arrow,
    /// Refills bombs.
    Bomb,
    /// Crafting ingredient.
    Ingredient,
}

/// Projectile types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Fast projectile that sticks where it lands.
    Arrow,
    /// Slow projectile that bursts on impact.
    Goo,
}

/// Elemental status that may affect a character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Element {
    /// No active status.
    #[default]
    None,
    /// The character is burning.
    Fire,
}

/// Permanent upgrades unlocking extra capacity or items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Upgrade {
    /// Raises maximum health.
    Heart,
    /// Raises arrow capacity.
    Quiver,
    /// Raises bomb capacity.
    BombBag,
    /// Grants the bow.
    Bow,
}

/// Life-cycle and combat state shared by the player and enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharacterState {
    /// Appearing; cannot act or be hit yet.
    Spawning,
    /// Free to move and act.
    Alive,
    /// Swinging a weapon.
    Attacking,
    /// Holding the shield up.
    Blocking,
    /// Leaning against a pushable interactive.
    Pushing,
    /// Recently hit and briefly invulnerable.
    Blinking,
    /// Out of play; the slot may be reused.
    Dead,
}

/// Life-cycle shared by projectiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LifeState {
    /// Out of play; the slot may be reused.
    #[default]
    Dead,
    /// Created this frame.
    Spawning,
    /// In flight or stuck.
    Alive,
}

/// Door states for exits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitState {
    /// Closed until the player spends a key.
    Locked,
    /// Closed but openable by activation.
    Closed,
    /// Passable.
    Open,
}

/// Player progress persisted in a save slot.
///
/// Field order is the on-disk order consumed by the save collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    /// Current health.
    pub health: i32,
    /// Maximum health.
    pub max_health: i32,
    /// Keys carried.
    pub key_count: u8,
    /// Arrows carried.
    pub arrow_count: u8,
    /// Arrow capacity.
    pub max_arrows: u8,
    /// Bombs carried.
    pub bomb_count: u8,
    /// Bomb capacity.
    pub max_bombs: u8,
    /// Whether the bow was found.
    pub has_bow: bool,
}
