//! Enemy slots and their per-species behaviour.

use std::time::Duration;

use bryte_core::{CharacterState, Direction, EnemyKind, PickupKind, Random, Stopwatch};
use glam::Vec2;

use crate::{character::Character, pool::Recyclable};

/// Shortest pause before a wandering enemy picks a new heading, in milliseconds.
const WANDER_MIN_MS: u32 = 1_000;
/// Longest pause before a wandering enemy picks a new heading, in milliseconds.
const WANDER_MAX_MS: u32 = 3_000;
/// Distance within which bats chase the player.
pub const BAT_CHASE_RANGE: f32 = 5.0;
/// Distance within which goo slimes spit at the player.
pub const GOO_SPIT_RANGE: f32 = 6.0;
/// Cross-axis slack, in meters, for a slime to count as lined up with the player.
const GOO_ALIGNMENT: f32 = 0.5;
/// Pause between two goo spits.
pub const GOO_SPIT_COOLDOWN: Duration = Duration::from_secs(2);

/// Decision taken by an enemy during its think step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyAction {
    /// Spit a goo projectile toward `facing`.
    Spit {
        /// Direction of the shot.
        facing: Direction,
    },
}

/// Enemy occupying a pool slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    /// Species of the enemy.
    pub kind: EnemyKind,
    /// Shared character state.
    pub character: Character,
    /// Item released on death.
    pub drop: PickupKind,
    /// Countdown until the next heading change.
    pub think_watch: Stopwatch,
    /// Heading picked by the last wander decision.
    pub wander: Option<Direction>,
    /// Cooldown between ranged attacks.
    pub attack_watch: Stopwatch,
}

impl Enemy {
    /// Creates a freshly spawned enemy.
    #[must_use]
    pub fn new(kind: EnemyKind, position: Vec2, facing: Direction, drop: PickupKind) -> Self {
        Self {
            kind,
            character: Character::enemy(kind, position, facing),
            drop,
            think_watch: Stopwatch::expired_watch(),
            wander: None,
            attack_watch: Stopwatch::expired_watch(),
        }
    }

    /// Runs the species behaviour against the player's current collision center.
    pub fn think(&mut self, player: Vec2, random: &mut Random, dt: Duration) -> Option<EnemyAction> {
        self.think_watch.tick(dt);
        self.attack_watch.tick(dt);

        if self.character.state != CharacterState::Alive {
            return None;
        }

        let offset = player - self.character.collision_center();
        match self.kind {
            EnemyKind::Rat => {
                self.wander(random);
                None
            }
            EnemyKind::Bat => {
                if offset.length() <= BAT_CHASE_RANGE {
                    self.character.walk(toward(offset));
                } else {
                    self.wander(random);
                }
                None
            }
            EnemyKind::GooSlime => {
                let lined_up = offset.x.abs() <= GOO_ALIGNMENT || offset.y.abs() <= GOO_ALIGNMENT;
                if lined_up && offset.length() <= GOO_SPIT_RANGE && self.attack_watch.expired() {
                    let facing = toward(offset);
                    self.character.facing = facing;
                    self.attack_watch.reset(GOO_SPIT_COOLDOWN);
                    return Some(EnemyAction::Spit { facing });
                }
                self.wander(random);
                None
            }
        }
    }

    fn wander(&mut self, random: &mut Random) {
        if self.think_watch.expired() || self.wander.is_none() {
            let index = random.generate(0, Direction::ALL.len() as u32) as usize;
            self.wander = Direction::ALL.get(index).copied();
            let pause = random.generate(WANDER_MIN_MS, WANDER_MAX_MS + 1);
            self.think_watch.reset(Duration::from_millis(u64::from(pause)));
        }
        if let Some(direction) = self.wander {
            self.character.walk(direction);
        }
    }
}

/// Direction along the dominant axis of `offset`; ties resolve horizontally.
fn toward(offset: Vec2) -> Direction {
    if offset.x.abs() >= offset.y.abs() {
        if offset.x >= 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if offset.y >= 0.0 {
        Direction::Up
    } else {
        Direction::Down
    }
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            kind: EnemyKind::Rat,
            character: Character::dead(),
            drop: PickupKind::None,
            think_watch: Stopwatch::expired_watch(),
            wander: None,
            attack_watch: Stopwatch::expired_watch(),
        }
    }
}

impl Recyclable for Enemy {
    fn is_free(&self) -> bool {
        !self.character.is_alive()
    }
}
