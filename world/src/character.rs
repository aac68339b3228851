//! State machine shared by the player and every enemy.

use std::time::Duration;

use bryte_core::{
    pixels_to_meters, CharacterState, Direction, Element, EnemyKind, Rect, Stopwatch, TileCoord,
    TILE_DIMENSION_IN_METERS,
};
use glam::Vec2;
use serde::Deserialize;

use crate::{interactives::Interactives, map::Map};

/// Time the weapon stays out after an attack.
pub const ATTACK_TIME: Duration = Duration::from_millis(350);
/// Pause after an attack before the next one may start.
pub const ATTACK_COOLDOWN: Duration = Duration::from_millis(250);
/// Invulnerability window after taking damage.
pub const BLINK_TIME: Duration = Duration::from_millis(1500);
/// Leading part of the blink window during which the character is shoved.
pub const DAMAGE_PUSH_TIME: Duration = Duration::from_millis(250);
/// Knockback speed in meters per second.
pub const DAMAGE_PUSH_SPEED: f32 = 8.0;
/// Time a character must lean on a pushable before it moves.
pub const PUSH_DELAY: Duration = Duration::from_millis(500);
/// Time a character keeps burning after catching fire.
pub const BURN_TIME: Duration = Duration::from_secs(3);
/// Time enemies spend appearing before they act.
pub const SPAWN_TIME: Duration = Duration::from_millis(300);
/// Reach of the attack hitbox along the facing axis.
pub const ATTACK_LENGTH: f32 = 14.0 / bryte_core::PIXELS_PER_METER;
/// Width of the attack hitbox across the facing axis.
pub const ATTACK_THICKNESS: f32 = 6.0 / bryte_core::PIXELS_PER_METER;

const MAX_SWEEP_STEP: f32 = TILE_DIMENSION_IN_METERS * 0.25;
const CORNER_INSET: f32 = 1.0e-4;

/// How damage landing on a blinking character is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnockbackPolicy {
    /// Blinking characters are invulnerable.
    #[default]
    Ignore,
    /// Damage applies again and restarts the blink and knockback windows.
    Restack,
}

/// Role of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharacterKind {
    /// The player.
    Player,
    /// An enemy of the provided species.
    Enemy(EnemyKind),
}

/// Result of a call to [`Character::damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The character could not be hurt in its current state.
    Ignored,
    /// The shield took the hit.
    Blocked,
    /// Health dropped and the character started blinking.
    Hurt,
    /// Health reached zero.
    Killed,
}

/// Physical and combat state of a single character.
#[derive(Clone, Debug, PartialEq)]
pub struct Character {
    /// Role of the character.
    pub kind: CharacterKind,
    /// Lower-left corner of the sprite box, in meters.
    pub position: Vec2,
    /// Velocity accumulated this frame, in meters per second.
    pub velocity: Vec2,
    /// Walk input accumulated this frame, in meters per second.
    pub acceleration: Vec2,
    /// Sprite box size.
    pub dimension: Vec2,
    /// Offset of the collision box from [`Character::position`].
    pub collision_offset: Vec2,
    /// Collision box size.
    pub collision_dimension: Vec2,
    /// Current health.
    pub health: i32,
    /// Health ceiling.
    pub max_health: i32,
    /// Direction the character looks toward.
    pub facing: Direction,
    /// Life-cycle and combat state.
    pub state: CharacterState,
    /// Timer of the current state (spawning, attacking, pushing).
    pub state_watch: Stopwatch,
    /// Blink timer started by damage.
    pub damage_watch: Stopwatch,
    /// Attack cooldown.
    pub cooldown_watch: Stopwatch,
    /// Remaining duration of the elemental status.
    pub element_watch: Stopwatch,
    /// Direction the last hit shoved the character toward.
    pub damage_pushed: Direction,
    /// Active elemental status.
    pub effected_by_element: Element,
    /// Walking speed in meters per second.
    pub walk_speed: f32,
    /// Whether the character passes over pushables and torches.
    pub flies: bool,
    /// Whether hits shove the character.
    pub knockbackable: bool,
    /// Whether solid tiles and interactives stop the character.
    pub collides_with_solids: bool,
    /// Whether exit tiles stop the character.
    pub collides_with_exits: bool,
    walking: bool,
}

impl Character {
    fn base(kind: CharacterKind, position: Vec2, facing: Direction) -> Self {
        Self {
            kind,
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            dimension: Vec2::splat(pixels_to_meters(16.0)),
            collision_offset: Vec2::ZERO,
            collision_dimension: Vec2::splat(pixels_to_meters(16.0)),
            health: 1,
            max_health: 1,
            facing,
            state: CharacterState::Alive,
            state_watch: Stopwatch::expired_watch(),
            damage_watch: Stopwatch::expired_watch(),
            cooldown_watch: Stopwatch::expired_watch(),
            element_watch: Stopwatch::expired_watch(),
            damage_pushed: facing,
            effected_by_element: Element::None,
            walk_speed: 0.0,
            flies: false,
            knockbackable: true,
            collides_with_solids: true,
            collides_with_exits: false,
            walking: false,
        }
    }

    /// Creates the player standing at `position`, facing left.
    #[must_use]
    pub fn player(position: Vec2) -> Self {
        Self {
            collision_offset: Vec2::new(pixels_to_meters(5.0), pixels_to_meters(2.0)),
            collision_dimension: Vec2::new(pixels_to_meters(6.0), pixels_to_meters(7.0)),
            health: 25,
            max_health: 25,
            walk_speed: 8.5,
            ..Self::base(CharacterKind::Player, position, Direction::Left)
        }
    }

    /// Creates an enemy of the provided species in its spawning state.
    #[must_use]
    pub fn enemy(kind: EnemyKind, position: Vec2, facing: Direction) -> Self {
        let base = Self::base(CharacterKind::Enemy(kind), position, facing);
        let mut enemy = match kind {
            EnemyKind::Rat => Self {
                collision_offset: Vec2::new(pixels_to_meters(3.0), pixels_to_meters(2.0)),
                collision_dimension: Vec2::new(pixels_to_meters(10.0), pixels_to_meters(6.0)),
                health: 3,
                max_health: 3,
                walk_speed: 2.0,
                collides_with_exits: true,
                ..base
            },
            EnemyKind::Bat => Self {
                collision_offset: Vec2::new(pixels_to_meters(4.0), pixels_to_meters(6.0)),
                collision_dimension: Vec2::new(pixels_to_meters(8.0), pixels_to_meters(6.0)),
                health: 2,
                max_health: 2,
                walk_speed: 3.5,
                flies: true,
                collides_with_exits: true,
                ..base
            },
            EnemyKind::GooSlime => Self {
                collision_offset: Vec2::new(pixels_to_meters(2.0), pixels_to_meters(2.0)),
                collision_dimension: Vec2::new(pixels_to_meters(12.0), pixels_to_meters(8.0)),
                health: 4,
                max_health: 4,
                walk_speed: 1.0,
                knockbackable: false,
                collides_with_exits: true,
                ..base
            },
        };
        enemy.state = CharacterState::Spawning;
        enemy.state_watch.reset(SPAWN_TIME);
        enemy
    }

    /// Creates a character in the dead state, marking a free pool slot.
    #[must_use]
    pub fn dead() -> Self {
        Self {
            state: CharacterState::Dead,
            health: 0,
            ..Self::base(CharacterKind::Enemy(EnemyKind::Rat), Vec2::ZERO, Direction::Left)
        }
    }

    /// Reports whether the character is still in play.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state != CharacterState::Dead
    }

    /// Reports whether the character can be hit and hit back.
    #[must_use]
    pub fn is_vulnerable(&self) -> bool {
        !matches!(self.state, CharacterState::Dead | CharacterState::Spawning)
    }

    /// Collision box at the current position.
    #[must_use]
    pub fn collision_rect(&self) -> Rect {
        self.collision_rect_at(self.position)
    }

    fn collision_rect_at(&self, position: Vec2) -> Rect {
        Rect::new(position + self.collision_offset, self.collision_dimension)
    }

    /// Center of the collision box.
    #[must_use]
    pub fn collision_center(&self) -> Vec2 {
        self.collision_rect().center()
    }

    /// Moves the character so its collision box is centered on `center`.
    pub fn set_collision_center(&mut self, center: Vec2) {
        self.position = center - self.collision_offset - self.collision_dimension * 0.5;
    }

    /// Tile under the center of the collision box, if it lies on the grid.
    #[must_use]
    pub fn center_tile(&self, map: &Map) -> Option<TileCoord> {
        map.position_to_tile(self.collision_center())
    }

    /// Tile next to the character in the facing direction, if it lies on the grid.
    #[must_use]
    pub fn adjacent_tile(&self, map: &Map) -> Option<TileCoord> {
        self.center_tile(map)?
            .step(self.facing)
            .filter(|tile| map.coordinates_valid(*tile))
    }

    /// Melee hitbox beside the collision box on the facing side.
    #[must_use]
    pub fn attack_rect(&self) -> Rect {
        let body = self.collision_rect();
        let center = body.center();
        match self.facing {
            Direction::Left => Rect::new(
                Vec2::new(body.origin().x - ATTACK_LENGTH, center.y - ATTACK_THICKNESS * 0.5),
                Vec2::new(ATTACK_LENGTH, ATTACK_THICKNESS),
            ),
            Direction::Right => Rect::new(
                Vec2::new(body.max().x, center.y - ATTACK_THICKNESS * 0.5),
                Vec2::new(ATTACK_LENGTH, ATTACK_THICKNESS),
            ),
            Direction::Up => Rect::new(
                Vec2::new(center.x - ATTACK_THICKNESS * 0.5, body.max().y),
                Vec2::new(ATTACK_THICKNESS, ATTACK_LENGTH),
            ),
            Direction::Down => Rect::new(
                Vec2::new(center.x - ATTACK_THICKNESS * 0.5, body.origin().y - ATTACK_LENGTH),
                Vec2::new(ATTACK_THICKNESS, ATTACK_LENGTH),
            ),
        }
    }

    /// Reports whether the two collision boxes overlap.
    #[must_use]
    pub fn collides_with(&self, other: &Character) -> bool {
        self.collision_rect().overlaps(&other.collision_rect())
    }

    /// Reports whether an active swing reaches the other character.
    #[must_use]
    pub fn attack_collides_with(&self, other: &Character) -> bool {
        self.state == CharacterState::Attacking && self.attack_rect().overlaps(&other.collision_rect())
    }

    /// Reports whether the character is inside the knockback part of a blink.
    #[must_use]
    pub fn is_shoved(&self) -> bool {
        self.state == CharacterState::Blinking
            && self.damage_watch.remaining() > BLINK_TIME - DAMAGE_PUSH_TIME
    }

    /// Adds walking input toward `direction` and turns that way.
    ///
    /// A blinking character regains control once the knockback is over; it
    /// still cannot attack, block or push until the blink ends.
    pub fn walk(&mut self, direction: Direction) {
        let controllable = match self.state {
            CharacterState::Alive | CharacterState::Pushing => true,
            CharacterState::Blinking => !self.is_shoved(),
            _ => false,
        };
        if !controllable {
            return;
        }
        self.facing = direction;
        self.acceleration += direction.unit_vector() * self.walk_speed;
        self.walking = true;
    }

    /// Starts a swing if the character is idle and the cooldown expired.
    pub fn attack(&mut self) -> bool {
        if self.state != CharacterState::Alive || !self.cooldown_watch.expired() {
            return false;
        }
        self.state = CharacterState::Attacking;
        self.state_watch.reset(ATTACK_TIME);
        true
    }

    /// Raises the shield.
    pub fn block(&mut self) {
        if self.state == CharacterState::Alive {
            self.state = CharacterState::Blocking;
        }
    }

    /// Lowers the shield.
    pub fn stop_blocking(&mut self) {
        if self.state == CharacterState::Blocking {
            self.state = CharacterState::Alive;
        }
    }

    /// Reports whether a hit would be considered at all under `policy`.
    #[must_use]
    pub fn accepts_damage(&self, policy: KnockbackPolicy) -> bool {
        match self.state {
            CharacterState::Dead | CharacterState::Spawning => false,
            CharacterState::Blinking => policy == KnockbackPolicy::Restack,
            _ => true,
        }
    }

    /// Removes `amount` health and shoves the character toward `push`.
    pub fn damage(&mut self, amount: i32, push: Direction, policy: KnockbackPolicy) -> DamageOutcome {
        if !self.accepts_damage(policy) {
            return DamageOutcome::Ignored;
        }
        if self.state == CharacterState::Blocking && push == self.facing.opposite() {
            return DamageOutcome::Blocked;
        }

        self.health -= amount;
        if self.health > 0 {
            self.state = CharacterState::Blinking;
            self.damage_watch.reset(BLINK_TIME);
            self.damage_pushed = push;
            DamageOutcome::Hurt
        } else {
            self.state = CharacterState::Dead;
            DamageOutcome::Killed
        }
    }

    /// Sets the character alight for [`BURN_TIME`].
    pub fn light_on_fire(&mut self) {
        self.effected_by_element = Element::Fire;
        self.element_watch.reset(BURN_TIME);
    }

    /// Restores health without exceeding the ceiling.
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Reports whether the character leaned on a pushable for long enough.
    #[must_use]
    pub fn ready_to_push(&self) -> bool {
        self.state == CharacterState::Pushing && self.state_watch.expired()
    }

    /// Ends the push stance after the world resolved the push.
    pub fn finish_push(&mut self) {
        if self.state == CharacterState::Pushing {
            self.state = CharacterState::Alive;
        }
    }

    /// Advances timers and moves the character against the room geometry.
    ///
    /// Each axis is swept separately in sub-steps of at most a quarter tile;
    /// a collision anywhere along an axis cancels that axis for the frame.
    pub fn update(&mut self, dt: Duration, map: &Map, interactives: &Interactives) {
        if self.state == CharacterState::Dead {
            self.clear_motion();
            return;
        }

        self.tick_timers(dt);

        let displacement = (self.velocity + self.acceleration) * dt.as_secs_f32();
        let blocked_x = !self.sweep(Vec2::new(displacement.x, 0.0), map, interactives);
        let blocked_y = !self.sweep(Vec2::new(0.0, displacement.y), map, interactives);

        let blocked_facing = if self.facing.is_horizontal() {
            blocked_x
        } else {
            blocked_y
        };
        let leaning = self.walking
            && blocked_facing
            && self
                .adjacent_tile(map)
                .is_some_and(|tile| interactives.is_pushable(tile));

        match (self.state, leaning) {
            (CharacterState::Alive, true) => {
                self.state = CharacterState::Pushing;
                self.state_watch.reset(PUSH_DELAY);
            }
            (CharacterState::Pushing, true) => self.state_watch.tick(dt),
            (CharacterState::Pushing, false) => self.state = CharacterState::Alive,
            _ => {}
        }

        self.clear_motion();
    }

    fn clear_motion(&mut self) {
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self.walking = false;
    }

    fn tick_timers(&mut self, dt: Duration) {
        self.cooldown_watch.tick(dt);

        self.element_watch.tick(dt);
        if self.element_watch.expired() {
            self.effected_by_element = Element::None;
        }

        match self.state {
            CharacterState::Spawning => {
                self.state_watch.tick(dt);
                if self.state_watch.expired() {
                    self.state = CharacterState::Alive;
                }
            }
            CharacterState::Attacking => {
                self.state_watch.tick(dt);
                if self.state_watch.expired() {
                    self.state = CharacterState::Alive;
                    self.cooldown_watch.reset(ATTACK_COOLDOWN);
                }
            }
            CharacterState::Blinking => {
                if self.is_shoved() && self.knockbackable {
                    self.velocity += self.damage_pushed.unit_vector() * DAMAGE_PUSH_SPEED;
                }
                self.damage_watch.tick(dt);
                if self.damage_watch.expired() {
                    self.state = CharacterState::Alive;
                }
            }
            CharacterState::Alive
            | CharacterState::Blocking
            | CharacterState::Pushing
            | CharacterState::Dead => {}
        }

        if self.state == CharacterState::Blocking {
            self.acceleration = Vec2::ZERO;
        }
    }

    /// Applies the displacement in sub-steps; returns false and leaves the
    /// position untouched if any sub-step collides.
    fn sweep(&mut self, displacement: Vec2, map: &Map, interactives: &Interactives) -> bool {
        let distance = displacement.length();
        if distance == 0.0 {
            return true;
        }

        let steps = (distance / MAX_SWEEP_STEP).ceil().max(1.0) as u32;
        let step = displacement / steps as f32;
        let mut candidate = self.position;
        for _ in 0..steps {
            candidate += step;
            if self.collides_at(candidate, map, interactives) {
                return false;
            }
        }
        self.position = candidate;
        true
    }

    fn collides_at(&self, position: Vec2, map: &Map, interactives: &Interactives) -> bool {
        let rect = self.collision_rect_at(position);
        let inset = Rect::new(rect.origin(), rect.size() - Vec2::splat(CORNER_INSET));

        inset.corners().into_iter().any(|corner| {
            let Some(tile) = map.position_to_tile(corner) else {
                return self.collides_with_solids;
            };
            if self.collides_with_solids {
                if map.get_coordinate_solid(tile) {
                    return true;
                }
                if let Some(interactive) = interactives.get(tile) {
                    let passable = self.flies && interactive.is_pushable();
                    if interactive.is_solid() && !passable {
                        return true;
                    }
                }
            }
            self.collides_with_exits && map.exits().iter().any(|exit| exit.location == tile)
        })
    }
}

impl Default for Character {
    fn default() -> Self {
        Self::dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactives::Interactive;

    fn open_room() -> (Map, Interactives) {
        (Map::new(16, 16), Interactives::new(16, 16))
    }

    fn tick() -> Duration {
        Duration::from_millis(16)
    }

    #[test]
    fn damage_that_leaves_health_blinks() {
        let mut character = Character::player(Vec2::ZERO);
        character.health = 5;
        assert_eq!(
            character.damage(2, Direction::Right, KnockbackPolicy::Ignore),
            DamageOutcome::Hurt
        );
        assert_eq!(character.state, CharacterState::Blinking);
        assert_eq!(character.health, 3);

        // Invulnerable while blinking under the default policy.
        assert_eq!(
            character.damage(2, Direction::Right, KnockbackPolicy::Ignore),
            DamageOutcome::Ignored
        );
        assert_eq!(character.health, 3);

        assert_eq!(
            character.damage(3, Direction::Right, KnockbackPolicy::Restack),
            DamageOutcome::Killed
        );
        assert_eq!(character.state, CharacterState::Dead);
        assert!(character.health <= 0);
    }

    #[test]
    fn dead_characters_ignore_damage() {
        let mut character = Character::dead();
        assert_eq!(
            character.damage(1, Direction::Up, KnockbackPolicy::Restack),
            DamageOutcome::Ignored
        );
    }

    #[test]
    fn shield_absorbs_hits_from_the_front() {
        let mut character = Character::player(Vec2::ZERO);
        character.facing = Direction::Right;
        character.block();
        assert_eq!(
            character.damage(1, Direction::Left, KnockbackPolicy::Ignore),
            DamageOutcome::Blocked
        );
        assert_eq!(
            character.damage(1, Direction::Right, KnockbackPolicy::Ignore),
            DamageOutcome::Hurt
        );
    }

    #[test]
    fn attack_runs_then_cools_down() {
        let (map, interactives) = open_room();
        let mut character = Character::player(Vec2::new(4.0, 4.0));
        assert!(character.attack());
        assert_eq!(character.state, CharacterState::Attacking);
        assert!(!character.attack());

        character.update(ATTACK_TIME, &map, &interactives);
        assert_eq!(character.state, CharacterState::Alive);
        assert!(!character.attack());

        character.update(ATTACK_COOLDOWN, &map, &interactives);
        assert!(character.attack());
    }

    #[test]
    fn attack_rect_swaps_orientation_with_facing() {
        let mut character = Character::player(Vec2::new(4.0, 4.0));
        character.facing = Direction::Right;
        let wide = character.attack_rect();
        assert_eq!(wide.size(), Vec2::new(ATTACK_LENGTH, ATTACK_THICKNESS));
        assert_eq!(wide.origin().x, character.collision_rect().max().x);
        assert!((wide.center().y - character.collision_center().y).abs() < 1.0e-6);

        character.facing = Direction::Down;
        let tall = character.attack_rect();
        assert_eq!(tall.size(), Vec2::new(ATTACK_THICKNESS, ATTACK_LENGTH));
        assert!((tall.max().y - character.collision_rect().origin().y).abs() < 1.0e-6);
        assert!((tall.center().x - character.collision_center().x).abs() < 1.0e-6);
    }

    #[test]
    fn long_step_into_a_wall_is_rejected() {
        let (mut map, interactives) = open_room();
        let wall = TileCoord::new(5, 5);
        map.set_coordinate_solid(wall, true);

        let mut character = Character::player(Vec2::ZERO);
        character.set_collision_center(TileCoord::new(5, 4).center());
        let start = character.position;

        character.velocity = Vec2::new(0.0, 1.5 * TILE_DIMENSION_IN_METERS / 0.016);
        character.update(tick(), &map, &interactives);

        assert_eq!(character.position, start);
        assert!(!character.collision_rect().overlaps(&wall.bounds()));
        assert_eq!(character.velocity, Vec2::ZERO);
    }

    #[test]
    fn blocked_axis_does_not_cancel_the_other() {
        let (mut map, interactives) = open_room();
        map.set_coordinate_solid(TileCoord::new(6, 4), true);

        let mut character = Character::player(Vec2::ZERO);
        character.set_collision_center(TileCoord::new(5, 4).center());
        let start = character.position;

        character.velocity = Vec2::new(40.0, 10.0);
        character.update(Duration::from_millis(50), &map, &interactives);
        assert_eq!(character.position.x, start.x);
        assert!(character.position.y > start.y);
    }

    #[test]
    fn leaning_on_a_block_enters_pushing() {
        let (map, mut interactives) = open_room();
        let block = TileCoord::new(6, 4);
        interactives.set(block, Interactive::PushableBlock);

        let mut character = Character::player(Vec2::ZERO);
        character.set_collision_center(TileCoord::new(5, 4).center());
        character.position.x += 0.3;

        let mut leaned = false;
        for _ in 0..20 {
            character.walk(Direction::Right);
            character.update(tick(), &map, &interactives);
            leaned |= character.state == CharacterState::Pushing;
        }
        assert!(leaned);

        for _ in 0..40 {
            character.walk(Direction::Right);
            character.update(tick(), &map, &interactives);
        }
        assert!(character.ready_to_push());

        character.update(tick(), &map, &interactives);
        assert_eq!(character.state, CharacterState::Alive);
    }

    #[test]
    fn knockback_moves_during_push_window_only() {
        let (map, interactives) = open_room();
        let mut character = Character::player(Vec2::new(6.0, 6.0));
        let _ = character.damage(1, Direction::Up, KnockbackPolicy::Ignore);

        let before = character.position;
        character.update(Duration::from_millis(100), &map, &interactives);
        assert!(character.position.y > before.y);

        character.update(DAMAGE_PUSH_TIME, &map, &interactives);
        let settled = character.position;
        character.update(Duration::from_millis(100), &map, &interactives);
        assert_eq!(character.position, settled);

        character.update(BLINK_TIME, &map, &interactives);
        assert_eq!(character.state, CharacterState::Alive);
    }

    #[test]
    fn blinking_character_walks_once_the_shove_ends() {
        let (map, interactives) = open_room();
        let mut character = Character::player(Vec2::new(6.0, 6.0));
        let _ = character.damage(1, Direction::Up, KnockbackPolicy::Ignore);
        assert!(character.is_shoved());

        character.walk(Direction::Right);
        character.update(Duration::from_millis(100), &map, &interactives);
        assert_eq!(character.position.x, 6.0);

        character.update(DAMAGE_PUSH_TIME, &map, &interactives);
        assert!(!character.is_shoved());
        let start = character.position;
        for _ in 0..10 {
            character.walk(Direction::Right);
            character.update(Duration::from_millis(10), &map, &interactives);
        }

        assert_eq!(character.state, CharacterState::Blinking);
        assert_eq!(character.facing, Direction::Right);
        assert!(character.position.x > start.x);
        assert_eq!(character.position.y, start.y);
        assert!(!character.accepts_damage(KnockbackPolicy::Ignore));
        assert!(!character.attack());
    }

    #[test]
    fn fire_burns_out() {
        let (map, interactives) = open_room();
        let mut character = Character::player(Vec2::new(2.0, 2.0));
        character.light_on_fire();
        assert_eq!(character.effected_by_element, Element::Fire);
        character.update(BURN_TIME, &map, &interactives);
        assert_eq!(character.effected_by_element, Element::None);
    }

    #[test]
    fn enemies_spawn_before_acting() {
        let (map, interactives) = open_room();
        let mut rat = Character::enemy(EnemyKind::Rat, Vec2::new(3.0, 3.0), Direction::Down);
        assert_eq!(rat.state, CharacterState::Spawning);
        assert!(!rat.is_vulnerable());
        rat.update(SPAWN_TIME, &map, &interactives);
        assert_eq!(rat.state, CharacterState::Alive);
    }
}
