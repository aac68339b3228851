//! Arrows and goo in flight.

use std::time::Duration;

use bryte_core::{
    CharacterRef, Direction, Event, ExitState, LifeState, ProjectileKind, Stopwatch,
    PIXELS_PER_METER,
};
use glam::Vec2;

use crate::{
    character::{Character, DamageOutcome, KnockbackPolicy},
    interactives::{Interactive, Interactives},
    map::Map,
    pool::Recyclable,
};

/// Arrow flight speed in meters per second.
pub const ARROW_SPEED: f32 = 20.0;
/// Goo flight speed in meters per second.
pub const GOO_SPEED: f32 = 5.0;
/// Time an arrow stays stuck before it disappears.
pub const STUCK_TIME: Duration = Duration::from_millis(1500);

/// Collision point per facing, relative to the projectile position, indexed by
/// [`Direction::index`].
pub const CONTACT_POINTS: [Vec2; 4] = [
    Vec2::new(1.0 / PIXELS_PER_METER, 7.0 / PIXELS_PER_METER),
    Vec2::new(7.0 / PIXELS_PER_METER, 14.0 / PIXELS_PER_METER),
    Vec2::new(14.0 / PIXELS_PER_METER, 7.0 / PIXELS_PER_METER),
    Vec2::new(7.0 / PIXELS_PER_METER, 1.0 / PIXELS_PER_METER),
];

/// Character an arrow is stuck in and where on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tracking {
    /// Character carrying the arrow.
    pub target: CharacterRef,
    /// Arrow position relative to the character position.
    pub offset: Vec2,
}

/// What the contact point found on its tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Contact {
    Clear,
    Blocked,
    OffGrid,
}

/// Result of one projectile update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileStep {
    /// Nothing notable happened.
    Moving,
    /// The arrow hit something and stopped.
    Stuck,
    /// The projectile left play; its slot is free.
    Expired,
}

/// Projectile occupying a pool slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    /// Type of projectile.
    pub kind: ProjectileKind,
    /// Lower-left corner of the projectile sprite.
    pub position: Vec2,
    /// Direction of flight.
    pub facing: Direction,
    /// Life-cycle state.
    pub life_state: LifeState,
    /// Whether the arrow stopped and is counting down.
    pub stuck: bool,
    /// Countdown of the stuck state.
    pub stuck_watch: Stopwatch,
    /// Character the arrow rides along with.
    pub track: Option<Tracking>,
    /// Whether the projectile carries fire.
    pub on_fire: bool,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            kind: ProjectileKind::Arrow,
            position: Vec2::ZERO,
            facing: Direction::Left,
            life_state: LifeState::Dead,
            stuck: false,
            stuck_watch: Stopwatch::expired_watch(),
            track: None,
            on_fire: false,
        }
    }
}

impl Projectile {
    /// Creates a projectile about to enter play.
    #[must_use]
    pub fn new(kind: ProjectileKind, position: Vec2, facing: Direction) -> Self {
        Self {
            kind,
            position,
            facing,
            life_state: LifeState::Spawning,
            ..Self::default()
        }
    }

    /// Point used for every collision test of the projectile.
    #[must_use]
    pub fn contact_point(&self) -> Vec2 {
        self.position + CONTACT_POINTS[self.facing.index()]
    }

    /// Reports whether the projectile is moving and may hit characters.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.life_state == LifeState::Alive && !self.stuck
    }

    /// Advances the projectile; `resolve` maps a tracked character to its position.
    pub fn update<F>(
        &mut self,
        dt: Duration,
        map: &mut Map,
        interactives: &mut Interactives,
        resolve: F,
        out_events: &mut Vec<Event>,
    ) -> ProjectileStep
    where
        F: Fn(CharacterRef) -> Option<Vec2>,
    {
        match self.life_state {
            LifeState::Dead => ProjectileStep::Moving,
            LifeState::Spawning => {
                self.life_state = LifeState::Alive;
                ProjectileStep::Moving
            }
            LifeState::Alive if self.stuck => {
                self.stuck_watch.tick(dt);
                if let Some(track) = self.track {
                    match resolve(track.target) {
                        Some(anchor) => self.position = anchor + track.offset,
                        None => self.track = None,
                    }
                }
                if self.stuck_watch.expired() {
                    self.clear();
                    ProjectileStep::Expired
                } else {
                    ProjectileStep::Moving
                }
            }
            LifeState::Alive => {
                let speed = match self.kind {
                    ProjectileKind::Arrow => ARROW_SPEED,
                    ProjectileKind::Goo => GOO_SPEED,
                };
                self.position += self.facing.unit_vector() * speed * dt.as_secs_f32();

                match self.check_for_solids(map, interactives, out_events) {
                    Contact::Clear => ProjectileStep::Moving,
                    Contact::OffGrid => {
                        self.clear();
                        ProjectileStep::Expired
                    }
                    Contact::Blocked => match self.kind {
                        ProjectileKind::Arrow => {
                            self.stick(None);
                            ProjectileStep::Stuck
                        }
                        ProjectileKind::Goo => {
                            self.clear();
                            ProjectileStep::Expired
                        }
                    },
                }
            }
        }
    }

    fn check_for_solids(
        &mut self,
        map: &mut Map,
        interactives: &mut Interactives,
        out_events: &mut Vec<Event>,
    ) -> Contact {
        let Some(tile) = map.position_to_tile(self.contact_point()) else {
            return Contact::OffGrid;
        };
        if map.get_coordinate_solid(tile) {
            return Contact::Blocked;
        }
        if !interactives.coordinates_valid(tile) {
            return Contact::Clear;
        }

        let interactive = *interactives.get_from_tile(tile);
        match interactive {
            // Doors never react to projectiles; open ones let them through.
            Interactive::Exit(door) if door.state == ExitState::Open => Contact::Clear,
            Interactive::Exit(_) => Contact::Blocked,
            Interactive::Torch(_) | Interactive::PushableTorch(_) => {
                if let Interactive::Torch(torch) | Interactive::PushableTorch(torch) =
                    interactives.get_from_tile_mut(tile)
                {
                    if self.on_fire && !torch.on {
                        torch.on = true;
                        out_events.push(Event::TorchLit { tile });
                    }
                    self.on_fire |= torch.on;
                }
                if interactive.is_pushable() {
                    Contact::Blocked
                } else {
                    Contact::Clear
                }
            }
            _ if interactive.blocks_projectiles() => {
                interactives.activate(tile, map, out_events);
                Contact::Blocked
            }
            _ => Contact::Clear,
        }
    }

    fn stick(&mut self, track: Option<Tracking>) {
        self.stuck = true;
        self.track = track;
        self.stuck_watch.reset(STUCK_TIME);
    }

    /// Applies a hit on `character`: one damage along the flight direction,
    /// fire if the projectile burns, then the arrow sticks or the goo bursts.
    pub fn hit_character(
        &mut self,
        target: CharacterRef,
        character: &mut Character,
        policy: KnockbackPolicy,
    ) -> DamageOutcome {
        let outcome = character.damage(1, self.facing, policy);
        if self.on_fire {
            character.light_on_fire();
        }

        match self.kind {
            ProjectileKind::Arrow => self.stick(Some(Tracking {
                target,
                offset: self.position - character.position,
            })),
            ProjectileKind::Goo => self.clear(),
        }
        outcome
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Recyclable for Projectile {
    fn is_free(&self) -> bool {
        self.life_state == LifeState::Dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bryte_core::{TileCoord, TILE_DIMENSION_IN_METERS};

    use crate::interactives::{Door, Lever, Torch};

    const FRAME: Duration = Duration::from_millis(10);

    fn fly(
        projectile: &mut Projectile,
        map: &mut Map,
        interactives: &mut Interactives,
        events: &mut Vec<Event>,
        frames: usize,
    ) -> Vec<ProjectileStep> {
        (0..frames)
            .map(|_| projectile.update(FRAME, map, interactives, |_| None, events))
            .collect()
    }

    #[test]
    fn contact_table_matches_tile_pixels() {
        assert_eq!(CONTACT_POINTS[Direction::Up.index()], Vec2::new(0.4375, 0.875));
        assert_eq!(CONTACT_POINTS[Direction::Down.index()], Vec2::new(0.4375, 0.0625));
    }

    #[test]
    fn arrow_sticks_in_wall_then_expires() {
        let mut map = Map::new(12, 3);
        let mut interactives = Interactives::new(12, 3);
        let wall = TileCoord::new(10, 1);
        map.set_coordinate_solid(wall, true);
        let mut events = Vec::new();

        let mut arrow = Projectile::new(ProjectileKind::Arrow, Vec2::new(2.0, 1.0), Direction::Right);
        let steps = fly(&mut arrow, &mut map, &mut interactives, &mut events, 200);
        let stuck_at = steps
            .iter()
            .position(|step| *step == ProjectileStep::Stuck)
            .expect("arrow reaches the wall");
        assert!(arrow.stuck);
        let gap = wall.bounds().origin().x - arrow.position.x;
        assert!(gap <= TILE_DIMENSION_IN_METERS);

        let expiry = steps
            .iter()
            .position(|step| *step == ProjectileStep::Expired)
            .expect("arrow expires");
        assert_eq!(expiry - stuck_at, 150);
        assert!(arrow.is_free());
    }

    #[test]
    fn leaving_the_grid_frees_the_slot() {
        let mut map = Map::new(4, 4);
        let mut interactives = Interactives::new(4, 4);
        let mut events = Vec::new();
        let mut goo = Projectile::new(ProjectileKind::Goo, Vec2::new(1.0, 1.0), Direction::Left);
        let steps = fly(&mut goo, &mut map, &mut interactives, &mut events, 60);
        assert!(steps.contains(&ProjectileStep::Expired));
        assert!(goo.is_free());
    }

    #[test]
    fn doors_block_unless_open_and_never_unlock() {
        let mut map = Map::new(8, 1);
        let mut interactives = Interactives::new(8, 1);
        let door_tile = TileCoord::new(5, 0);
        let door = Door {
            state: ExitState::Locked,
            direction: Direction::Right,
            target_map_index: 0,
            target_tile: TileCoord::new(0, 0),
        };
        interactives.set(door_tile, Interactive::Exit(door));
        let mut events = Vec::new();

        let mut arrow = Projectile::new(ProjectileKind::Arrow, Vec2::new(1.0, 0.0), Direction::Right);
        let steps = fly(&mut arrow, &mut map, &mut interactives, &mut events, 40);
        assert!(steps.contains(&ProjectileStep::Stuck));
        assert_eq!(*interactives.get_from_tile(door_tile), Interactive::Exit(door));
        assert!(events.is_empty());

        interactives.set(
            door_tile,
            Interactive::Exit(Door {
                state: ExitState::Open,
                ..door
            }),
        );
        let mut arrow = Projectile::new(ProjectileKind::Arrow, Vec2::new(1.0, 0.0), Direction::Right);
        let steps = fly(&mut arrow, &mut map, &mut interactives, &mut events, 60);
        assert!(!steps.contains(&ProjectileStep::Stuck));
        assert!(steps.contains(&ProjectileStep::Expired));
    }

    #[test]
    fn arrow_throws_levers_it_hits() {
        let mut map = Map::new(8, 1);
        let mut interactives = Interactives::new(8, 1);
        let lever_tile = TileCoord::new(4, 0);
        interactives.set(lever_tile, Interactive::Lever(Lever::default()));
        let mut events = Vec::new();

        let mut arrow = Projectile::new(ProjectileKind::Arrow, Vec2::new(0.5, 0.0), Direction::Right);
        let _ = fly(&mut arrow, &mut map, &mut interactives, &mut events, 30);
        assert!(events.contains(&Event::InteractiveActivated { tile: lever_tile }));
    }

    #[test]
    fn burning_torch_sets_arrow_alight_and_passes_it() {
        let mut map = Map::new(10, 1);
        let mut interactives = Interactives::new(10, 1);
        interactives.set(TileCoord::new(3, 0), Interactive::Torch(Torch { on: true }));
        let cold = TileCoord::new(6, 0);
        interactives.set(cold, Interactive::PushableTorch(Torch::default()));
        let mut events = Vec::new();

        let mut arrow = Projectile::new(ProjectileKind::Arrow, Vec2::new(0.5, 0.0), Direction::Right);
        let steps = fly(&mut arrow, &mut map, &mut interactives, &mut events, 40);
        assert!(arrow.on_fire);
        assert!(steps.contains(&ProjectileStep::Stuck));
        assert!(events.contains(&Event::TorchLit { tile: cold }));
        assert!(interactives
            .get_from_tile(cold)
            .torch()
            .is_some_and(|torch| torch.on));
    }

    #[test]
    fn stuck_arrow_follows_its_target_until_it_vanishes() {
        let mut map = Map::new(16, 16);
        let mut interactives = Interactives::new(16, 16);
        let mut events = Vec::new();
        let mut rat = Character::enemy(
            bryte_core::EnemyKind::Rat,
            Vec2::new(5.0, 5.0),
            Direction::Left,
        );
        rat.state = bryte_core::CharacterState::Alive;

        let mut arrow = Projectile::new(ProjectileKind::Arrow, Vec2::new(4.5, 5.0), Direction::Right);
        arrow.life_state = LifeState::Alive;
        let outcome = arrow.hit_character(CharacterRef::Player, &mut rat, KnockbackPolicy::Ignore);
        assert_eq!(outcome, DamageOutcome::Hurt);
        assert!(arrow.stuck);

        let anchor = Vec2::new(7.0, 5.0);
        let _ = arrow.update(FRAME, &mut map, &mut interactives, |_| Some(anchor), &mut events);
        assert_eq!(arrow.position, anchor + Vec2::new(-0.5, 0.0));

        let _ = arrow.update(FRAME, &mut map, &mut interactives, |_| None, &mut events);
        assert!(arrow.track.is_none());
    }
}
