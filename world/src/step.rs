//! Fixed-order frame orchestration.
//!
//! The player moves before the enemies, movement resolves before attacks,
//! interactives settle before projectiles fly, and the light field is rebuilt
//! once everything else has changed.

use std::time::Duration;

use bryte_core::{
    CharacterRef, Direction, EnemyKind, Event, ExitState, Handle, PickupKind, ProjectileKind,
    Rect, TileCoord,
};
use glam::Vec2;
use tracing::info;

use crate::{
    character::{Character, DamageOutcome},
    combat::determine_damage_direction,
    enemy::{Enemy, EnemyAction},
    interactives::Interactive,
    pickup::Pickup,
    pool::Pool,
    projectile::ProjectileStep,
    spawn_position, World,
};

/// Enemy slain this frame, captured before its slot is recycled.
struct Kill {
    enemy: Handle,
    kind: EnemyKind,
    position: Vec2,
    drop: PickupKind,
}

/// Walk inputs are applied in this order every frame.
const WALK_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Right,
    Direction::Left,
];

pub(crate) fn run_frame(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    let activate = apply_intents(world, dt, out_events);

    world
        .player
        .character
        .update(dt, &world.map, &world.interactives);
    resolve_push(world, out_events);

    let mut kills = Vec::new();
    update_enemies(world, dt, &mut kills, out_events);

    world.interactives.update(dt, out_events);

    if activate {
        if let Some(tile) = world.player.character.adjacent_tile(&world.map) {
            world.interactives.player_activate(
                tile,
                &mut world.player.key_count,
                &mut world.map,
                out_events,
            );
        }
    }

    update_projectiles(world, dt, &mut kills, out_events);
    for kill in kills {
        record_kill(world, kill, out_events);
    }

    collect_pickups(world, out_events);
    check_exit(world, out_events);

    if !world.player.character.is_alive() {
        respawn_player(world, out_events);
    }

    world.relight(out_events);
}

/// Feeds the latched inputs to the player. Returns whether an activation is pending.
fn apply_intents(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) -> bool {
    let player = &mut world.player;
    if world.intent.blocking {
        player.character.block();
    } else {
        player.character.stop_blocking();
    }

    for direction in WALK_ORDER {
        if world.intent.is_held(direction) {
            player.character.walk(direction);
        }
    }

    if world.intent.take_attack() {
        let _ = player.character.attack();
    }

    player.item_cooldown.tick(dt);
    if world.intent.take_fire() && player.character.is_alive() && player.use_bow() {
        let position = player.character.position;
        let facing = player.character.facing;
        let _ = world.spawn_projectile(ProjectileKind::Arrow, position, facing, out_events);
    }

    let player = &mut world.player;
    if world.intent.take_bomb() && player.character.is_alive() && player.use_bomb() {
        out_events.push(Event::BombUsed {
            position: player.character.collision_center(),
        });
    }

    world.intent.take_activate()
}

fn resolve_push(world: &mut World, out_events: &mut Vec<Event>) {
    if !world.player.character.ready_to_push() {
        return;
    }

    if let Some(tile) = world.player.character.adjacent_tile(&world.map) {
        let player = &world.player.character;
        let enemies = &world.enemies;
        let _ = world.interactives.push(
            tile,
            player.facing,
            &world.map,
            |destination| is_occupied(destination, player, enemies),
            out_events,
        );
    }
    world.player.character.finish_push();
}

fn is_occupied(tile: TileCoord, player: &Character, enemies: &Pool<Enemy>) -> bool {
    let bounds = tile.bounds();
    player.collision_rect().overlaps(&bounds)
        || enemies
            .iter()
            .any(|(_, enemy)| enemy.character.collision_rect().overlaps(&bounds))
}

fn update_enemies(
    world: &mut World,
    dt: Duration,
    kills: &mut Vec<Kill>,
    out_events: &mut Vec<Event>,
) {
    let policy = world.config.knockback;
    let mut spits = Vec::new();

    for handle in world.enemies.handles() {
        let Some(enemy) = world.enemies.get_mut(handle) else {
            continue;
        };

        if world.enemy_think {
            let target = world.player.character.collision_center();
            if let Some(EnemyAction::Spit { facing }) = enemy.think(target, &mut world.random, dt) {
                spits.push((enemy.character.position, facing));
            }
        }
        enemy
            .character
            .update(dt, &world.map, &world.interactives);

        let player = &mut world.player.character;
        if enemy.character.is_vulnerable()
            && player.accepts_damage(policy)
            && player.collides_with(&enemy.character)
        {
            let direction = determine_damage_direction(&enemy.character, player, &mut world.random);
            let outcome = player.damage(1, direction, policy);
            report_damage(CharacterRef::Player, outcome, direction, out_events);
        }

        if enemy.character.accepts_damage(policy) && player.attack_collides_with(&enemy.character) {
            let direction = determine_damage_direction(player, &enemy.character, &mut world.random);
            let outcome = enemy.character.damage(1, direction, policy);
            report_damage(CharacterRef::Enemy(handle), outcome, direction, out_events);
            if outcome == DamageOutcome::Killed {
                kills.push(Kill {
                    enemy: handle,
                    kind: enemy.kind,
                    position: enemy.character.position,
                    drop: enemy.drop,
                });
            }
        }
    }

    for (position, facing) in spits {
        let _ = world.spawn_projectile(ProjectileKind::Goo, position, facing, out_events);
    }
}

fn report_damage(
    target: CharacterRef,
    outcome: DamageOutcome,
    direction: Direction,
    out_events: &mut Vec<Event>,
) {
    if matches!(outcome, DamageOutcome::Hurt | DamageOutcome::Killed) {
        out_events.push(Event::CharacterDamaged {
            target,
            amount: 1,
            direction,
        });
    }
}

fn update_projectiles(
    world: &mut World,
    dt: Duration,
    kills: &mut Vec<Kill>,
    out_events: &mut Vec<Event>,
) {
    let policy = world.config.knockback;

    for handle in world.projectiles.handles() {
        let Some(projectile) = world.projectiles.get_mut(handle) else {
            continue;
        };

        let player = &world.player.character;
        let enemies = &world.enemies;
        let resolve = |target: CharacterRef| match target {
            CharacterRef::Player => player.is_alive().then_some(player.position),
            CharacterRef::Enemy(enemy) => enemies.get(enemy).map(|enemy| enemy.character.position),
        };
        match projectile.update(
            dt,
            &mut world.map,
            &mut world.interactives,
            resolve,
            out_events,
        ) {
            ProjectileStep::Moving => {}
            ProjectileStep::Stuck => out_events.push(Event::ProjectileStuck {
                projectile: handle,
                into: None,
            }),
            ProjectileStep::Expired => {
                out_events.push(Event::ProjectileExpired { projectile: handle });
                continue;
            }
        }

        if !projectile.in_flight() {
            continue;
        }

        let point = projectile.contact_point();
        let on_fire = projectile.on_fire;
        match projectile.kind {
            ProjectileKind::Arrow => {
                let struck = world.enemies.iter_mut().find(|(_, enemy)| {
                    enemy.character.is_vulnerable() && enemy.character.collision_rect().contains(point)
                });
                let Some((enemy_handle, enemy)) = struck else {
                    continue;
                };

                let target = CharacterRef::Enemy(enemy_handle);
                let outcome = projectile.hit_character(target, &mut enemy.character, policy);
                report_damage(target, outcome, projectile.facing, out_events);
                if on_fire {
                    out_events.push(Event::CharacterIgnited { target });
                }
                out_events.push(Event::ProjectileStuck {
                    projectile: handle,
                    into: Some(target),
                });
                if outcome == DamageOutcome::Killed {
                    kills.push(Kill {
                        enemy: enemy_handle,
                        kind: enemy.kind,
                        position: enemy.character.position,
                        drop: enemy.drop,
                    });
                }
            }
            ProjectileKind::Goo => {
                let player = &mut world.player.character;
                if !player.is_vulnerable() || !player.collision_rect().contains(point) {
                    continue;
                }

                let facing = projectile.facing;
                let outcome = projectile.hit_character(CharacterRef::Player, player, policy);
                report_damage(CharacterRef::Player, outcome, facing, out_events);
                if on_fire {
                    out_events.push(Event::CharacterIgnited {
                        target: CharacterRef::Player,
                    });
                }
                out_events.push(Event::ProjectileExpired { projectile: handle });
            }
        }
    }
}

fn record_kill(world: &mut World, kill: Kill, out_events: &mut Vec<Event>) {
    out_events.push(Event::EnemyKilled {
        enemy: kill.enemy,
        kind: kill.kind,
    });
    if kill.drop != PickupKind::None {
        world.spawn_pickup(kill.drop, kill.position, out_events);
    }
}

fn collect_pickups(world: &mut World, out_events: &mut Vec<Event>) {
    if !world.player.character.is_alive() {
        return;
    }

    let reach: Rect = world.player.character.collision_rect();
    for (_, pickup) in world.pickups.iter_mut() {
        if !pickup.rect().overlaps(&reach) {
            continue;
        }
        world.player.collect(pickup.kind);
        out_events.push(Event::PickupCollected { kind: pickup.kind });
        *pickup = Pickup::default();
    }
}

/// Moves the player through an open exit it is walking into.
fn check_exit(world: &mut World, out_events: &mut Vec<Event>) {
    if !world.player.character.is_alive() {
        return;
    }
    let Some(tile) = world.player.character.center_tile(&world.map) else {
        return;
    };
    let Some(Interactive::Exit(door)) = world.interactives.get(tile).copied() else {
        return;
    };
    if door.state != ExitState::Open
        || door.direction != world.player.character.facing.opposite()
    {
        return;
    }

    if world.enter_room(door.target_map_index, out_events) {
        world
            .player
            .character
            .set_collision_center(door.target_tile.center());
        out_events.push(Event::RoomEntered {
            index: door.target_map_index,
            tile: door.target_tile,
        });
    }
}

fn respawn_player(world: &mut World, out_events: &mut Vec<Event>) {
    out_events.push(Event::PlayerDied);
    info!(room = world.room_index, "player died");

    if world.enter_room(0, out_events) {
        world
            .player
            .respawn(spawn_position(world.config.player_spawn));
        out_events.push(Event::PlayerRespawned { room: 0 });
    }
}
