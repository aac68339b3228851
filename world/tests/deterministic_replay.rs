use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use bryte_core::{Command, Direction, EnemyKind, PickupKind, PlayerProgress, TileCoord};
use bryte_world::{
    self as world, interactives::InteractiveSpec, map::Map, query, EnemySpawn,
    InteractivePlacement, MasterList, RoomDefinition, RoomLayout, World, WorldConfig,
};
use glam::Vec2;

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert!(
        first.events.len() > 100,
        "script should exercise the world, got {} events",
        first.events.len()
    );
    assert_eq!(first.fingerprint(), second.fingerprint());
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let config = WorldConfig {
        player_spawn: TileCoord::new(2, 2),
        ..WorldConfig::default()
    };
    let mut world = World::new(config, MasterList::new(vec![arena()])).expect("valid world");
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        log.extend(events.iter().map(|event| format!("{event:?}")));
    }

    ReplayOutcome {
        player: snapshot_position(query::player(&world).character.position),
        enemies: query::enemies(&world)
            .map(|(_, enemy)| snapshot_position(enemy.character.position))
            .collect(),
        events: log,
    }
}

fn arena() -> RoomDefinition {
    let mut map = Map::new(14, 10);
    for x in 0..14 {
        map.set_coordinate_solid(TileCoord::new(x, 0), true);
        map.set_coordinate_solid(TileCoord::new(x, 9), true);
    }
    for y in 0..10 {
        map.set_coordinate_solid(TileCoord::new(0, y), true);
        map.set_coordinate_solid(TileCoord::new(13, y), true);
    }

    let layout = RoomLayout {
        interactives: vec![
            InteractivePlacement {
                tile: TileCoord::new(6, 6),
                interactive: InteractiveSpec::Torch { on: true },
            },
            InteractivePlacement {
                tile: TileCoord::new(7, 6),
                interactive: InteractiveSpec::Torch { on: false },
            },
            InteractivePlacement {
                tile: TileCoord::new(4, 3),
                interactive: InteractiveSpec::PushableBlock,
            },
        ],
        enemies: vec![
            EnemySpawn {
                kind: EnemyKind::Rat,
                tile: TileCoord::new(9, 4),
                facing: Direction::Left,
                drop: PickupKind::Key,
            },
            EnemySpawn {
                kind: EnemyKind::Bat,
                tile: TileCoord::new(10, 7),
                facing: Direction::Down,
                drop: PickupKind::Health,
            },
            EnemySpawn {
                kind: EnemyKind::GooSlime,
                tile: TileCoord::new(11, 2),
                facing: Direction::Left,
                drop: PickupKind::Arrow,
            },
        ],
        ..RoomLayout::default()
    };
    RoomDefinition::new(map, layout)
}

fn scripted_commands() -> Vec<Command> {
    let frame = Command::Tick {
        dt: Duration::from_millis(16),
    };
    let mut commands = vec![
        Command::RestoreProgress {
            progress: PlayerProgress {
                health: 25,
                max_health: 25,
                key_count: 0,
                arrow_count: 10,
                max_arrows: 10,
                bomb_count: 0,
                max_bombs: 4,
                has_bow: true,
            },
        },
        Command::SpawnEnemy {
            kind: EnemyKind::Rat,
            position: Vec2::new(5.0, 5.0),
            facing: Direction::Up,
            drop: PickupKind::Bomb,
        },
    ];

    let legs = [
        (Direction::Right, 40),
        (Direction::Up, 25),
        (Direction::Left, 30),
        (Direction::Down, 20),
        (Direction::Right, 60),
    ];
    for (direction, frames) in legs {
        commands.push(Command::SetDirectionHeld {
            direction,
            held: true,
        });
        for index in 0..frames {
            if index % 12 == 0 {
                commands.push(Command::TriggerAttack);
            }
            if index % 20 == 5 {
                commands.push(Command::TriggerFire);
            }
            commands.push(frame.clone());
        }
        commands.push(Command::SetDirectionHeld {
            direction,
            held: false,
        });
        commands.push(Command::TriggerActivate);
        commands.push(frame.clone());
    }

    commands.push(Command::SetBlocking { held: true });
    commands.extend(std::iter::repeat(frame.clone()).take(60));
    commands.push(Command::SetBlocking { held: false });
    commands.extend(std::iter::repeat(frame).take(120));
    commands
}

fn snapshot_position(position: Vec2) -> (u32, u32) {
    (position.x.to_bits(), position.y.to_bits())
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    player: (u32, u32),
    enemies: Vec<(u32, u32)>,
    events: Vec<String>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
