#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Bryte simulation headless and manages room files.

mod room_transfer;
mod script;
mod settings;

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use bryte_core::{Command, Event, TileCoord};
use bryte_system_input::{InputMapper, PlayerAnchor};
use bryte_world::{self as world, map::Map, persistence, query, World};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Headless driver and room tooling for Bryte.
#[derive(Debug, Parser)]
#[command(name = "bryte", version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Simulate a world described by a config file.
    Run(RunArgs),
    /// Create, inspect and transfer binary room files.
    #[command(subcommand)]
    Room(RoomCmd),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// TOML world configuration.
    #[arg(long)]
    config: PathBuf,
    /// Input script replayed line by line.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Idle frames simulated after the script.
    #[arg(long, default_value_t = 0)]
    frames: u32,
    /// Length of one frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Enable the rat spawn, key grant and AI toggle keys.
    #[arg(long)]
    debug_keys: bool,
    /// Save slot restored before the first frame.
    #[arg(long)]
    restore: Option<PathBuf>,
    /// Save slot written after the last frame.
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum RoomCmd {
    /// Write an empty room enclosed by walls.
    New {
        /// Columns.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
        width: u8,
        /// Rows.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
        height: u8,
        /// Destination room file.
        out: PathBuf,
    },
    /// Print a room file as glyph rows.
    Show {
        /// Room file.
        path: PathBuf,
    },
    /// Print a room file as a transfer string.
    Export {
        /// Room file.
        path: PathBuf,
    },
    /// Write a room file from a transfer string.
    Import {
        /// String produced by `room export`.
        value: String,
        /// Destination room file.
        out: PathBuf,
    },
}

/// Entry point for the Bryte command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Run(args) => run(&args),
        Cmd::Room(cmd) => room(cmd),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Counts of each event variant seen during a run.
#[derive(Debug, Default)]
struct EventTally {
    counts: BTreeMap<String, usize>,
}

impl EventTally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            let rendered = format!("{event:?}");
            let name = rendered
                .split([' ', '{', '('])
                .next()
                .unwrap_or_default()
                .to_owned();
            *self.counts.entry(name).or_default() += 1;
        }
    }
}

fn dispatch(world: &mut World, command: Command, tally: &mut EventTally) {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    tally.record(&events);
}

fn run(args: &RunArgs) -> Result<()> {
    let settings = settings::load(&args.config)?;
    let mut world =
        World::new(settings.world, settings.master_list).context("failed to build world")?;
    let steps = match &args.script {
        Some(path) => script::load(path)?,
        None => Vec::new(),
    };
    let mapper = InputMapper::new(args.debug_keys);
    let tick = Command::Tick {
        dt: Duration::from_millis(args.frame_ms),
    };
    let mut tally = EventTally::default();

    if let Some(path) = &args.restore {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read save slot {}", path.display()))?;
        let progress = persistence::decode_progress(&bytes)
            .with_context(|| format!("failed to decode save slot {}", path.display()))?;
        dispatch(&mut world, Command::RestoreProgress { progress }, &mut tally);
    }

    info!(rooms = query::room_count(&world), steps = steps.len(), "starting run");
    let mut commands = Vec::new();
    for step in &steps {
        let player = &query::player(&world).character;
        let anchor = PlayerAnchor {
            position: player.position,
            width: player.dimension.x,
        };
        mapper.handle(&step.batch, anchor, &mut commands);
        for command in commands.drain(..) {
            dispatch(&mut world, command, &mut tally);
        }
        for _ in 0..step.frames {
            dispatch(&mut world, tick.clone(), &mut tally);
        }
    }
    for _ in 0..args.frames {
        dispatch(&mut world, tick.clone(), &mut tally);
    }

    if let Some(path) = &args.save {
        let progress = query::player(&world).progress();
        let bytes = persistence::encode_progress(&progress).context("failed to encode save slot")?;
        fs::write(path, bytes)
            .with_context(|| format!("failed to write save slot {}", path.display()))?;
    }

    print_summary(&world, &tally);
    Ok(())
}

fn print_summary(world: &World, tally: &EventTally) {
    let player = query::player(world);
    let progress = player.progress();
    let position = player.character.position;

    println!(
        "room {} of {}, {} frames",
        query::room_index(world),
        query::room_count(world),
        query::tick_index(world)
    );
    println!(
        "player at ({:.2}, {:.2}) health {}/{} keys {} arrows {}/{} bombs {}/{}",
        position.x,
        position.y,
        progress.health,
        progress.max_health,
        progress.key_count,
        progress.arrow_count,
        progress.max_arrows,
        progress.bomb_count,
        progress.max_bombs
    );
    println!(
        "enemies {} projectiles {} pickups {}",
        query::enemy_count(world),
        query::projectiles(world).count(),
        query::pickups(world).count()
    );
    for (name, count) in &tally.counts {
        println!("  {name:<24} {count}");
    }
}

fn room(cmd: RoomCmd) -> Result<()> {
    match cmd {
        RoomCmd::New { width, height, out } => write_room(&walled_room(width, height), &out),
        RoomCmd::Show { path } => {
            let map = settings::load_room_file(&path)?;
            for row in settings::render_rows(&map) {
                println!("{row}");
            }
            Ok(())
        }
        RoomCmd::Export { path } => {
            let map = settings::load_room_file(&path)?;
            println!("{}", room_transfer::encode(&map));
            Ok(())
        }
        RoomCmd::Import { value, out } => {
            let map = room_transfer::decode(&value).context("failed to import room")?;
            write_room(&map, &out)
        }
    }
}

fn walled_room(width: u8, height: u8) -> Map {
    let mut map = Map::new(width, height);
    let (columns, rows) = (map.width(), map.height());
    for y in 0..rows {
        for x in 0..columns {
            if x == 0 || y == 0 || x + 1 == columns || y + 1 == rows {
                let tile = TileCoord::new(x, y);
                map.set_coordinate_value(tile, settings::WALL_VALUE);
                map.set_coordinate_solid(tile, true);
            }
        }
    }
    map
}

fn write_room(map: &Map, path: &Path) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create room file {}", path.display()))?;
    persistence::write_room(map, file)
        .with_context(|| format!("failed to write room file {}", path.display()))?;
    info!(path = %path.display(), width = map.width(), height = map.height(), "room written");
    Ok(())
}
