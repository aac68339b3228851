//! TOML configuration describing the world tunables and its master list.

use std::{
    fs,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use bryte_core::TileCoord;
use bryte_world::{map::Map, persistence, MasterList, RoomDefinition, RoomLayout, WorldConfig};
use serde::Deserialize;

/// Glyph of a solid wall tile in inline rows.
const WALL_GLYPH: char = '#';
/// Glyph of a walkable floor tile in inline rows.
const FLOOR_GLYPH: char = '.';
/// Tile value given to walls parsed from inline rows.
pub(crate) const WALL_VALUE: u8 = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    world: WorldConfig,
    #[serde(default)]
    rooms: Vec<RoomEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RoomEntry {
    #[serde(default)]
    tiles: Option<PathBuf>,
    #[serde(default)]
    rows: Option<Vec<String>>,
    #[serde(default)]
    layout: RoomLayout,
}

/// Everything needed to construct a world.
#[derive(Debug)]
pub(crate) struct Settings {
    /// World tunables.
    pub(crate) world: WorldConfig,
    /// Rooms in load order.
    pub(crate) master_list: MasterList,
}

/// Reads a config file. Room file paths resolve against the config's directory.
pub(crate) fn load(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    parse(&contents, base).with_context(|| format!("failed to load config {}", path.display()))
}

/// Parses config contents, resolving room files against `base`.
pub(crate) fn parse(contents: &str, base: &Path) -> Result<Settings> {
    let file: SettingsFile = toml::from_str(contents).context("failed to parse config")?;
    if file.rooms.is_empty() {
        bail!("config declares no rooms");
    }

    let mut master_list = MasterList::new(Vec::new());
    for (index, entry) in file.rooms.into_iter().enumerate() {
        let map = room_map(&entry, base).with_context(|| format!("invalid room {index}"))?;
        let _ = master_list.push(RoomDefinition::new(map, entry.layout));
    }

    Ok(Settings {
        world: file.world,
        master_list,
    })
}

fn room_map(entry: &RoomEntry, base: &Path) -> Result<Map> {
    match (&entry.tiles, &entry.rows) {
        (Some(tiles), None) => load_room_file(&base.join(tiles)),
        (None, Some(rows)) => parse_rows(rows),
        (Some(_), Some(_)) => bail!("set either `tiles` or `rows`, not both"),
        (None, None) => bail!("room needs `tiles` or `rows`"),
    }
}

/// Reads a binary room file.
pub(crate) fn load_room_file(path: &Path) -> Result<Map> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open room file {}", path.display()))?;
    persistence::read_room(BufReader::new(file))
        .with_context(|| format!("failed to decode room file {}", path.display()))
}

/// Builds a grid from glyph rows. The first row is the top of the room.
pub(crate) fn parse_rows(rows: &[String]) -> Result<Map> {
    let columns = rows.first().map_or(0, |row| row.chars().count());
    if columns == 0 {
        bail!("room rows are empty");
    }
    let width = u8::try_from(columns)
        .with_context(|| format!("room is {columns} tiles wide, at most 255 allowed"))?;
    let height = u8::try_from(rows.len())
        .with_context(|| format!("room is {} tiles tall, at most 255 allowed", rows.len()))?;

    let mut map = Map::new(width, height);
    for (row_index, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != columns {
            bail!("row {row_index} has {found} tiles, expected {columns}");
        }

        let y = u32::from(height) - 1 - row_index as u32;
        for (x, glyph) in row.chars().enumerate() {
            let tile = TileCoord::new(x as u32, y);
            match glyph {
                WALL_GLYPH => {
                    map.set_coordinate_value(tile, WALL_VALUE);
                    map.set_coordinate_solid(tile, true);
                }
                FLOOR_GLYPH => {}
                other => bail!("unknown glyph '{other}' at column {x} of row {row_index}"),
            }
        }
    }
    Ok(map)
}

/// Renders a grid as glyph rows, top row first.
pub(crate) fn render_rows(map: &Map) -> Vec<String> {
    (0..map.height())
        .rev()
        .map(|y| {
            (0..map.width())
                .map(|x| {
                    if map.get_coordinate_solid(TileCoord::new(x, y)) {
                        WALL_GLYPH
                    } else {
                        FLOOR_GLYPH
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bryte_core::{Direction, EnemyKind, ExitState, PickupKind};
    use bryte_world::{character::KnockbackPolicy, interactives::InteractiveSpec};

    const TWO_ROOMS: &str = r######"
        [world]
        seed = 7
        player_spawn = { x = 1, y = 1 }
        knockback = "restack"

        [[rooms]]
        rows = [
            "#####",
            "#...#",
            "#...#",
            "#####",
        ]

        [rooms.layout]
        base_light = 40

        [[rooms.layout.exits]]
        location = { x = 4, y = 1 }
        direction = "left"
        target_map_index = 1
        target_tile = { x = 1, y = 1 }
        state = "locked"

        [[rooms.layout.interactives]]
        tile = { x = 2, y = 2 }
        interactive = { kind = "torch", on = true }

        [[rooms.layout.enemies]]
        kind = "goo_slime"
        tile = { x = 3, y = 2 }
        drop = "key"

        [[rooms]]
        rows = ["###", "#.#", "###"]
    "######;

    #[test]
    fn parses_world_and_inline_rooms() {
        let settings = parse(TWO_ROOMS, Path::new(".")).expect("config parses");

        assert_eq!(settings.world.seed, 7);
        assert_eq!(settings.world.player_spawn, TileCoord::new(1, 1));
        assert_eq!(settings.world.knockback, KnockbackPolicy::Restack);
        assert_eq!(settings.world.enemy_capacity, WorldConfig::default().enemy_capacity);
        assert_eq!(settings.master_list.len(), 2);

        let first = settings.master_list.get(0).expect("first room");
        assert_eq!(first.layout.base_light, 40);
        assert_eq!(first.layout.exits[0].direction, Direction::Left);
        assert_eq!(first.layout.exits[0].state, ExitState::Locked);
        assert_eq!(
            first.layout.interactives[0].interactive,
            InteractiveSpec::Torch { on: true }
        );
        assert_eq!(first.layout.enemies[0].kind, EnemyKind::GooSlime);
        assert_eq!(first.layout.enemies[0].facing, Direction::Left);
        assert_eq!(first.layout.enemies[0].drop, PickupKind::Key);
    }

    #[test]
    fn first_row_is_the_top_of_the_room() {
        let rows = vec!["#..".to_owned(), "...".to_owned()];
        let map = parse_rows(&rows).expect("rows parse");

        assert_eq!((map.width(), map.height()), (3, 2));
        assert!(map.get_coordinate_solid(TileCoord::new(0, 1)));
        assert_eq!(map.get_coordinate_value(TileCoord::new(0, 1)), WALL_VALUE);
        assert!(!map.get_coordinate_solid(TileCoord::new(0, 0)));
        assert_eq!(render_rows(&map), rows);
    }

    #[test]
    fn ragged_or_unknown_rows_are_rejected() {
        assert!(parse_rows(&["###".to_owned(), "##".to_owned()]).is_err());
        assert!(parse_rows(&["#?#".to_owned()]).is_err());
        assert!(parse_rows(&[]).is_err());
    }

    #[test]
    fn room_needs_exactly_one_tile_source() {
        let neither = "[[rooms]]\n";
        let both = "[[rooms]]\ntiles = \"a.room\"\nrows = [\"#\"]\n";

        assert!(parse(neither, Path::new(".")).is_err());
        assert!(parse(both, Path::new(".")).is_err());
        assert!(parse("[world]\nseed = 1\n", Path::new(".")).is_err());
    }

    #[test]
    fn bundled_demo_builds_a_world() {
        let contents = include_str!("../../../demos/bryte.toml");
        let settings = parse(contents, Path::new("../../demos")).expect("demo parses");
        assert_eq!(settings.master_list.len(), 2);

        let world = bryte_world::World::new(settings.world, settings.master_list)
            .expect("demo world is valid");
        assert_eq!(bryte_world::query::enemy_count(&world), 1);
        assert_eq!(bryte_world::query::map(&world).width(), 10);
    }

    #[test]
    fn missing_room_file_names_the_path() {
        let config = "[[rooms]]\ntiles = \"missing.room\"\n";
        let error = parse(config, Path::new("/nonexistent")).expect_err("file is missing");

        assert!(format!("{error:#}").contains("missing.room"));
    }
}
