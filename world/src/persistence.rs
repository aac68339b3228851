//! Binary room files and save-slot records.
//!
//! A room file is a `width: u8, height: u8` header followed by
//! `width * height` records of `{ value: u8, solid: u8 }` in row-major
//! order. Light and exits are not persisted; they belong to the room layout.

use std::io::{self, Read, Write};

use bryte_core::PlayerProgress;
use thiserror::Error;

use crate::map::{Map, Tile};

/// Errors raised while decoding or writing room files.
#[derive(Debug, Error)]
pub enum RoomCodecError {
    /// The byte stream ended before the header or a tile record was complete.
    #[error("room data truncated: expected {expected} bytes, found {found}")]
    Truncated {
        /// Bytes required by the header.
        expected: usize,
        /// Bytes actually present.
        found: usize,
    },
    /// Bytes remained after the last tile record.
    #[error("room data has {0} trailing bytes")]
    TrailingBytes(usize),
    /// A solidity byte was neither 0 nor 1.
    #[error("tile {index} has invalid solidity byte {value}")]
    InvalidSolidity {
        /// Row-major index of the offending tile.
        index: usize,
        /// Byte that was read.
        value: u8,
    },
    /// The underlying reader or writer failed.
    #[error("room i/o failed")]
    Io(#[from] io::Error),
}

/// Errors raised while encoding or decoding save-slot records.
#[derive(Debug, Error)]
pub enum SaveSlotError {
    /// The record could not be serialized or deserialized.
    #[error("save slot record is malformed")]
    Codec(#[from] bincode::Error),
}

/// Serializes the tile grid into the room file format.
#[must_use]
pub fn encode_room(map: &Map) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(2 + map.tiles().len() * 2);
    bytes.push(map.width() as u8);
    bytes.push(map.height() as u8);
    for tile in map.tiles() {
        bytes.push(tile.value);
        bytes.push(u8::from(tile.solid));
    }
    bytes
}

/// Parses a room file, rejecting truncated or oversized input.
pub fn decode_room(bytes: &[u8]) -> Result<Map, RoomCodecError> {
    let [width, height, records @ ..] = bytes else {
        return Err(RoomCodecError::Truncated {
            expected: 2,
            found: bytes.len(),
        });
    };

    let expected = usize::from(*width) * usize::from(*height) * 2;
    if records.len() < expected {
        return Err(RoomCodecError::Truncated {
            expected: expected + 2,
            found: bytes.len(),
        });
    }
    if records.len() > expected {
        return Err(RoomCodecError::TrailingBytes(records.len() - expected));
    }

    let tiles = records
        .chunks_exact(2)
        .enumerate()
        .map(|(index, record)| {
            let solid = match record[1] {
                0 => false,
                1 => true,
                value => return Err(RoomCodecError::InvalidSolidity { index, value }),
            };
            Ok(Tile {
                value: record[0],
                solid,
                light: 0,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Map::from_tiles(*width, *height, tiles))
}

/// Writes the room file format to the provided sink.
pub fn write_room<W: Write>(map: &Map, mut writer: W) -> Result<(), RoomCodecError> {
    writer.write_all(&encode_room(map))?;
    Ok(())
}

/// Reads a complete room file from the provided source.
pub fn read_room<R: Read>(mut reader: R) -> Result<Map, RoomCodecError> {
    let mut bytes = Vec::new();
    let _ = reader.read_to_end(&mut bytes)?;
    decode_room(&bytes)
}

/// Serializes player progress in save-slot field order.
pub fn encode_progress(progress: &PlayerProgress) -> Result<Vec<u8>, SaveSlotError> {
    Ok(bincode::serialize(progress)?)
}

/// Parses a save-slot record produced by [`encode_progress`].
pub fn decode_progress(bytes: &[u8]) -> Result<PlayerProgress, SaveSlotError> {
    Ok(bincode::deserialize(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bryte_core::TileCoord;

    fn patterned_map() -> Map {
        let mut map = Map::new(5, 3);
        for y in 0..3 {
            for x in 0..5 {
                let tile = TileCoord::new(x, y);
                map.set_coordinate_value(tile, (x * 7 + y * 3) as u8);
                map.set_coordinate_solid(tile, x == 0 || y == 2);
            }
        }
        map
    }

    #[test]
    fn room_bytes_round_trip_exactly() {
        let map = patterned_map();
        let bytes = encode_room(&map);
        assert_eq!(bytes.len(), 2 + 5 * 3 * 2);
        assert_eq!(&bytes[..4], &[5, 3, 0, 1]);

        let decoded = decode_room(&bytes).expect("valid room");
        assert_eq!(decoded.tiles(), map.tiles());
        assert_eq!(encode_room(&decoded), bytes);
    }

    #[test]
    fn reader_and_writer_are_inverses() {
        let map = patterned_map();
        let mut buffer = Vec::new();
        write_room(&map, &mut buffer).expect("write to vec");
        let decoded = read_room(buffer.as_slice()).expect("read back");
        assert_eq!(encode_room(&decoded), buffer);
    }

    #[test]
    fn malformed_rooms_are_rejected() {
        assert!(matches!(
            decode_room(&[4]),
            Err(RoomCodecError::Truncated { .. })
        ));
        assert!(matches!(
            decode_room(&[1, 1, 9]),
            Err(RoomCodecError::Truncated { .. })
        ));
        assert!(matches!(
            decode_room(&[1, 1, 9, 0, 0]),
            Err(RoomCodecError::TrailingBytes(1))
        ));
        assert!(matches!(
            decode_room(&[1, 1, 9, 2]),
            Err(RoomCodecError::InvalidSolidity { index: 0, value: 2 })
        ));
    }

    #[test]
    fn progress_round_trips() {
        let progress = PlayerProgress {
            health: 25,
            max_health: 25,
            key_count: 2,
            arrow_count: 7,
            max_arrows: 10,
            bomb_count: 0,
            max_bombs: 4,
            has_bow: false,
        };
        let bytes = encode_progress(&progress).expect("encode");
        assert_eq!(bytes.len(), 4 + 4 + 6);
        assert_eq!(decode_progress(&bytes).expect("decode"), progress);
        assert!(decode_progress(&bytes[..5]).is_err());
    }
}
