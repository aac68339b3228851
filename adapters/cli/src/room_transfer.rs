#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use bryte_world::{
    map::Map,
    persistence::{self, RoomCodecError},
};

const TRANSFER_DOMAIN: &str = "room";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded room payload.
pub(crate) const TRANSFER_HEADER: &str = "room:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes the room grid into a single-line string suitable for pasting.
#[must_use]
pub(crate) fn encode(map: &Map) -> String {
    let encoded = STANDARD_NO_PAD.encode(persistence::encode_room(map));
    format!(
        "{TRANSFER_HEADER}:{}x{}:{encoded}",
        map.width(),
        map.height()
    )
}

/// Decodes a room grid from its transfer string.
pub(crate) fn decode(value: &str) -> Result<Map, RoomTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RoomTransferError::EmptyPayload);
    }

    let mut parts = trimmed.splitn(4, FIELD_DELIMITER);
    let domain = parts.next().ok_or(RoomTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(RoomTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(RoomTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(RoomTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(RoomTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(RoomTransferError::UnsupportedVersion(version.to_owned()));
    }

    let declared = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(RoomTransferError::InvalidEncoding)?;
    let map = persistence::decode_room(&bytes).map_err(RoomTransferError::InvalidPayload)?;

    let decoded = (map.width(), map.height());
    if decoded != declared {
        return Err(RoomTransferError::DimensionMismatch { declared, decoded });
    }
    Ok(map)
}

/// Errors that can occur while decoding room transfer strings.
#[derive(Debug)]
pub(crate) enum RoomTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing.
    MissingPrefix,
    /// The string did not contain a version segment.
    MissingVersion,
    /// The string did not include grid dimensions.
    MissingDimensions,
    /// The string did not include the payload segment.
    MissingPayload,
    /// The string used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The string used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded bytes were not a valid room file.
    InvalidPayload(RoomCodecError),
    /// The header disagreed with the room file it carried.
    DimensionMismatch {
        /// Columns and rows named in the header.
        declared: (u32, u32),
        /// Columns and rows stored in the payload.
        decoded: (u32, u32),
    },
}

impl fmt::Display for RoomTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "room string was empty"),
            Self::MissingPrefix => write!(f, "room string is missing the prefix"),
            Self::MissingVersion => write!(f, "room string is missing the version"),
            Self::MissingDimensions => write!(f, "room string is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "room string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "room prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "room version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => write!(f, "could not decode room payload: {error}"),
            Self::InvalidPayload(error) => write!(f, "could not parse room payload: {error}"),
            Self::DimensionMismatch { declared, decoded } => write!(
                f,
                "room string declares {}x{} but carries {}x{}",
                declared.0, declared.1, decoded.0, decoded.1
            ),
        }
    }
}

impl Error for RoomTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), RoomTransferError> {
    let invalid = || RoomTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 {
        return Err(invalid());
    }

    Ok((columns, rows))
}
