#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_chase_core::Level;

const TRANSFER_DOMAIN: &str = "chase";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const TRANSFER_HEADER: &str = "chase:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a level into a single-line string suitable for clipboard transfer.
pub(crate) fn encode(level: &Level) -> Result<String, LevelTransferError> {
    let json = serde_json::to_vec(level).map_err(LevelTransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    let size = level.grid.size();
    Ok(format!("{TRANSFER_HEADER}:{size}x{size}:{encoded}"))
}

/// Reports whether the value looks like a transfer string rather than a path.
#[must_use]
pub(crate) fn is_transfer_string(value: &str) -> bool {
    value
        .trim()
        .strip_prefix(TRANSFER_DOMAIN)
        .is_some_and(|rest| rest.starts_with(FIELD_DELIMITER))
}

/// Decodes a level from the provided transfer string.
pub(crate) fn decode(value: &str) -> Result<Level, LevelTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LevelTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LevelTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LevelTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LevelTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
    }

    let size = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LevelTransferError::InvalidEncoding)?;
    let level: Level =
        serde_json::from_slice(&bytes).map_err(LevelTransferError::InvalidPayload)?;

    if level.grid.size() != size {
        return Err(LevelTransferError::SizeMismatch {
            declared: size,
            actual: level.grid.size(),
        });
    }

    Ok(level)
}

/// Errors that can occur while converting levels to and from transfer strings.
#[derive(Debug)]
pub(crate) enum LevelTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the transfer string.
    MissingPrefix,
    /// The transfer string did not contain a version segment.
    MissingVersion,
    /// The transfer string did not include grid dimensions.
    MissingDimensions,
    /// The transfer string did not include the payload segment.
    MissingPayload,
    /// The transfer string used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The transfer string used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed or were not square.
    InvalidDimensions(String),
    /// The declared dimensions disagree with the decoded grid.
    SizeMismatch {
        /// Side length named in the header.
        declared: u32,
        /// Side length of the decoded grid.
        actual: u32,
    },
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for LevelTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "transfer string was empty"),
            Self::MissingPrefix => write!(f, "transfer string is missing the prefix"),
            Self::MissingVersion => write!(f, "transfer string is missing the version"),
            Self::MissingDimensions => write!(f, "transfer string is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "transfer string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "level prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "level version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse square grid dimensions '{dimensions}'")
            }
            Self::SizeMismatch { declared, actual } => write!(
                f,
                "header declares a {declared}x{declared} grid but the payload holds {actual}x{actual}"
            ),
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode level payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse level payload: {error}")
            }
        }
    }
}

impl Error for LevelTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<u32, LevelTransferError> {
    let invalid = || LevelTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || columns != rows {
        return Err(invalid());
    }

    Ok(columns)
}
