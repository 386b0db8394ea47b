//! Map-key decoder for CosmWasm contract storage.
//!
//! `Map` entries are stored under a composite key:
//!
//! ```text
//! [len][namespace bytes][len][first key part][remainder]
//! ```
//!
//! The namespace is the map name (e.g. `collaterals`); the first key part of
//! the Red Bank maps is the JSON-encoded user identifier. Anything after it
//! (denom, sub-keys) is ignored.

use redbank_common::types::AccountIdentifier;
use thiserror::Error;

use crate::KeyDecoder;

/// Anything shorter than this can't be a map entry keyed by an account.
pub const MIN_MAP_KEY_LEN: usize = 50;

/// Section of the composite key being read when decoding failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySection {
    MapName,
    Address,
}

impl std::fmt::Display for KeySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySection::MapName => write!(f, "map name"),
            KeySection::Address => write!(f, "address"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyDecodeError {
    #[error("key too short to be a map key: {len} bytes (minimum {min})")]
    TooShort { len: usize, min: usize },

    #[error("missing {section} length prefix")]
    MissingPrefix { section: KeySection },

    #[error("{section} length {wanted} exceeds remaining {remaining} bytes")]
    OutOfBounds {
        section: KeySection,
        wanted: usize,
        remaining: usize,
    },

    #[error("address payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Width of the length prefix in front of each key section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPrefix {
    /// Single length byte.
    OneByte,
    /// Big-endian u16, as written by cw-storage-plus.
    #[default]
    TwoBytes,
}

impl LengthPrefix {
    pub fn width(&self) -> usize {
        match self {
            LengthPrefix::OneByte => 1,
            LengthPrefix::TwoBytes => 2,
        }
    }

    /// Build from a configured width in bytes.
    pub fn from_width(width: u8) -> Option<Self> {
        match width {
            1 => Some(LengthPrefix::OneByte),
            2 => Some(LengthPrefix::TwoBytes),
            _ => None,
        }
    }

    /// Split a length prefix off the front of `bytes`.
    fn split<'a>(
        &self,
        bytes: &'a [u8],
        section: KeySection,
    ) -> Result<(usize, &'a [u8]), KeyDecodeError> {
        if bytes.len() < self.width() {
            return Err(KeyDecodeError::MissingPrefix { section });
        }
        let (prefix, rest) = bytes.split_at(self.width());
        let len = match self {
            LengthPrefix::OneByte => prefix[0] as usize,
            LengthPrefix::TwoBytes => u16::from_be_bytes([prefix[0], prefix[1]]) as usize,
        };
        Ok((len, rest))
    }
}

/// Layout of the composite keys to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLayout {
    pub prefix: LengthPrefix,
    pub min_len: usize,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self {
            prefix: LengthPrefix::default(),
            min_len: MIN_MAP_KEY_LEN,
        }
    }
}

/// Decoder for `Map<UserKey, _>` entries.
pub struct MapKeyDecoder {
    layout: KeyLayout,
}

impl MapKeyDecoder {
    pub fn new(layout: KeyLayout) -> Self {
        Self { layout }
    }

    /// Take `len` bytes off the front of `bytes`.
    fn take(
        bytes: &[u8],
        len: usize,
        section: KeySection,
    ) -> Result<(&[u8], &[u8]), KeyDecodeError> {
        if len > bytes.len() {
            return Err(KeyDecodeError::OutOfBounds {
                section,
                wanted: len,
                remaining: bytes.len(),
            });
        }
        Ok(bytes.split_at(len))
    }
}

impl Default for MapKeyDecoder {
    fn default() -> Self {
        Self::new(KeyLayout::default())
    }
}

impl KeyDecoder for MapKeyDecoder {
    fn decode(&self, key: &[u8]) -> Result<AccountIdentifier, KeyDecodeError> {
        if key.len() < self.layout.min_len {
            return Err(KeyDecodeError::TooShort {
                len: key.len(),
                min: self.layout.min_len,
            });
        }

        let prefix = self.layout.prefix;

        let (name_len, rest) = prefix.split(key, KeySection::MapName)?;
        let (_map_name, rest) = Self::take(rest, name_len, KeySection::MapName)?;

        let (addr_len, rest) = prefix.split(rest, KeySection::Address)?;
        let (payload, _remainder) = Self::take(rest, addr_len, KeySection::Address)?;

        let identifier = std::str::from_utf8(payload)?;
        Ok(AccountIdentifier::new(identifier))
    }

    fn name(&self) -> &'static str {
        "cw-storage-plus map"
    }
}
