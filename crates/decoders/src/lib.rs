pub mod key;
pub mod proto;

#[cfg(test)]
mod decoder_tests;

use redbank_common::types::AccountIdentifier;

pub use key::{KeyDecodeError, KeyLayout, LengthPrefix, MapKeyDecoder};

/// Trait implemented by decoders that turn a raw contract-state key into an
/// account identifier.
pub trait KeyDecoder: Send + Sync {
    /// Attempt to recover the account identifier embedded in `key`.
    fn decode(&self, key: &[u8]) -> Result<AccountIdentifier, KeyDecodeError>;

    /// Human-readable name for this decoder (e.g., "cw-storage-plus map").
    fn name(&self) -> &'static str;
}
