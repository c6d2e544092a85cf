//! Leaf Serialization
//!
//! The hasher never interprets block items; it consumes an injected
//! capability that turns one item into its canonical wire bytes. The
//! surrounding pipeline speaks protobuf, so the default codec wraps
//! [`prost::Message`]; tests and pre-serialized pipelines use the identity
//! codec over raw bytes.

use thiserror::Error;

// =============================================================================
// CODEC CONTRACT
// =============================================================================

/// Deterministic serialization of a block item into its hashable form.
///
/// Encoding must be a pure function of the item: the root digest is defined
/// over the serialized bytes, so two encoders disagreeing on the same item
/// produce different blocks.
pub trait LeafCodec<T>: Send + Sync {
    /// Encode one item to its canonical bytes.
    ///
    /// # Errors
    /// Returns [`CodecError`] when the item cannot be serialized; the error
    /// fails the whole block.
    fn encode(&self, item: &T) -> Result<Vec<u8>, CodecError>;
}

/// Error produced by a [`LeafCodec`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct CodecError {
    reason: String,
}

impl CodecError {
    /// Create a codec error from any displayable reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// PROTOBUF CODEC
// =============================================================================

/// Codec for protobuf block items: encodes via [`prost::Message`].
///
/// `prost` encoding is deterministic for a given message value, which is
/// exactly the property the root digest relies on.
#[cfg(feature = "protobuf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtoCodec;

#[cfg(feature = "protobuf")]
impl<M: prost::Message> LeafCodec<M> for ProtoCodec {
    fn encode(&self, item: &M) -> Result<Vec<u8>, CodecError> {
        Ok(item.encode_to_vec())
    }
}

// =============================================================================
// RAW-BYTES CODEC
// =============================================================================

/// Identity codec for items that already are their wire bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesCodec;

impl<T: AsRef<[u8]>> LeafCodec<T> for BytesCodec {
    fn encode(&self, item: &T) -> Result<Vec<u8>, CodecError> {
        Ok(item.as_ref().to_vec())
    }
}
