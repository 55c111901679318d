// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type shared by the sprite codec.

use thiserror::Error;

use crate::codec::CodecError;

/// Errors raised while loading or storing sprite records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SprError {
    /// The binary stream was malformed or truncated.
    #[error("decode error: {0}")]
    Codec(#[from] CodecError),
    /// The mask carries bits outside the known attribute set.
    #[error("unknown attribute bits in mask: {0:#010x}")]
    UnknownMaskBits(u32),
    /// A node-type tag did not name a known node kind.
    #[error("unknown node type tag: {0}")]
    UnknownNodeType(u8),
    /// A file path could not be classified as any node kind.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    /// A JSON key was present with the wrong value type.
    #[error("json key {key:?}: expected {expected}")]
    JsonType {
        /// Offending key.
        key: &'static str,
        /// Expected JSON type.
        expected: &'static str,
    },
    /// A color string could not be parsed.
    #[error("invalid color: {0:?}")]
    Color(String),
    /// The operation is not implemented for this entity.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// Result alias for sprite codec operations.
pub type Result<T> = core::result::Result<T, SprError>;
