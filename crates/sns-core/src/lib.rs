// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sprite node attribute codec.
//!
//! A sprite's transform and render attributes are optional. Only the ones that
//! differ from their default are stored: a 32-bit mask names the attributes
//! present, and their packed 32-bit words follow in a fixed order.
//!
//! - [`mask`] is the attribute table and the size/pack/unpack logic driven by it.
//! - [`record`] holds [`SprBase`], the record that owns name, symbol path, mask
//!   and packed words, with binary and JSON loading.
//! - [`codec`] is the little-endian stream reader/writer.
//!
//! Loaded records borrow their strings and words from a caller-supplied
//! [`bumpalo::Bump`] and cannot outlive it.

pub mod codec;
pub mod color;
pub mod error;
pub mod fixed;
pub mod mask;
pub mod node_type;
pub mod record;

pub use codec::{CodecError, Reader, Writer};
pub use color::{parse_color, ChannelOrder};
pub use error::{Result, SprError};
pub use mask::{data_size, pack, unpack, AttrValue, AttributeKind, ATTRIBUTE_TABLE};
pub use node_type::{read_node_type, NodeType};
pub use record::{NodeSpr, SprBase};
