// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sprite base record: name, symbol path, attribute mask and packed words.
//!
//! A record is produced once, by [`SprBase::load_from_bin`] or
//! [`SprBase::load_from_json`], and is read-only afterwards. Its strings and
//! words live in the caller's arena.
//!
//! JSON extraction policy, per attribute in table order:
//!
//! 1. look up the attribute's key(s); a missing key resolves to the default,
//! 2. compare the resolved value to the default with exact equality,
//! 3. if it differs, set the mask bit and append the encoded words.
//!
//! Blend, fast blend, filter, downsample and camera are not authorable from
//! JSON and are only ever loaded from binary.

use bumpalo::Bump;
use serde_json::Value;
use tracing::debug;

use crate::codec::{pack_size, Reader, Writer};
use crate::color::{parse_color, ChannelOrder};
use crate::error::{Result, SprError};
use crate::mask::{
    self, AttrValue, Attribute, AttributeKind, Encoding, JsonSource, ATTRIBUTE_TABLE, KNOWN_BITS,
};

/// Common interface of serializable sprite nodes.
///
/// Node kinds that embed a [`SprBase`] implement this; `SprBase` itself is
/// the plain-attributes implementation.
pub trait NodeSpr<'a> {
    /// Exact number of bytes [`NodeSpr::store_to_bin`] writes.
    fn bin_size(&self) -> usize;

    /// Write the binary form.
    fn store_to_bin(&self, writer: &mut Writer) -> Result<()>;

    /// Write the JSON form. Not supported unless a node kind provides it.
    fn store_to_json(&self, _val: &mut Value) -> Result<()> {
        Err(SprError::Unsupported("json store"))
    }

    /// Load from the binary form.
    fn load_from_bin(arena: &'a Bump, reader: &mut Reader<'_>) -> Result<Self>
    where
        Self: Sized;

    /// Load from a JSON object.
    fn load_from_json(arena: &'a Bump, val: &Value) -> Result<Self>
    where
        Self: Sized;

    /// Shared attribute record.
    fn base_info(&self) -> &SprBase<'a>;
}

/// Attribute record shared by every sprite node kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SprBase<'a> {
    sym_path: Option<&'a str>,
    name: Option<&'a str>,
    mask: u32,
    data: &'a [u32],
}

impl<'a> SprBase<'a> {
    /// Bytes written by [`SprBase::store_to_bin`].
    pub fn bin_size(&self) -> usize {
        pack_size(self.sym_path) + pack_size(self.name) + 4 + mask::data_size(self.mask)
    }

    /// Write symbol path, name, mask and packed words.
    pub fn store_to_bin(&self, writer: &mut Writer) -> Result<()> {
        let start = writer.len();
        writer.write_str(self.sym_path)?;
        writer.write_str(self.name)?;
        mask::pack(self.mask, self.data, writer);
        debug!(
            name = ?self.name,
            mask = format_args!("{:#x}", self.mask),
            bytes = writer.len() - start,
            "stored sprite record"
        );
        Ok(())
    }

    /// Load a record written by [`SprBase::store_to_bin`].
    ///
    /// Mask bits outside the known attribute set are rejected.
    pub fn load_from_bin(arena: &'a Bump, reader: &mut Reader<'_>) -> Result<Self> {
        let sym_path = copy_str(arena, reader.read_str()?);
        let name = copy_str(arena, reader.read_str()?);
        let mask = reader.read_u32_le()?;
        if mask & !KNOWN_BITS != 0 {
            return Err(SprError::UnknownMaskBits(mask & !KNOWN_BITS));
        }

        let words = mask::word_count(mask);
        let data: &'a [u32] = if words == 0 {
            &[]
        } else {
            let out = arena.alloc_slice_fill_copy(words, 0u32);
            mask::unpack_into(mask, reader, out)?;
            out
        };
        debug!(
            name = ?name,
            mask = format_args!("{mask:#x}"),
            words,
            "loaded sprite record from binary"
        );
        Ok(Self {
            sym_path,
            name,
            mask,
            data,
        })
    }

    /// Load a record from a JSON object, storing only non-default attributes.
    pub fn load_from_json(arena: &'a Bump, val: &Value) -> Result<Self> {
        if !val.is_object() {
            return Err(SprError::JsonType {
                key: "<root>",
                expected: "object",
            });
        }
        let name = copy_str(arena, json_str(val, "name")?);
        let sym_path = copy_str(arena, json_str(val, "filepath")?);

        let mut mask = 0;
        let mut words = Vec::new();
        for attr in &ATTRIBUTE_TABLE {
            let value = json_value(attr, val)?.unwrap_or(attr.default);
            if value != attr.default {
                mask |= attr.kind.bit();
                attr.encode(value, &mut words);
            }
        }

        let data: &'a [u32] = if words.is_empty() {
            &[]
        } else {
            arena.alloc_slice_copy(&words)
        };
        debug!(
            name = ?name,
            mask = format_args!("{mask:#x}"),
            words = data.len(),
            "loaded sprite record from json"
        );
        Ok(Self {
            sym_path,
            name,
            mask,
            data,
        })
    }

    /// Symbol path this sprite instantiates.
    pub fn sym_path(&self) -> Option<&'a str> {
        self.sym_path
    }

    /// Instance name.
    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    /// Bit set of stored attributes.
    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Packed attribute words, dense, in table order.
    pub fn data(&self) -> &'a [u32] {
        self.data
    }

    /// Returns `true` if `kind` is stored.
    pub fn has(&self, kind: AttributeKind) -> bool {
        kind.is_set(self.mask)
    }

    /// Stored words of `kind`, if present.
    pub fn raw(&self, kind: AttributeKind) -> Option<&'a [u32]> {
        mask::fields(self.mask, self.data)
            .find(|(k, _)| *k == kind)
            .map(|(_, words)| words)
    }

    /// Stored attributes with their decoded values, in table order.
    pub fn attributes(&self) -> impl Iterator<Item = (AttributeKind, AttrValue)> + 'a {
        mask::fields(self.mask, self.data)
            .map(|(kind, words)| (kind, kind.attribute().decode(words)))
    }

    /// Decoded value of `kind`, or its default when absent.
    pub fn value(&self, kind: AttributeKind) -> AttrValue {
        let attr = kind.attribute();
        self.raw(kind).map_or(attr.default, |words| attr.decode(words))
    }

    fn pair(&self, kind: AttributeKind) -> [f32; 2] {
        match self.value(kind) {
            AttrValue::Pair(x, y) => [x, y],
            AttrValue::Scalar(v) => [v, v],
            AttrValue::Word(_) => [0.0, 0.0],
        }
    }

    fn word(&self, kind: AttributeKind) -> u32 {
        match self.value(kind) {
            AttrValue::Word(w) => w,
            AttrValue::Pair(..) | AttrValue::Scalar(_) => 0,
        }
    }

    /// Scale (x, y).
    pub fn scale(&self) -> [f32; 2] {
        self.pair(AttributeKind::Scale)
    }

    /// Shear (x, y).
    pub fn shear(&self) -> [f32; 2] {
        self.pair(AttributeKind::Shear)
    }

    /// Pivot offset (x, y).
    pub fn offset(&self) -> [f32; 2] {
        self.pair(AttributeKind::Offset)
    }

    /// Position (x, y).
    pub fn position(&self) -> [f32; 2] {
        self.pair(AttributeKind::Position)
    }

    /// Rotation angle.
    pub fn angle(&self) -> f32 {
        match self.value(AttributeKind::Angle) {
            AttrValue::Scalar(v) => v,
            AttrValue::Pair(..) | AttrValue::Word(_) => 0.0,
        }
    }

    /// Multiplicative color, packed BGRA.
    pub fn color_mul(&self) -> u32 {
        self.word(AttributeKind::ColorMul)
    }

    /// Additive color, packed ABGR.
    pub fn color_add(&self) -> u32 {
        self.word(AttributeKind::ColorAdd)
    }

    /// Red channel remap, packed RGBA.
    pub fn color_r(&self) -> u32 {
        self.word(AttributeKind::ColorR)
    }

    /// Green channel remap, packed RGBA.
    pub fn color_g(&self) -> u32 {
        self.word(AttributeKind::ColorG)
    }

    /// Blue channel remap, packed RGBA.
    pub fn color_b(&self) -> u32 {
        self.word(AttributeKind::ColorB)
    }

    /// Blend mode.
    pub fn blend(&self) -> u32 {
        self.word(AttributeKind::Blend)
    }

    /// Fast-blend flag.
    pub fn fast_blend(&self) -> u32 {
        self.word(AttributeKind::FastBlend)
    }

    /// Filter mode.
    pub fn filter(&self) -> u32 {
        self.word(AttributeKind::Filter)
    }

    /// Downsample level.
    pub fn downsample(&self) -> u32 {
        self.word(AttributeKind::Downsample)
    }

    /// Camera index.
    pub fn camera(&self) -> u32 {
        self.word(AttributeKind::Camera)
    }
}

impl<'a> NodeSpr<'a> for SprBase<'a> {
    fn bin_size(&self) -> usize {
        SprBase::bin_size(self)
    }

    fn store_to_bin(&self, writer: &mut Writer) -> Result<()> {
        SprBase::store_to_bin(self, writer)
    }

    fn load_from_bin(arena: &'a Bump, reader: &mut Reader<'_>) -> Result<Self> {
        SprBase::load_from_bin(arena, reader)
    }

    fn load_from_json(arena: &'a Bump, val: &Value) -> Result<Self> {
        SprBase::load_from_json(arena, val)
    }

    fn base_info(&self) -> &SprBase<'a> {
        self
    }
}

fn copy_str<'a>(arena: &'a Bump, value: Option<&str>) -> Option<&'a str> {
    value
        .filter(|s| !s.is_empty())
        .map(|s| &*arena.alloc_str(s))
}

fn json_str<'v>(val: &'v Value, key: &'static str) -> Result<Option<&'v str>> {
    match val.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(SprError::JsonType {
            key,
            expected: "string",
        }),
    }
}

fn json_f32(val: &Value, key: &'static str) -> Result<Option<f32>> {
    match val.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .map(|n| Some(n as f32))
            .ok_or(SprError::JsonType {
                key,
                expected: "number",
            }),
    }
}

/// Resolve `attr` from `val`; `None` when its keys are absent or incomplete.
fn json_value(attr: &Attribute, val: &Value) -> Result<Option<AttrValue>> {
    let value = match attr.json {
        JsonSource::None => None,
        JsonSource::Pair { x, y, uniform } => match (json_f32(val, x)?, json_f32(val, y)?) {
            (Some(x), Some(y)) => Some(AttrValue::Pair(x, y)),
            _ => match uniform {
                Some(key) => json_f32(val, key)?.map(|v| AttrValue::Pair(v, v)),
                None => None,
            },
        },
        JsonSource::Point { key } => match val.get(key) {
            None => None,
            Some(point) if point.is_object() => {
                match (json_f32(point, "x")?, json_f32(point, "y")?) {
                    (Some(x), Some(y)) => Some(AttrValue::Pair(x, y)),
                    _ => None,
                }
            }
            Some(_) => {
                return Err(SprError::JsonType {
                    key,
                    expected: "object",
                })
            }
        },
        JsonSource::Scalar { key } => json_f32(val, key)?.map(AttrValue::Scalar),
        JsonSource::Color { key } => match json_str(val, key)? {
            None => None,
            Some(text) => Some(AttrValue::Word(color_word(attr.encoding, text)?)),
        },
    };
    Ok(value)
}

fn color_word(encoding: Encoding, text: &str) -> Result<u32> {
    match encoding {
        Encoding::Color(order) => parse_color(text, order),
        Encoding::ChannelRemap => Ok(parse_color(text, ChannelOrder::Rgba)? & 0xffff_ff00),
        Encoding::Fixed(_) | Encoding::Raw => {
            Err(SprError::Unsupported("color key on non-color attribute"))
        }
    }
}
