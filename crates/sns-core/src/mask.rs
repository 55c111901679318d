// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Attribute mask table and the size/pack/unpack logic driven by it.
//!
//! Every optional sprite attribute has one row in [`ATTRIBUTE_TABLE`]. The
//! row order is the mask bit order and the serialization order. Size, pack,
//! unpack, JSON extraction and typed decode all walk this one table.
//!
//! Packed layout is dense: an absent attribute occupies zero words, a present
//! one occupies [`Attribute::words`] consecutive u32 words.

use tracing::trace;

use crate::codec::{Reader, Writer};
use crate::color::ChannelOrder;
use crate::error::Result;
use crate::fixed::{decode_word, encode_word, HIGH_PRECISION, LOW_PRECISION};

/// Optional sprite attributes, in mask-bit and serialization order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AttributeKind {
    /// Non-uniform scale (x, y).
    Scale = 0,
    /// Shear (x, y).
    Shear = 1,
    /// Pivot offset (x, y).
    Offset = 2,
    /// Translation (x, y).
    Position = 3,
    /// Rotation angle.
    Angle = 4,
    /// Multiplicative color.
    ColorMul = 5,
    /// Additive color.
    ColorAdd = 6,
    /// Red channel remap.
    ColorR = 7,
    /// Green channel remap.
    ColorG = 8,
    /// Blue channel remap.
    ColorB = 9,
    /// Blend mode.
    Blend = 10,
    /// Fast-blend flag.
    FastBlend = 11,
    /// Filter mode.
    Filter = 12,
    /// Downsample level.
    Downsample = 13,
    /// Camera index.
    Camera = 14,
}

impl AttributeKind {
    /// Mask bit for this kind.
    #[inline]
    pub const fn bit(self) -> u32 {
        1 << self as u32
    }

    /// Table row for this kind.
    #[inline]
    pub fn attribute(self) -> &'static Attribute {
        &ATTRIBUTE_TABLE[self as usize]
    }

    /// Returns `true` if `mask` has this kind's bit set.
    #[inline]
    pub const fn is_set(self, mask: u32) -> bool {
        mask & self.bit() != 0
    }
}

/// How an attribute's words are encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Fixed point at the given precision, one word per component.
    Fixed(i32),
    /// Packed color word.
    Color(ChannelOrder),
    /// Channel remap: packed RGBA with the low byte cleared.
    ChannelRemap,
    /// Raw integer, stored verbatim.
    Raw,
}

/// Decoded attribute value. Table rows use it for their default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttrValue {
    /// Two-component float value.
    Pair(f32, f32),
    /// Scalar float value.
    Scalar(f32),
    /// Packed word.
    Word(u32),
}

/// Where a JSON source keeps an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JsonSource {
    /// Not authorable from JSON.
    None,
    /// Two sibling number keys, both required. `uniform` names a single key
    /// used for both components when the pair is incomplete.
    Pair {
        /// First component key.
        x: &'static str,
        /// Second component key.
        y: &'static str,
        /// Fallback key applied to both components.
        uniform: Option<&'static str>,
    },
    /// Object under `key` with numeric `x` and `y` members, both required.
    Point {
        /// Object key.
        key: &'static str,
    },
    /// Single number key.
    Scalar {
        /// Number key.
        key: &'static str,
    },
    /// Color string key.
    Color {
        /// String key.
        key: &'static str,
    },
}

/// One row of the attribute table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attribute {
    /// Kind this row describes.
    pub kind: AttributeKind,
    /// Width in packed u32 words.
    pub words: usize,
    /// Value that suppresses storage.
    pub default: AttrValue,
    /// Word encoding.
    pub encoding: Encoding,
    /// JSON key layout.
    pub json: JsonSource,
}

impl Attribute {
    /// Append the packed words for `value`.
    pub fn encode(&self, value: AttrValue, out: &mut Vec<u32>) {
        match (value, self.encoding) {
            (AttrValue::Pair(x, y), Encoding::Fixed(p)) => {
                out.extend([encode_word(x, p), encode_word(y, p)]);
            }
            (AttrValue::Scalar(v), Encoding::Fixed(p)) => out.push(encode_word(v, p)),
            (AttrValue::Pair(x, y), _) => out.extend([x.to_bits(), y.to_bits()]),
            (AttrValue::Scalar(v), _) => out.push(v.to_bits()),
            (AttrValue::Word(w), _) => out.push(w),
        }
    }

    /// Decode packed words into a value shaped like the row's default.
    pub fn decode(&self, words: &[u32]) -> AttrValue {
        let word = |idx: usize| words.get(idx).copied().unwrap_or_default();
        match (self.default, self.encoding) {
            (AttrValue::Pair(..), Encoding::Fixed(p)) => {
                AttrValue::Pair(decode_word(word(0), p), decode_word(word(1), p))
            }
            (AttrValue::Scalar(_), Encoding::Fixed(p)) => {
                AttrValue::Scalar(decode_word(word(0), p))
            }
            (AttrValue::Pair(..), _) => {
                AttrValue::Pair(f32::from_bits(word(0)), f32::from_bits(word(1)))
            }
            (AttrValue::Scalar(_), _) => AttrValue::Scalar(f32::from_bits(word(0))),
            (AttrValue::Word(_), _) => AttrValue::Word(word(0)),
        }
    }
}

/// Number of attribute kinds.
pub const ATTRIBUTE_COUNT: usize = 15;

/// All attributes, indexed by `AttributeKind as usize`.
pub static ATTRIBUTE_TABLE: [Attribute; ATTRIBUTE_COUNT] = [
    Attribute {
        kind: AttributeKind::Scale,
        words: 2,
        default: AttrValue::Pair(1.0, 1.0),
        encoding: Encoding::Fixed(HIGH_PRECISION),
        json: JsonSource::Pair {
            x: "x scale",
            y: "y scale",
            uniform: Some("scale"),
        },
    },
    Attribute {
        kind: AttributeKind::Shear,
        words: 2,
        default: AttrValue::Pair(0.0, 0.0),
        encoding: Encoding::Fixed(HIGH_PRECISION),
        json: JsonSource::Pair {
            x: "x shear",
            y: "y shear",
            uniform: None,
        },
    },
    Attribute {
        kind: AttributeKind::Offset,
        words: 2,
        default: AttrValue::Pair(0.0, 0.0),
        encoding: Encoding::Fixed(LOW_PRECISION),
        json: JsonSource::Pair {
            x: "x offset",
            y: "y offset",
            uniform: None,
        },
    },
    Attribute {
        kind: AttributeKind::Position,
        words: 2,
        default: AttrValue::Pair(0.0, 0.0),
        encoding: Encoding::Fixed(LOW_PRECISION),
        json: JsonSource::Point { key: "position" },
    },
    Attribute {
        kind: AttributeKind::Angle,
        words: 1,
        default: AttrValue::Scalar(0.0),
        encoding: Encoding::Fixed(HIGH_PRECISION),
        json: JsonSource::Scalar { key: "angle" },
    },
    Attribute {
        kind: AttributeKind::ColorMul,
        words: 1,
        default: AttrValue::Word(0xffff_ffff),
        encoding: Encoding::Color(ChannelOrder::Bgra),
        json: JsonSource::Color { key: "multi color" },
    },
    Attribute {
        kind: AttributeKind::ColorAdd,
        words: 1,
        default: AttrValue::Word(0x0000_0000),
        encoding: Encoding::Color(ChannelOrder::Abgr),
        json: JsonSource::Color { key: "add color" },
    },
    Attribute {
        kind: AttributeKind::ColorR,
        words: 1,
        default: AttrValue::Word(0xff00_0000),
        encoding: Encoding::ChannelRemap,
        json: JsonSource::Color { key: "r trans" },
    },
    Attribute {
        kind: AttributeKind::ColorG,
        words: 1,
        default: AttrValue::Word(0x00ff_0000),
        encoding: Encoding::ChannelRemap,
        json: JsonSource::Color { key: "g trans" },
    },
    Attribute {
        kind: AttributeKind::ColorB,
        words: 1,
        default: AttrValue::Word(0x0000_ff00),
        encoding: Encoding::ChannelRemap,
        json: JsonSource::Color { key: "b trans" },
    },
    Attribute {
        kind: AttributeKind::Blend,
        words: 1,
        default: AttrValue::Word(0),
        encoding: Encoding::Raw,
        json: JsonSource::None,
    },
    Attribute {
        kind: AttributeKind::FastBlend,
        words: 1,
        default: AttrValue::Word(0),
        encoding: Encoding::Raw,
        json: JsonSource::None,
    },
    Attribute {
        kind: AttributeKind::Filter,
        words: 1,
        default: AttrValue::Word(0),
        encoding: Encoding::Raw,
        json: JsonSource::None,
    },
    Attribute {
        kind: AttributeKind::Downsample,
        words: 1,
        default: AttrValue::Word(0),
        encoding: Encoding::Raw,
        json: JsonSource::None,
    },
    Attribute {
        kind: AttributeKind::Camera,
        words: 1,
        default: AttrValue::Word(0),
        encoding: Encoding::Raw,
        json: JsonSource::None,
    },
];

/// OR of every known attribute bit.
pub const KNOWN_BITS: u32 = (1 << ATTRIBUTE_COUNT) - 1;

/// Rows whose bit is set in `mask`, in table order.
pub fn present(mask: u32) -> impl Iterator<Item = &'static Attribute> {
    ATTRIBUTE_TABLE
        .iter()
        .filter(move |attr| attr.kind.is_set(mask))
}

/// Number of packed words `mask` describes. Unknown bits are ignored.
pub fn word_count(mask: u32) -> usize {
    present(mask).map(|attr| attr.words).sum()
}

/// Packed byte size for `mask`, rounded up to a multiple of 4.
pub fn data_size(mask: u32) -> usize {
    (word_count(mask) * 4 + 3) & !3
}

/// Walk `data` as the dense layout for `mask`, yielding each present field.
///
/// Stops early if `data` is shorter than `mask` requires.
pub fn fields(mask: u32, data: &[u32]) -> impl Iterator<Item = (AttributeKind, &[u32])> {
    let mut cursor = 0;
    present(mask).map_while(move |attr| {
        let words = data.get(cursor..cursor + attr.words)?;
        cursor += attr.words;
        Some((attr.kind, words))
    })
}

/// Read the fields `mask` names from `reader` into `out`.
///
/// `out` must hold exactly [`word_count`]`(mask)` words.
pub fn unpack_into(mask: u32, reader: &mut Reader<'_>, out: &mut [u32]) -> Result<()> {
    debug_assert_eq!(out.len(), word_count(mask));
    let mut cursor = 0;
    for attr in present(mask) {
        let end = cursor + attr.words;
        reader.read_words(&mut out[cursor..end])?;
        trace!(kind = ?attr.kind, words = ?&out[cursor..end], "unpacked field");
        cursor = end;
    }
    Ok(())
}

/// Read the fields `mask` names from `reader`.
pub fn unpack(mask: u32, reader: &mut Reader<'_>) -> Result<Vec<u32>> {
    let mut out = vec![0; word_count(mask)];
    unpack_into(mask, reader, &mut out)?;
    Ok(out)
}

/// Write `mask` followed by the fields it names, taken from `data`.
///
/// `mask` and `data` must already agree; this is not validated in release
/// builds.
pub fn pack(mask: u32, data: &[u32], writer: &mut Writer) {
    debug_assert_eq!(data.len(), word_count(mask));
    writer.write_u32_le(mask);
    for (_, words) in fields(mask, data) {
        writer.write_words(words);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_kind() {
        for (idx, attr) in ATTRIBUTE_TABLE.iter().enumerate() {
            assert_eq!(attr.kind as usize, idx);
            assert_eq!(attr.kind.bit(), 1 << idx);
        }
    }

    #[test]
    fn defaults_encode_to_declared_width() {
        for attr in &ATTRIBUTE_TABLE {
            let mut out = Vec::new();
            attr.encode(attr.default, &mut out);
            assert_eq!(out.len(), attr.words, "{:?}", attr.kind);
            assert_eq!(attr.decode(&out), attr.default, "{:?}", attr.kind);
        }
    }

    #[test]
    fn sizes_sum_present_widths() {
        assert_eq!(data_size(0), 0);
        assert_eq!(data_size(AttributeKind::Scale.bit()), 8);
        assert_eq!(data_size(AttributeKind::Angle.bit()), 4);
        assert_eq!(data_size(KNOWN_BITS), (4 * 2 + 11) * 4);
        assert_eq!(data_size(!KNOWN_BITS), 0);
    }

    #[test]
    fn fields_follow_table_order() {
        let mask =
            AttributeKind::Shear.bit() | AttributeKind::Scale.bit() | AttributeKind::Camera.bit();
        let data = [1, 2, 3, 4, 5];
        let got: Vec<_> = fields(mask, &data).collect();
        assert_eq!(
            got,
            vec![
                (AttributeKind::Scale, &[1, 2][..]),
                (AttributeKind::Shear, &[3, 4][..]),
                (AttributeKind::Camera, &[5][..]),
            ]
        );
    }

    #[test]
    fn pack_then_unpack() {
        let mask = AttributeKind::Position.bit() | AttributeKind::ColorAdd.bit();
        let data = [10, 20, 0x8000_0001];
        let mut w = Writer::default();
        pack(mask, &data, &mut w);
        let bytes = w.into_vec();
        assert_eq!(bytes.len(), 4 + data_size(mask));

        let mut r = Reader::new(&bytes);
        assert_eq!(r.read_u32_le().unwrap(), mask);
        assert_eq!(unpack(mask, &mut r).unwrap(), data);
    }

    #[test]
    fn unpack_reports_truncation() {
        let bytes = 7u32.to_le_bytes();
        let mut r = Reader::new(&bytes);
        assert!(unpack(AttributeKind::Scale.bit(), &mut r).is_err());
    }
}
