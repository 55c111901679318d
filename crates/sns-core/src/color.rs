// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Color strings to packed 32-bit words.
//!
//! Source strings always list channels in RGBA order (`0xRRGGBBAA`,
//! `#RRGGBB`, or a CSS color). [`ChannelOrder`] only selects how the four
//! channels are packed into the output word, first channel in the high byte.

use core::str::FromStr;
use csscolorparser::Color as CssColor;

use crate::error::{Result, SprError};

/// Byte order of a packed color word, most significant byte first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    /// `r << 24 | g << 16 | b << 8 | a`.
    Rgba,
    /// `b << 24 | g << 16 | r << 8 | a`.
    Bgra,
    /// `a << 24 | b << 16 | g << 8 | r`.
    Abgr,
    /// `a << 24 | r << 16 | g << 8 | b`.
    Argb,
}

impl ChannelOrder {
    /// Pack RGBA channels into a word.
    #[must_use]
    pub fn pack(self, [r, g, b, a]: [u8; 4]) -> u32 {
        let bytes = match self {
            Self::Rgba => [r, g, b, a],
            Self::Bgra => [b, g, r, a],
            Self::Abgr => [a, b, g, r],
            Self::Argb => [a, r, g, b],
        };
        u32::from_be_bytes(bytes)
    }

    /// Split a packed word back into RGBA channels.
    #[must_use]
    pub fn unpack(self, word: u32) -> [u8; 4] {
        let [x, y, z, w] = word.to_be_bytes();
        match self {
            Self::Rgba => [x, y, z, w],
            Self::Bgra => [z, y, x, w],
            Self::Abgr => [w, z, y, x],
            Self::Argb => [y, z, w, x],
        }
    }
}

/// Parse `text` and pack it in `order`.
pub fn parse_color(text: &str, order: ChannelOrder) -> Result<u32> {
    let trimmed = text.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .or_else(|| trimmed.strip_prefix('#'));
    let rgba = match hex {
        Some(digits) => parse_hex(digits).ok_or_else(|| SprError::Color(text.to_owned()))?,
        None => {
            let css = CssColor::from_str(trimmed).map_err(|_| SprError::Color(text.to_owned()))?;
            [css.r, css.g, css.b, css.a].map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8)
        }
    };
    Ok(order.pack(rgba))
}

fn parse_hex(digits: &str) -> Option<[u8; 4]> {
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    match digits.len() {
        8 => Some(value.to_be_bytes()),
        6 => {
            let [_, r, g, b] = value.to_be_bytes();
            Some([r, g, b, 0xff])
        }
        _ => None,
    }
}
