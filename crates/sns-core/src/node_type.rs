// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node-kind classification by file path and by binary tag.

use crate::codec::Reader;
use crate::error::{Result, SprError};

/// Scene node kinds. The discriminant is the binary tag; 0 is reserved as
/// the invalid tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeType {
    /// Bitmap image.
    Image = 1,
    /// Nine-slice image.
    Scale9 = 2,
    /// Icon.
    Icon = 3,
    /// Texture.
    Texture = 4,
    /// Text box.
    Textbox = 5,
    /// Complex (grouped) node.
    Complex = 6,
    /// Animation.
    Animation = 7,
    /// 3D particle system.
    Particle3d = 8,
    /// 2D particle system.
    Particle2d = 9,
    /// Vector shape.
    Shape = 10,
    /// Mesh.
    Mesh = 11,
    /// Mask.
    Mask = 12,
    /// Trail.
    Trail = 13,
    /// Skeleton.
    Skeleton = 14,
    /// Audio clip.
    Audio = 15,
}

const ALL: [NodeType; 15] = [
    NodeType::Image,
    NodeType::Scale9,
    NodeType::Icon,
    NodeType::Texture,
    NodeType::Textbox,
    NodeType::Complex,
    NodeType::Animation,
    NodeType::Particle3d,
    NodeType::Particle2d,
    NodeType::Shape,
    NodeType::Mesh,
    NodeType::Mask,
    NodeType::Trail,
    NodeType::Skeleton,
    NodeType::Audio,
];

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "bmp", "ppm", "pvr", "pkm"];

impl NodeType {
    /// Binary tag for this kind.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Kind for a binary tag.
    pub fn from_tag(tag: u8) -> Result<Self> {
        ALL.iter()
            .copied()
            .find(|ty| ty.tag() == tag)
            .ok_or(SprError::UnknownNodeType(tag))
    }

    /// Classify a file path by extension, and for `.json` files by the
    /// `_tag` suffix of the file stem (`hero_complex.json`).
    pub fn from_path(path: &str) -> Result<Self> {
        let unsupported = || SprError::UnsupportedFormat(path.to_owned());
        let (stem, ext) = path.rsplit_once('.').ok_or_else(unsupported)?;
        let ext = ext.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return Ok(Self::Image);
        }
        match ext.as_str() {
            "mp3" => Ok(Self::Audio),
            "json" => {
                let tag = stem.rsplit_once('_').map_or(stem, |(_, tag)| tag);
                Self::from_json_tag(&tag.to_ascii_lowercase()).ok_or_else(unsupported)
            }
            _ => Err(unsupported()),
        }
    }

    fn from_json_tag(tag: &str) -> Option<Self> {
        let ty = match tag {
            "scale9" => Self::Scale9,
            "icon" => Self::Icon,
            "texture" => Self::Texture,
            "text" => Self::Textbox,
            "complex" => Self::Complex,
            "anim" => Self::Animation,
            "particle" => Self::Particle3d,
            "particle2d" => Self::Particle2d,
            "shape" => Self::Shape,
            "mesh" => Self::Mesh,
            "mask" => Self::Mask,
            "trail" => Self::Trail,
            "skeleton" => Self::Skeleton,
            _ => return None,
        };
        Some(ty)
    }
}

/// Read a u8 node-type tag.
pub fn read_node_type(reader: &mut Reader<'_>) -> Result<NodeType> {
    NodeType::from_tag(reader.read_u8()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_by_extension() {
        assert_eq!(NodeType::from_path("a/b/hero.PNG").unwrap(), NodeType::Image);
        assert_eq!(NodeType::from_path("tex.pkm").unwrap(), NodeType::Image);
        assert_eq!(NodeType::from_path("boom.mp3").unwrap(), NodeType::Audio);
    }

    #[test]
    fn json_by_suffix_tag() {
        assert_eq!(
            NodeType::from_path("ui/panel_Scale9.json").unwrap(),
            NodeType::Scale9
        );
        assert_eq!(
            NodeType::from_path("fx/smoke_particle2d.json").unwrap(),
            NodeType::Particle2d
        );
        assert_eq!(
            NodeType::from_path("hero_walk_anim.json").unwrap(),
            NodeType::Animation
        );
    }

    #[test]
    fn unknown_paths_are_unsupported() {
        for path in ["readme", "scene.json", "hero_blob.json", "clip.wav"] {
            assert_eq!(
                NodeType::from_path(path),
                Err(SprError::UnsupportedFormat(path.to_owned()))
            );
        }
    }

    #[test]
    fn tags_round_trip_and_zero_is_invalid() {
        for ty in ALL {
            assert_eq!(NodeType::from_tag(ty.tag()).unwrap(), ty);
        }
        assert_eq!(NodeType::from_tag(0), Err(SprError::UnknownNodeType(0)));
        assert_eq!(NodeType::from_tag(200), Err(SprError::UnknownNodeType(200)));
    }

    #[test]
    fn reads_tag_from_stream() {
        let mut r = Reader::new(&[6]);
        assert_eq!(read_node_type(&mut r).unwrap(), NodeType::Complex);
        assert!(read_node_type(&mut r).is_err());
    }
}
