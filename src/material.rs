//! Surface descriptions.
//!
//! A [`Material`] says how the pixels of a mesh are colored: which lighting
//! model to use, the base color, whether the mesh is drawn as triangle edges
//! only, which faces are visible, and an optional texture. The GPU mirror
//! packs these into the per-object uniform every frame, so a material edit is
//! visible on the very next draw.

use crate::color::Color;
use crate::resources::TextureId;

/// Lighting model of a material.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MaterialKind {
    /// Flat color, no lighting.
    Basic,
    /// Diffuse only.
    Lambert,
    /// Diffuse plus a Blinn-Phong specular highlight.
    Phong { shininess: f32 },
    /// Roughness/metalness approximation of physically based shading.
    Standard { roughness: f32, metalness: f32 },
    /// View-space normal mapped to RGB.
    Normal,
    /// Unlit line.
    LineBasic,
    /// Unlit line broken into dashes by distance travelled.
    LineDashed { dash_size: f32, gap_size: f32 },
    /// Camera-facing textured quad.
    Sprite,
}

/// Which triangle faces are rasterized.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Front,
    Double,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Color,
    pub opacity: f32,
    pub wireframe: bool,
    pub side: Side,
    pub map: Option<TextureId>,
}

impl Material {
    fn with_kind(kind: MaterialKind, color: Color) -> Self {
        Self {
            kind,
            color,
            opacity: 1.0,
            wireframe: false,
            side: Side::Front,
            map: None,
        }
    }

    pub fn basic(color: Color) -> Self {
        Self::with_kind(MaterialKind::Basic, color)
    }

    pub fn lambert(color: Color) -> Self {
        Self::with_kind(MaterialKind::Lambert, color)
    }

    pub fn phong(color: Color, shininess: f32) -> Self {
        Self::with_kind(MaterialKind::Phong { shininess }, color)
    }

    /// Standard material with the usual defaults (rough, non-metallic).
    pub fn standard(color: Color) -> Self {
        Self::pbr(color, 1.0, 0.0)
    }

    pub fn pbr(color: Color, roughness: f32, metalness: f32) -> Self {
        Self::with_kind(
            MaterialKind::Standard {
                roughness,
                metalness,
            },
            color,
        )
    }

    pub fn normal() -> Self {
        Self::with_kind(MaterialKind::Normal, Color::WHITE)
    }

    pub fn line(color: Color) -> Self {
        Self::with_kind(MaterialKind::LineBasic, color)
    }

    pub fn dashed(color: Color, dash_size: f32, gap_size: f32) -> Self {
        Self::with_kind(
            MaterialKind::LineDashed {
                dash_size,
                gap_size,
            },
            color,
        )
    }

    pub fn sprite(map: TextureId) -> Self {
        Self::with_kind(MaterialKind::Sprite, Color::WHITE).with_map(map)
    }

    pub fn with_map(mut self, map: TextureId) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Whether the material reacts to scene lights.
    pub fn is_lit(&self) -> bool {
        matches!(
            self.kind,
            MaterialKind::Lambert | MaterialKind::Phong { .. } | MaterialKind::Standard { .. }
        )
    }

    pub fn is_line(&self) -> bool {
        matches!(
            self.kind,
            MaterialKind::LineBasic | MaterialKind::LineDashed { .. }
        )
    }

    /// Translucent materials are drawn after opaque ones and do not write
    /// depth. Sprites always count as translucent because their textures are
    /// mostly empty.
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0 || self.color.a < 1.0 || matches!(self.kind, MaterialKind::Sprite)
    }

    /// Shading selector understood by `mesh.wgsl`.
    pub fn shading_code(&self) -> u32 {
        match self.kind {
            MaterialKind::Basic
            | MaterialKind::LineBasic
            | MaterialKind::LineDashed { .. }
            | MaterialKind::Sprite => 0,
            MaterialKind::Lambert => 1,
            MaterialKind::Phong { .. } => 2,
            MaterialKind::Standard { .. } => 3,
            MaterialKind::Normal => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PURPLE;

    #[test]
    fn lighting_classification() {
        assert!(Material::standard(PURPLE).is_lit());
        assert!(Material::phong(PURPLE, 100.0).is_lit());
        assert!(!Material::basic(PURPLE).is_lit());
        assert!(!Material::normal().is_lit());
        assert!(Material::dashed(PURPLE, 0.2, 0.1).is_line());
    }

    #[test]
    fn translucency_comes_from_color_or_opacity() {
        assert!(!Material::basic(PURPLE).is_transparent());
        assert!(Material::basic(PURPLE.with_alpha(0.3)).is_transparent());
        assert!(Material::basic(PURPLE).with_opacity(0.5).is_transparent());
    }
}
