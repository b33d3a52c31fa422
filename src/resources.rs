//! # Resource arena
//!
//! Geometries, materials and textures live in a [`Resources`] arena owned by
//! the scene and are referenced from nodes by small copyable ids. Several
//! nodes can share one resource (the drawing demo uses one dot geometry for
//! every dot), so removing a node never frees what it points at. Resources are
//! freed only through an explicit `release_*` call.
//!
//! Each release is appended to a log that the GPU mirror drains once per
//! frame ([`Resources::take_released`]) to destroy the matching buffers and
//! textures.

use std::collections::BTreeMap;

use crate::geometry::Geometry;
use crate::material::Material;

macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);
    };
}

resource_id!(
    /// Handle to a [`Geometry`] stored in [`Resources`].
    GeometryId
);
resource_id!(
    /// Handle to a [`Material`] stored in [`Resources`].
    MaterialId
);
resource_id!(
    /// Handle to a [`TextureImage`] stored in [`Resources`].
    TextureId
);

/// An RGBA8 image, row-major, top row first, straight alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Reads one pixel, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let p = self.pixels.get(offset..offset + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// Record of one released resource, consumed by the GPU mirror.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Released {
    Geometry(GeometryId),
    Material(MaterialId),
    Texture(TextureId),
}

struct Slots<T> {
    next: u64,
    items: BTreeMap<u64, T>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            next: 0,
            items: BTreeMap::new(),
        }
    }
}

impl<T> Slots<T> {
    fn insert(&mut self, item: T) -> u64 {
        let id = self.next;
        self.next += 1;
        self.items.insert(id, item);
        id
    }
}

/// Id-keyed storage for everything a scene can hand to the GPU.
#[derive(Default)]
pub struct Resources {
    geometries: Slots<Geometry>,
    materials: Slots<Material>,
    textures: Slots<TextureImage>,
    released: Vec<Released>,
}

impl Resources {
    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        GeometryId(self.geometries.insert(geometry))
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        MaterialId(self.materials.insert(material))
    }

    pub fn add_texture(&mut self, texture: TextureImage) -> TextureId {
        TextureId(self.textures.insert(texture))
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.items.get(&id.0)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.items.get(&id.0)
    }

    /// Materials are the only mutable resource: their parameters are
    /// re-uploaded every frame, so editing one in place is enough to recolor
    /// every node that uses it.
    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.items.get_mut(&id.0)
    }

    pub fn texture(&self, id: TextureId) -> Option<&TextureImage> {
        self.textures.items.get(&id.0)
    }

    /// Frees a geometry. Returns `false` if it was already gone.
    pub fn release_geometry(&mut self, id: GeometryId) -> bool {
        let removed = self.geometries.items.remove(&id.0).is_some();
        if removed {
            log::debug!("Released geometry {}", id.0);
            self.released.push(Released::Geometry(id));
        }
        removed
    }

    pub fn release_material(&mut self, id: MaterialId) -> bool {
        let removed = self.materials.items.remove(&id.0).is_some();
        if removed {
            log::debug!("Released material {}", id.0);
            self.released.push(Released::Material(id));
        }
        removed
    }

    pub fn release_texture(&mut self, id: TextureId) -> bool {
        let removed = self.textures.items.remove(&id.0).is_some();
        if removed {
            log::debug!("Released texture {}", id.0);
            self.released.push(Released::Texture(id));
        }
        removed
    }

    /// Frees every resource still alive.
    pub fn release_all(&mut self) {
        let geometries: Vec<u64> = self.geometries.items.keys().copied().collect();
        let materials: Vec<u64> = self.materials.items.keys().copied().collect();
        let textures: Vec<u64> = self.textures.items.keys().copied().collect();
        for id in geometries {
            self.release_geometry(GeometryId(id));
        }
        for id in materials {
            self.release_material(MaterialId(id));
        }
        for id in textures {
            self.release_texture(TextureId(id));
        }
    }

    /// Drains the release log.
    pub fn take_released(&mut self) -> Vec<Released> {
        std::mem::take(&mut self.released)
    }

    pub fn live_geometries(&self) -> usize {
        self.geometries.items.len()
    }

    pub fn live_materials(&self) -> usize {
        self.materials.items.len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PURPLE;

    #[test]
    fn release_is_logged_once() {
        let mut resources = Resources::default();
        let id = resources.add_geometry(Geometry::plane(1.0, 1.0));
        assert!(resources.release_geometry(id));
        assert!(!resources.release_geometry(id));
        assert_eq!(resources.take_released(), vec![Released::Geometry(id)]);
        assert!(resources.take_released().is_empty());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut resources = Resources::default();
        let first = resources.add_material(Material::basic(PURPLE));
        resources.release_material(first);
        let second = resources.add_material(Material::basic(PURPLE));
        assert_ne!(first, second);
        assert!(resources.material(first).is_none());
    }

    #[test]
    fn release_all_empties_every_slot() {
        let mut resources = Resources::default();
        resources.add_geometry(Geometry::plane(1.0, 1.0));
        resources.add_material(Material::basic(PURPLE));
        resources.add_texture(TextureImage {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        });
        resources.release_all();
        assert_eq!(resources.live_geometries(), 0);
        assert_eq!(resources.live_materials(), 0);
        assert_eq!(resources.live_textures(), 0);
        assert_eq!(resources.take_released().len(), 3);
    }

    #[test]
    fn pixel_lookup_is_bounds_checked() {
        let image = TextureImage {
            width: 2,
            height: 1,
            pixels: vec![1, 2, 3, 4, 5, 6, 7, 8],
        };
        assert_eq!(image.pixel(1, 0), Some([5, 6, 7, 8]));
        assert_eq!(image.pixel(2, 0), None);
    }
}
