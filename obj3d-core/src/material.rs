//! Named surface materials and the library that holds them
use std::collections::HashMap;

use crate::geometry::Tuple3;

/// Reflectance, opacity and texture properties under one name
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: Option<Tuple3>,
    pub diffuse: Option<Tuple3>,
    pub specular: Option<Tuple3>,
    pub shininess: Option<f32>,
    /// 1.0 is fully opaque
    pub opacity: f32,
    /// Diffuse texture filename, as written in the library
    pub texture: Option<String>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: None,
            diffuse: None,
            specular: None,
            shininess: None,
            opacity: 1.0,
            texture: None,
        }
    }

    /// Diffuse color with opacity as alpha
    pub fn diffuse_rgba(&self) -> Option<[f32; 4]> {
        self.diffuse.map(|kd| [kd.x, kd.y, kd.z, self.opacity])
    }
}

/// Materials keyed by name, iterated in definition order.
///
/// Redefining a name replaces the earlier material but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    by_name: HashMap<String, usize>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material, returning the one it replaced, if any
    pub fn insert(&mut self, material: Material) -> Option<Material> {
        match self.by_name.get(&material.name) {
            Some(&slot) => Some(std::mem::replace(&mut self.materials[slot], material)),
            None => {
                self.by_name
                    .insert(material.name.clone(), self.materials.len());
                self.materials.push(material);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.by_name.get(name).map(|&slot| &self.materials[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().map(|m| m.name.as_str())
    }

    /// Merge another library into this one; its definitions win
    pub fn extend(&mut self, other: MaterialLibrary) {
        for material in other.materials {
            self.insert(material);
        }
    }
}
