//! Read-only model summary
use std::fmt;

use crate::loader::ObjModel;

/// Counts, extents and material usage of a loaded model
pub struct ModelReport<'a> {
    model: &'a ObjModel,
}

impl<'a> ModelReport<'a> {
    pub fn new(model: &'a ObjModel) -> Self {
        Self { model }
    }
}

impl fmt::Display for ModelReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.model;

        writeln!(f, "No. of vertices: {}", model.vertex_count())?;
        writeln!(f, "No. of normal coords: {}", model.normal_count())?;
        writeln!(f, "No. of tex coords: {}", model.buffers.tex_coords().len())?;
        writeln!(f, "No. of triangles: {}", model.triangle_count())?;
        if model.is_clean() {
            writeln!(f, "Clean load: yes")?;
        } else {
            writeln!(f, "Clean load: no ({} line(s) recovered)", model.failures.len())?;
        }

        match &model.extents {
            Some(extents) => {
                let (min, max, center) = (extents.min(), extents.max(), extents.center());
                writeln!(f, "x coords: {:.2} to {:.2}", min.x, max.x)?;
                writeln!(f, "  mid: {:.2}; width: {:.2}", center.x, extents.width())?;
                writeln!(f, "y coords: {:.2} to {:.2}", min.y, max.y)?;
                writeln!(f, "  mid: {:.2}; height: {:.2}", center.y, extents.height())?;
                writeln!(f, "z coords: {:.2} to {:.2}", min.z, max.z)?;
                writeln!(f, "  mid: {:.2}; depth: {:.2}", center.z, extents.depth())?;
                writeln!(f, "Largest dimension: {:.2}", extents.largest())?;
            }
            None => writeln!(f, "Extents: none")?,
        }

        writeln!(f, "No. of materials: {}", model.materials.len())?;
        for material in model.materials.iter() {
            writeln!(f, "{}", material.name)?;
            if let Some(ka) = material.ambient {
                writeln!(f, "  Ka: ( {}, {}, {} )", ka.x, ka.y, ka.z)?;
            }
            if let Some(kd) = material.diffuse {
                writeln!(f, "  Kd: ( {}, {}, {} )", kd.x, kd.y, kd.z)?;
            }
            if let Some(ks) = material.specular {
                writeln!(f, "  Ks: ( {}, {}, {} )", ks.x, ks.y, ks.z)?;
            }
            if let Some(ns) = material.shininess {
                writeln!(f, "  Ns: {}", ns)?;
            }
            if material.opacity != 1.0 {
                writeln!(f, "  d: {}", material.opacity)?;
            }
            if let Some(texture) = &material.texture {
                writeln!(f, "  Texture file: {}", texture)?;
            }
        }

        writeln!(
            f,
            "No. of materials used: {}",
            model.assignment.used_materials().count()
        )?;
        for (name, triangles) in model.assignment.used_materials() {
            writeln!(f, "{}: {}", name, triangles)?;
        }

        Ok(())
    }
}
