//! Second pass: parse the stream into preallocated buffers
//!
//! Faces are fan-triangulated around their first corner as they are read.
//! Per-line problems are recovered in place and recorded; every slot the
//! analyzer sized is still written so indices stay aligned.
use std::io::BufRead;

use crate::assignment::MaterialAssignment;
use crate::buffers::MeshBuffers;
use crate::config::DecoderConfig;
use crate::error::{LineFailure, LineIssue, Result};
use crate::geometry::{BoundingExtents, Tuple3};
use crate::material::MaterialLibrary;
use crate::mtl::load_material_library;
use crate::parse::{
    classify, for_each_line, parse_components, parse_face_ref, FaceRef, LineKind, SourceLine,
};
use crate::resource::ResourceProvider;

/// Everything the decoder produces besides the buffer contents
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// `None` when no vertex parsed cleanly
    pub extents: Option<BoundingExtents>,
    pub assignment: MaterialAssignment,
    /// Libraries loaded for `mtllib` directives, merged in order
    pub materials: MaterialLibrary,
    /// Recovered lines; empty for a clean load
    pub failures: Vec<LineFailure>,
    pub vertices_written: usize,
    pub normals_written: usize,
    pub triangles_written: usize,
}

impl Decoded {
    /// Every line parsed without falling back to a default
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Geometry decoder, optionally able to resolve `mtllib` companions
#[derive(Clone, Copy, Default)]
pub struct Decoder<'a> {
    config: DecoderConfig,
    resources: Option<&'a dyn ResourceProvider>,
}

impl<'a> Decoder<'a> {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            resources: None,
        }
    }

    /// Resolve material libraries through `resources`
    pub fn with_resources(mut self, resources: &'a dyn ResourceProvider) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Decode `reader` into `buffers`.
    ///
    /// `buffers` must come from analyzing byte-identical content. Only a read
    /// error, a companion library that exists but can't be read, or a write
    /// past the analyzed capacity is returned as an error.
    pub fn decode<R: BufRead>(&self, reader: R, buffers: &mut MeshBuffers) -> Result<Decoded> {
        let mut state = DecodeState::new(*self, buffers);
        for_each_line(reader, |line| state.line(line))?;
        Ok(state.finish())
    }
}

/// Decode with the default configuration and without material resolution
pub fn decode<R: BufRead>(reader: R, buffers: &mut MeshBuffers) -> Result<Decoded> {
    Decoder::default().decode(reader, buffers)
}

struct DecodeState<'d, 'b> {
    decoder: Decoder<'d>,
    buffers: &'b mut MeshBuffers,
    vertices: usize,
    normals: usize,
    triangles: usize,
    /// Locked by the first `vt` line
    tex_arity: Option<usize>,
    extents: Option<BoundingExtents>,
    assignment: MaterialAssignment,
    materials: MaterialLibrary,
    failures: Vec<LineFailure>,
    corners: Vec<FaceRef>,
}

impl<'d, 'b> DecodeState<'d, 'b> {
    fn new(decoder: Decoder<'d>, buffers: &'b mut MeshBuffers) -> Self {
        Self {
            decoder,
            buffers,
            vertices: 0,
            normals: 0,
            triangles: 0,
            tex_arity: None,
            extents: None,
            assignment: MaterialAssignment::new(),
            materials: MaterialLibrary::new(),
            failures: Vec::new(),
            corners: Vec::new(),
        }
    }

    fn line(&mut self, line: SourceLine<'_>) -> Result<()> {
        let number = line.number;
        let (kind, rest) = classify(line.text);
        if line.lossy && !matches!(kind, LineKind::Comment | LineKind::Unknown) {
            self.fail(number, kind, LineIssue::InvalidText);
        }

        match kind {
            LineKind::Vertex => self.vertex(number, rest)?,
            LineKind::TexCoord => self.tex_coord(number, rest),
            LineKind::Normal => self.normal(number, rest)?,
            LineKind::Face => self.face(number, rest)?,
            LineKind::MaterialLib => self.material_lib(number, rest)?,
            LineKind::UseMaterial => {
                if rest.is_empty() {
                    tracing::warn!("Line {}: usemtl without a material name", number);
                } else {
                    self.assignment.begin(self.triangles, rest);
                }
            }
            LineKind::Group | LineKind::Smoothing | LineKind::Object | LineKind::Comment => {}
            LineKind::Unknown => tracing::debug!("Ignoring line {}: {}", number, line.text),
        }
        Ok(())
    }

    /// Record `issue` unless `line` already has one
    fn fail(&mut self, line: usize, kind: LineKind, issue: LineIssue) {
        if self.failures.last().map_or(false, |f| f.line == line) {
            tracing::debug!("Line {}: also {}", line, issue);
            return;
        }
        let failure = LineFailure {
            line,
            keyword: kind.keyword(),
            issue,
        };
        tracing::warn!("Recovered {}", failure);
        self.failures.push(failure);
    }

    fn vertex(&mut self, number: usize, rest: &str) -> Result<()> {
        let (xyz, issue) = parse_components(rest, 3);
        self.buffers.write_position(self.vertices, xyz)?;
        self.vertices += 1;

        let [x, y, z] = xyz;
        match issue {
            Some(issue) => self.fail(number, LineKind::Vertex, issue),
            None => match self.extents.as_mut() {
                Some(extents) => extents.update(x, y, z),
                None => self.extents = Some(BoundingExtents::new(x, y, z)),
            },
        }
        Ok(())
    }

    fn normal(&mut self, number: usize, rest: &str) -> Result<()> {
        let (xyz, issue) = parse_components(rest, 3);
        self.buffers.write_normal(self.normals, xyz)?;
        self.normals += 1;

        if let Some(issue) = issue {
            self.fail(number, LineKind::Normal, issue);
        }
        Ok(())
    }

    fn tex_coord(&mut self, number: usize, rest: &str) {
        let arity = *self.tex_arity.get_or_insert_with(|| {
            let arity = if rest.split_whitespace().count() == 3 { 3 } else { 2 };
            tracing::debug!("Using {}D texture coordinates", arity);
            arity
        });

        let (mut uvw, issue) = parse_components(rest, arity);
        if arity == 2 {
            uvw[2] = self.decoder.config.tex_coord_fill;
        }
        self.buffers.push_tex_coord(Tuple3::new(uvw[0], uvw[1], uvw[2]));

        if let Some(issue) = issue {
            self.fail(number, LineKind::TexCoord, issue);
        }
    }

    fn face(&mut self, number: usize, rest: &str) -> Result<()> {
        let mut corners = std::mem::take(&mut self.corners);
        corners.clear();

        let mut issue = None;
        for token in rest.split_whitespace() {
            let (corner, corner_issue) = parse_face_ref(token);
            if let Some(corner_issue) = corner_issue {
                issue.get_or_insert(corner_issue);
            }
            corners.push(corner);
        }

        if corners.len() < 3 {
            issue = Some(LineIssue::TooFewFaceVertices {
                found: corners.len(),
            });
        }

        // Fan around the first corner: (0, t+1, t+2)
        let result = corners.windows(2).skip(1).try_for_each(|pair| {
            self.triangle([corners[0], pair[0], pair[1]])
        });
        self.corners = corners;
        result?;

        if let Some(issue) = issue {
            self.fail(number, LineKind::Face, issue);
        }
        Ok(())
    }

    fn triangle(&mut self, corners: [FaceRef; 3]) -> Result<()> {
        let vertices = corners.map(|c| c.vertex);
        let tex = corners
            .iter()
            .any(|c| c.tex.is_some())
            .then(|| corners.map(|c| c.tex.unwrap_or(0)));
        let normals = corners
            .iter()
            .any(|c| c.normal.is_some())
            .then(|| corners.map(|c| c.normal.unwrap_or(0)));

        self.buffers
            .write_triangle(self.triangles, vertices, tex, normals)?;
        self.triangles += 1;
        Ok(())
    }

    fn material_lib(&mut self, number: usize, name: &str) -> Result<()> {
        if name.is_empty() {
            tracing::warn!("Line {}: mtllib without a filename", number);
            return Ok(());
        }
        if !self.decoder.config.load_materials {
            tracing::debug!("Skipping material library {}", name);
            return Ok(());
        }

        match self.decoder.resources {
            Some(resources) => {
                let library = load_material_library(resources, name)?;
                tracing::debug!("Loaded {} material(s) from {}", library.len(), name);
                self.materials.extend(library);
            }
            None => tracing::debug!("No resource provider for material library {}", name),
        }
        Ok(())
    }

    fn finish(mut self) -> Decoded {
        self.assignment.seal(self.triangles);

        if self.triangles < self.buffers.triangle_capacity()
            || self.vertices < self.buffers.vertex_capacity()
            || self.normals < self.buffers.normal_capacity()
        {
            tracing::warn!("Decoded fewer entries than analyzed; streams differ between passes");
        }

        tracing::info!(
            "Decoded: {} vertices, {} normals, {} tex coords, {} triangles, {} material(s)",
            self.vertices,
            self.normals,
            self.buffers.tex_coords().len(),
            self.triangles,
            self.materials.len()
        );
        if !self.failures.is_empty() {
            tracing::warn!(
                "Model loaded with {} recovered line(s)",
                self.failures.len()
            );
        }

        Decoded {
            extents: self.extents,
            assignment: self.assignment,
            materials: self.materials,
            failures: self.failures,
            vertices_written: self.vertices,
            normals_written: self.normals,
            triangles_written: self.triangles,
        }
    }
}
