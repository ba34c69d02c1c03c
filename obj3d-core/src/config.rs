//! Decoder and loader settings

/// `w` given to texture coordinates declared with two components
pub const DEFAULT_TEX_COORD_FILL: f32 = -5.0;

/// Settings for a decode.
///
/// ```
/// use obj3d_core::DecoderConfig;
///
/// let config = DecoderConfig::new().with_strict(true).with_materials(false);
/// assert!(config.strict);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecoderConfig {
    /// Third component for 2-component texture coordinates
    pub tex_coord_fill: f32,
    /// Reject loads that needed any line recovery
    pub strict: bool,
    /// Parse companion libraries named by `mtllib`
    pub load_materials: bool,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self {
            tex_coord_fill: DEFAULT_TEX_COORD_FILL,
            strict: false,
            load_materials: true,
        }
    }

    pub fn with_tex_coord_fill(mut self, fill: f32) -> Self {
        self.tex_coord_fill = fill;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_materials(mut self, load: bool) -> Self {
        self.load_materials = load;
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}
