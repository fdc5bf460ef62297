//! # Font Metrics
//!
//! Text measurement for layout. The engine only needs one question answered:
//! how wide is this string in this family, size and weight? The answer comes
//! from a [`TextMeasurer`]; the default one is [`FontContext`], which measures
//! with advance widths parsed out of registered TrueType/OpenType data.
//!
//! Measuring a family nobody registered is an error here, not a guess. The
//! approximation lives one level up in [`crate::config::SvgConfig`], which
//! logs the failure and falls back.

mod loader;

pub use loader::load_font_source;

use std::collections::HashMap;

/// Why a measurement or font registration failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FontError {
    #[error("no font registered for family '{family}'")]
    UnknownFamily { family: String },

    #[error("font data for family '{family}' could not be parsed")]
    Unparseable { family: String },

    #[error("invalid font source: {0}")]
    Source(String),
}

/// A text-measurement backend.
///
/// Implementations must be deterministic for a given set of available fonts.
pub trait TextMeasurer: Send + Sync {
    /// Rendered width of `text` in the same units as `font_size`.
    fn measure(
        &self,
        text: &str,
        bold: bool,
        font_size: f64,
        font_family: &str,
    ) -> Result<f64, FontError>;
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub bold: bool,
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
}

impl CustomFontMetrics {
    /// Advance width of a character in font-size units.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }

    /// Parse metrics from font data using ttf-parser.
    pub fn from_font_data(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;

        // Basic Multilingual Plane is enough for table labels
        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                    if ch == ' ' {
                        default_advance = advance;
                    }
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Some(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
        })
    }
}

/// Registered font data. `metrics` is `None` when ttf-parser rejected it.
#[derive(Debug, Clone)]
pub struct FontData {
    pub metrics: Option<CustomFontMetrics>,
}

/// Maps family + weight to parsed font data.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    fonts: HashMap<FontKey, FontData>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font face from raw TTF/OTF bytes.
    ///
    /// Unparseable data is still registered so that later measurements report
    /// [`FontError::Unparseable`] instead of [`FontError::UnknownFamily`].
    pub fn register(&mut self, family: &str, bold: bool, data: &[u8]) {
        let metrics = CustomFontMetrics::from_font_data(data);
        if metrics.is_none() {
            tracing::warn!(family, bold, "font data could not be parsed");
        }
        self.fonts.insert(
            FontKey {
                family: family.to_string(),
                bold,
            },
            FontData { metrics },
        );
    }

    /// Look up a face, falling back from bold to the regular face of the
    /// same family.
    pub fn resolve(&self, family: &str, bold: bool) -> Option<&FontData> {
        let key = FontKey {
            family: family.to_string(),
            bold,
        };
        if let Some(font) = self.fonts.get(&key) {
            return Some(font);
        }
        if bold {
            return self.fonts.get(&FontKey {
                family: family.to_string(),
                bold: false,
            });
        }
        None
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FontKey, &FontData)> {
        self.fonts.iter()
    }
}

/// Default measurement backend over a [`FontRegistry`].
#[derive(Debug, Clone, Default)]
pub struct FontContext {
    registry: FontRegistry,
}

impl FontContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: FontRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FontRegistry {
        &mut self.registry
    }
}

impl TextMeasurer for FontContext {
    fn measure(
        &self,
        text: &str,
        bold: bool,
        font_size: f64,
        font_family: &str,
    ) -> Result<f64, FontError> {
        let font = self
            .registry
            .resolve(font_family, bold)
            .ok_or_else(|| FontError::UnknownFamily {
                family: font_family.to_string(),
            })?;
        let metrics = font.metrics.as_ref().ok_or_else(|| FontError::Unparseable {
            family: font_family.to_string(),
        })?;
        Ok(metrics.measure_string(text, font_size))
    }
}
