//! # Configuration
//!
//! Style settings every node reads during layout: font, stroke width and
//! padding, plus the memoized text measurement that sizes text cells.
//!
//! An [`SvgConfig`] is immutable once built. Changing settings means building
//! a new instance and swapping it into a [`SharedConfig`]; readers holding a
//! snapshot keep seeing the instance they started with.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::font::{FontContext, TextMeasurer};

pub const DEFAULT_FONT_SIZE: f64 = 12.0;
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_PADDING_X: f64 = 5.0;
pub const DEFAULT_PADDING_Y: f64 = 4.0;

/// Applied to backend measurements to account for renderer differences.
pub const TEXT_WIDTH_SCALE_FACTOR: f64 = 1.5;
pub const LINE_HEIGHT_RATIO: f64 = 20.0 / 12.0;

/// Per-character width (in font-size units) used when measurement fails.
pub const FALLBACK_CHAR_WIDTH: f64 = 0.65;
pub const FALLBACK_CHAR_WIDTH_BOLD: f64 = 0.7;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    text: String,
    bold: bool,
    font_size_bits: u64,
    font_family: String,
}

pub struct SvgConfig {
    pub font_size: f64,
    pub font_family: String,
    pub stroke_width: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    measurer: Arc<dyn TextMeasurer>,
    text_width_cache: Mutex<HashMap<CacheKey, f64>>,
    /// Families that already logged a measurement failure at warn level.
    warned_families: Mutex<HashSet<String>>,
}

impl fmt::Debug for SvgConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SvgConfig")
            .field("font_size", &self.font_size)
            .field("font_family", &self.font_family)
            .field("stroke_width", &self.stroke_width)
            .field("padding_x", &self.padding_x)
            .field("padding_y", &self.padding_y)
            .finish_non_exhaustive()
    }
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgConfig {
    /// Default settings measured by an empty [`FontContext`].
    ///
    /// No family is registered, so every width is the approximation until a
    /// font is registered or another measurer is plugged in with
    /// [`SvgConfig::with_measurer`]. The first failure per family is logged
    /// at warn level, later ones at debug.
    pub fn new() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            padding_x: DEFAULT_PADDING_X,
            padding_y: DEFAULT_PADDING_Y,
            measurer: Arc::new(FontContext::new()),
            text_width_cache: Mutex::new(HashMap::new()),
            warned_families: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_font_family(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = font_family.into();
        self
    }

    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    pub fn with_padding(mut self, padding_x: f64, padding_y: f64) -> Self {
        self.padding_x = padding_x;
        self.padding_y = padding_y;
        self
    }

    /// Replace the measurement backend. Clears the cache, since cached widths
    /// came from the previous backend.
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Arc::new(measurer);
        self.text_width_cache = Mutex::new(HashMap::new());
        self.warned_families = Mutex::new(HashSet::new());
        self
    }

    pub fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT_RATIO
    }

    /// Rendered width of `text`, memoized per (text, weight, size, family).
    ///
    /// A failing backend is logged and replaced by the approximation
    /// `chars × font_size × per-weight constant`; the approximation is cached
    /// too, so each key warns at most once.
    pub fn text_width(&self, text: &str, bold: bool) -> f64 {
        if text.is_empty() {
            return 0.0;
        }

        let key = CacheKey {
            text: text.to_string(),
            bold,
            font_size_bits: self.font_size.to_bits(),
            font_family: self.font_family.clone(),
        };
        if let Some(width) = self.cache().get(&key) {
            return *width;
        }

        let width = match self
            .measurer
            .measure(text, bold, self.font_size, &self.font_family)
        {
            Ok(width) => width * TEXT_WIDTH_SCALE_FACTOR,
            Err(e) => {
                if self.first_failure_for_family() {
                    tracing::warn!(
                        family = %self.font_family,
                        text,
                        bold,
                        error = %e,
                        "text measurement failed, using approximate widths for this family"
                    );
                } else {
                    tracing::debug!(text, bold, error = %e, "approximate text width");
                }
                fallback_text_width(text, bold, self.font_size)
            }
        };

        self.cache().insert(key, width);
        width
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, f64>> {
        self.text_width_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn first_failure_for_family(&self) -> bool {
        self.warned_families
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(self.font_family.clone())
    }

    #[cfg(test)]
    fn cached_entries(&self) -> usize {
        self.cache().len()
    }

    #[cfg(test)]
    fn warned_family_count(&self) -> usize {
        self.warned_families
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub fn fallback_text_width(text: &str, bold: bool, font_size: f64) -> f64 {
    let per_char = if bold {
        FALLBACK_CHAR_WIDTH_BOLD
    } else {
        FALLBACK_CHAR_WIDTH
    };
    text.chars().count() as f64 * font_size * per_char
}

/// A process-wide handle to the active configuration.
///
/// Cloning the handle shares it. `replace` swaps the whole instance at once:
/// a reader either gets the old `Arc` or the new one.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<Arc<SvgConfig>>>,
}

impl SharedConfig {
    pub fn new(conf: SvgConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(conf))),
        }
    }

    /// Snapshot of the active configuration.
    pub fn current(&self) -> Arc<SvgConfig> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace(&self, conf: SvgConfig) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(conf);
    }

    /// Swap back to a default configuration.
    pub fn reset(&self) {
        self.replace(SvgConfig::default());
    }
}

/// Serializable overrides for [`SvgConfig`]. Unset fields keep defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSpec {
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub stroke_width: Option<f64>,
    pub padding_x: Option<f64>,
    pub padding_y: Option<f64>,
}

impl ConfigSpec {
    pub fn apply(&self, mut conf: SvgConfig) -> SvgConfig {
        if let Some(v) = self.font_size {
            conf.font_size = v;
        }
        if let Some(v) = &self.font_family {
            conf.font_family = v.clone();
        }
        if let Some(v) = self.stroke_width {
            conf.stroke_width = v;
        }
        if let Some(v) = self.padding_x {
            conf.padding_x = v;
        }
        if let Some(v) = self.padding_y {
            conf.padding_y = v;
        }
        conf
    }
}
