//! Resolve a font source string to raw font bytes.
//!
//! Supported formats:
//! - `data:font/...;base64,...` data URI
//! - file path with an explicit `/`, `./` or `../` prefix
//! - raw base64

use super::FontError;

pub fn load_font_source(src: &str) -> Result<Vec<u8>, FontError> {
    if src.starts_with("data:") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| FontError::Source("invalid data URI: missing comma".to_string()))?;
        return base64_decode(&src[comma_pos + 1..]);
    }

    // Base64 can contain '/', so only explicit prefixes count as paths
    if src.starts_with('/') || src.starts_with("./") || src.starts_with("../") {
        return std::fs::read(src)
            .map_err(|e| FontError::Source(format!("failed to read font file '{}': {}", src, e)));
    }

    base64_decode(src)
}

fn base64_decode(input: &str) -> Result<Vec<u8>, FontError> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| FontError::Source(format!("base64 decode error: {}", e)))
}
