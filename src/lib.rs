//! # tablesvg
//!
//! A small cursor-driven layout engine that renders color-coded tables and
//! charts to SVG, plus an HTML image map that makes linked cells clickable.
//!
//! There is no constraint solver here. Children flow left to right along a
//! cursor, and a handful of directive nodes (jump, carriage return, line
//! feed, advance) move that cursor explicitly. That is enough to express a
//! support matrix with headers, sub-columns and absolutely placed sections in
//! one tree.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON or Rust builders)
//!       ↓
//!   [model]    Tree description, fonts, style overrides
//!       ↓
//!   [node]     Measure + place + emit SVG in one pass
//!       ↓          (reads [config], which measures text through [font])
//!   [map]      Harvest placed links into an HTML image map
//! ```

pub mod config;
pub mod error;
pub mod font;
pub mod map;
pub mod model;
pub mod node;

pub use config::{SharedConfig, SvgConfig};
pub use error::{Error, Result};
pub use node::{Bounds, Node, NodeKind};

use model::Document;

/// A generated document: the SVG text and the placed tree it came from.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub svg: String,
    pub tree: Node,
}

impl Rendered {
    /// HTML page pairing the image at `image_path` with the link map.
    pub fn html(&self, image_path: &str) -> String {
        map::gen_html(&self.tree, image_path)
    }
}

/// Render a document with its own configuration, rooted at (0, 0).
pub fn render(document: &Document) -> Result<Rendered> {
    let conf = document.build_config()?;
    let mut tree = document.build_tree()?;
    let svg = tree.generate(&conf, 0.0, 0.0);
    Ok(Rendered { svg, tree })
}

/// Render a document described as JSON.
pub fn render_json(json: &str) -> Result<Rendered> {
    let document: Document = serde_json::from_str(json)?;
    render(&document)
}
