//! # Document Model
//!
//! A serializable description of a node tree, so tables can be authored as
//! JSON instead of Rust code. A [`Document`] carries its style overrides,
//! the fonts to measure with, and the content placed under the `<svg>` root.
//!
//! Variant names match [`crate::node::NodeKind`]. Only container variants
//! take `children`; directives and primitives reject them at parse time.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigSpec, SvgConfig};
use crate::error::Result;
use crate::font::{load_font_source, FontContext};
use crate::node::primitives::{DEFAULT_COLOR, DEFAULT_SVG_ID};
use crate::node::Node;

/// A complete document ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// `id` attribute of the `<svg>` root.
    #[serde(default = "default_id")]
    pub id: String,

    #[serde(default)]
    pub config: ConfigSpec,

    /// Fonts to measure text with. Families without an entry fall back to
    /// approximate widths.
    #[serde(default)]
    pub fonts: Vec<FontEntry>,

    /// Content of the `<svg>` root, in flow order.
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

fn default_id() -> String {
    DEFAULT_SVG_ID.to_string()
}

/// A font face to register before layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontEntry {
    pub family: String,
    /// Base64-encoded font data, a data URI, or an explicit file path.
    pub src: String,
    #[serde(default)]
    pub bold: bool,
}

/// One node of the tree description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", deny_unknown_fields)]
pub enum NodeSpec {
    Group {
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
    Link {
        href: String,
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
    RectContainer {
        #[serde(default = "default_color")]
        fill: String,
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
    Rect {
        width: f64,
        height: f64,
        #[serde(default = "default_color")]
        fill: String,
    },
    #[serde(rename_all = "camelCase")]
    Line {
        dx: f64,
        dy: f64,
        #[serde(default = "default_color")]
        stroke_color: String,
        #[serde(default = "default_stroke_width")]
        stroke_width: f64,
    },
    Text {
        text: String,
        #[serde(default)]
        bold: bool,
    },
    TextCenter {
        text: String,
        width: f64,
        height: f64,
        #[serde(default)]
        bold: bool,
    },
    MoveTo {
        x: f64,
        y: f64,
    },
    // Empty struct variants, so extra fields such as `children` are rejected
    CarriageReturn {},
    LineFeed {},
    /// Carriage return plus line feed.
    NewLine {},
    Advance {
        dx: f64,
        #[serde(default)]
        dy: f64,
    },
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_stroke_width() -> f64 {
    1.0
}

impl NodeSpec {
    /// Build the nodes this entry stands for (`NewLine` expands to two).
    pub fn build(&self) -> Result<Vec<Node>> {
        let node = match self {
            NodeSpec::Group { children } => with_spec_children(Node::group(), children)?,
            NodeSpec::Link { href, children } => with_spec_children(Node::link(href), children)?,
            NodeSpec::RectContainer { fill, children } => {
                with_spec_children(Node::rect_container(fill), children)?
            }
            NodeSpec::Rect {
                width,
                height,
                fill,
            } => Node::rect(*width, *height, fill),
            NodeSpec::Line {
                dx,
                dy,
                stroke_color,
                stroke_width,
            } => Node::line(*dx, *dy, stroke_color, *stroke_width),
            NodeSpec::Text { text, bold } => Node::text(text, *bold),
            NodeSpec::TextCenter {
                text,
                width,
                height,
                bold,
            } => Node::text_center(text, *width, *height, *bold),
            NodeSpec::MoveTo { x, y } => Node::move_to(*x, *y),
            NodeSpec::CarriageReturn {} => Node::carriage_return(),
            NodeSpec::LineFeed {} => Node::line_feed(),
            NodeSpec::NewLine {} => return Ok(Vec::from(Node::new_line())),
            NodeSpec::Advance { dx, dy } => Node::advance(*dx, *dy),
        };
        Ok(vec![node])
    }
}

fn with_spec_children(mut node: Node, children: &[NodeSpec]) -> Result<Node> {
    for spec in children {
        for child in spec.build()? {
            node.add_child(child)?;
        }
    }
    Ok(node)
}

impl Document {
    /// The full tree: XML prolog wrapping the `<svg>` root and its content.
    pub fn build_tree(&self) -> Result<Node> {
        let svg = with_spec_children(Node::svg(&self.id), &self.children)?;
        Node::xml().with_child(svg)
    }

    /// Default configuration with this document's overrides and fonts.
    pub fn build_config(&self) -> Result<SvgConfig> {
        let conf = self.config.apply(SvgConfig::default());
        if self.fonts.is_empty() {
            return Ok(conf);
        }

        let mut fonts = FontContext::new();
        for entry in &self.fonts {
            let data = load_font_source(&entry.src)?;
            fonts.registry_mut().register(&entry.family, entry.bold, &data);
        }
        tracing::debug!(count = fonts.registry().len(), "registered document fonts");
        Ok(conf.with_measurer(fonts))
    }
}
