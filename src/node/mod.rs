//! # Node Tree and Cursor Layout
//!
//! A document is a tree of [`Node`]s. Each node's size is a pure function of
//! its children; its position is assigned during a single top-down
//! [`Node::generate`] pass that also emits the markup.
//!
//! ## The flow model
//!
//! Children are laid out left to right along an implicit cursor. Sizes:
//!
//! - **Width** is the widest *run*. A run ends at a carriage return or a
//!   cursor jump; a jump starts the next run at the jump's `x`.
//! - **Height** sums *rows* within a *section* and takes the tallest
//!   section. A row is as tall as its tallest child and ends at a line feed.
//!   A cursor jump closes the section and seeds the next row with its `y`.
//!
//! Placement mirrors this: a flowed child advances the cursor by its width
//! only. Moving down takes an explicit line feed (or jump), which advances by
//! the tallest child seen since the last row break.
//!
//! Measurement and placement both classify children through
//! [`Node::directive`], so the two passes cannot disagree on what a child
//! does to the cursor.

pub mod directives;
pub mod primitives;

use crate::config::SvgConfig;
use crate::error::{Error, Result};

pub use directives::Directive;

/// The closed set of node kinds the layout engine understands.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `<?xml ...?>` prolog wrapping the whole document.
    Xml,
    /// `<svg>` root element.
    Svg { id: String },
    Group,
    /// Hyperlink wrapper; its bounds become a hit region.
    Link { href: String },
    /// Background rect sized to its children.
    RectContainer { fill: String },
    Rect { w: f64, h: f64, fill: String },
    Line {
        dx: f64,
        dy: f64,
        stroke_color: String,
        stroke_width: f64,
    },
    Text { text: String, bold: bool },
    /// Text centered in at least `min_width` × `min_height`.
    TextCenter {
        text: String,
        bold: bool,
        min_width: f64,
        min_height: f64,
    },
    MoveTo { x: f64, y: f64 },
    CarriageReturn,
    LineFeed,
    /// Empty box of `dx` × `dy` that flows like any other child.
    Advance { dx: f64, dy: f64 },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Xml => "xml",
            NodeKind::Svg { .. } => "svg",
            NodeKind::Group => "group",
            NodeKind::Link { .. } => "link",
            NodeKind::RectContainer { .. } => "rect container",
            NodeKind::Rect { .. } => "rect",
            NodeKind::Line { .. } => "line",
            NodeKind::Text { .. } => "text",
            NodeKind::TextCenter { .. } => "centered text",
            NodeKind::MoveTo { .. } => "moveTo",
            NodeKind::CarriageReturn => "CR",
            NodeKind::LineFeed => "LF",
            NodeKind::Advance { .. } => "advancer",
        }
    }

    /// Whether this kind may own children.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Xml
                | NodeKind::Svg { .. }
                | NodeKind::Group
                | NodeKind::Link { .. }
                | NodeKind::RectContainer { .. }
        )
    }
}

/// Placed bounding box. Valid after [`Node::generate`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    children: Vec<Node>,
    bounds: Bounds,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            bounds: Bounds::default(),
        }
    }

    /// Append a child. Primitives and directives refuse children.
    pub fn add_child(&mut self, child: Node) -> Result<()> {
        if !self.kind.is_container() {
            return Err(Error::ChildNotAllowed {
                kind: self.kind.name(),
            });
        }
        self.children.push(child);
        Ok(())
    }

    pub fn with_child(mut self, child: Node) -> Result<Self> {
        self.add_child(child)?;
        Ok(self)
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Result<Self> {
        for child in children {
            self.add_child(child)?;
        }
        Ok(self)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Depth-first walk: every child subtree first, then the node itself.
    pub fn walk(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        Box::new(
            self.children
                .iter()
                .flat_map(|child| child.walk())
                .chain(std::iter::once(self)),
        )
    }

    pub fn width(&self, conf: &SvgConfig) -> f64 {
        self.size(conf).0
    }

    pub fn height(&self, conf: &SvgConfig) -> f64 {
        self.size(conf).1
    }

    /// (width, height). Not cached: every call rescans the subtree.
    pub fn size(&self, conf: &SvgConfig) -> (f64, f64) {
        self.intrinsic_size(conf)
            .unwrap_or_else(|| self.measure_children(conf))
    }

    /// Size of kinds that never derive it from children. Containers without
    /// children have no extent.
    fn intrinsic_size(&self, conf: &SvgConfig) -> Option<(f64, f64)> {
        match &self.kind {
            NodeKind::Rect { w, h, .. } => Some((*w, *h)),
            NodeKind::Line {
                dx,
                dy,
                stroke_width,
                ..
            } => Some(primitives::line_size(*dx, *dy, *stroke_width)),
            NodeKind::Text { text, bold } => Some(primitives::text_size(conf, text, *bold)),
            NodeKind::TextCenter {
                text,
                bold,
                min_width,
                min_height,
            } => {
                let (w, h) = primitives::text_size(conf, text, *bold);
                Some((min_width.max(w), min_height.max(h)))
            }
            NodeKind::Advance { dx, dy } => Some((*dx, *dy)),
            NodeKind::MoveTo { .. } | NodeKind::CarriageReturn | NodeKind::LineFeed => {
                Some((0.0, 0.0))
            }
            _ if self.children.is_empty() => Some((0.0, 0.0)),
            _ => None,
        }
    }

    /// One scan over the children computing (width, height).
    fn measure_children(&self, conf: &SvgConfig) -> (f64, f64) {
        let mut runs: Vec<f64> = Vec::new();
        let mut run = 0.0;

        let mut rows: Vec<f64> = Vec::new();
        let mut sections: Vec<f64> = Vec::new();
        let mut row = 0.0f64;

        for child in &self.children {
            match child.directive() {
                Some(Directive::MoveTo { x, y }) => {
                    runs.push(run);
                    run = x;
                    rows.push(row);
                    sections.push(rows.iter().sum());
                    rows.clear();
                    row = y;
                }
                Some(Directive::CarriageReturn) => {
                    runs.push(run);
                    run = 0.0;
                }
                Some(Directive::LineFeed) => {
                    rows.push(row);
                    row = 0.0;
                }
                None => {
                    let (w, h) = child.size(conf);
                    run += w;
                    row = row.max(h);
                }
            }
        }
        runs.push(run);
        rows.push(row);
        sections.push(rows.iter().sum());

        (max_of(&runs), max_of(&sections))
    }

    /// Place this subtree with its top-left corner at (`x`, `y`) and return
    /// its markup. Every visited node's bounds are overwritten.
    pub fn generate(&mut self, conf: &SvgConfig, x: f64, y: f64) -> String {
        let mut out = String::new();
        self.generate_into(conf, x, y, &mut out);
        tracing::debug!(
            kind = self.kind.name(),
            width = self.bounds.w,
            height = self.bounds.h,
            bytes = out.len(),
            "generated node tree"
        );
        out
    }

    fn generate_into(&mut self, conf: &SvgConfig, x: f64, y: f64, out: &mut String) {
        let (w, h) = self.size(conf);
        self.bounds = Bounds {
            x1: x,
            y1: y,
            x2: x + w,
            y2: y + h,
            w,
            h,
        };

        primitives::open_tag(self, conf, out);

        let mut xpos = x;
        let mut ypos = y;
        let mut row = 0.0f64;
        for child in &mut self.children {
            match child.directive() {
                Some(Directive::MoveTo { x: to_x, y: to_y }) => {
                    xpos = to_x;
                    ypos = to_y;
                    row = to_y;
                }
                Some(Directive::CarriageReturn) => {
                    xpos = 0.0;
                }
                Some(Directive::LineFeed) => {
                    ypos += row;
                    row = 0.0;
                }
                None => {
                    child.generate_into(conf, xpos, ypos, out);
                    row = row.max(child.bounds.h);
                    xpos += child.bounds.w;
                }
            }
        }

        primitives::close_tag(self, out);
    }
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
