//! # Hit-Region Overlay
//!
//! Turns the link wrappers of an already generated node tree into an HTML
//! image map, so the rendered image gets clickable cells.
//!
//! Coordinates are read straight from each link's placed bounds. Harvesting
//! a tree that was never generated, or generated at a different root offset
//! than the image, yields a misaligned map; that is on the caller.

use std::fmt;

use crate::error::{Error, Result};
use crate::node::{Node, NodeKind};

pub const DEFAULT_MAP_NAME: &str = "svg_map";

/// A node in an HTML `<map>`.
#[derive(Debug, Clone, PartialEq)]
pub enum MapNode {
    /// The named `<map>` container.
    PicMap {
        id: String,
        name: String,
        children: Vec<MapNode>,
    },
    Rect {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        alt: String,
        href: String,
    },
    Circle {
        x: f64,
        y: f64,
        r: f64,
        alt: String,
        href: String,
    },
    Poly {
        points: Vec<(f64, f64)>,
        alt: String,
        href: String,
    },
}

impl MapNode {
    pub fn pic_map(id: impl Into<String>, name: impl Into<String>) -> Self {
        MapNode::PicMap {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Append a region. Only the map container holds children.
    pub fn add_child(&mut self, node: MapNode) -> Result<()> {
        match self {
            MapNode::PicMap { children, .. } => {
                children.push(node);
                Ok(())
            }
            MapNode::Rect { .. } => Err(Error::ChildNotAllowed { kind: "rect area" }),
            MapNode::Circle { .. } => Err(Error::ChildNotAllowed { kind: "circle area" }),
            MapNode::Poly { .. } => Err(Error::ChildNotAllowed { kind: "poly area" }),
        }
    }

    pub fn children(&self) -> &[MapNode] {
        match self {
            MapNode::PicMap { children, .. } => children,
            _ => &[],
        }
    }
}

impl fmt::Display for MapNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapNode::PicMap { id, name, children } => {
                writeln!(f, r#"<map name="{name}" id="{id}">"#)?;
                for child in children {
                    write!(f, "{child}")?;
                }
                writeln!(f, "</map>")
            }
            MapNode::Rect {
                x1,
                y1,
                x2,
                y2,
                alt,
                href,
            } => writeln!(
                f,
                r#"<area shape="rect" coords="{x1},{y1},{x2},{y2}" alt="{alt}" href="{href}">"#
            ),
            MapNode::Circle { x, y, r, alt, href } => writeln!(
                f,
                r#"<area shape="circle" coords="{x},{y},{r}" alt="{alt}" href="{href}">"#
            ),
            MapNode::Poly { points, alt, href } => {
                let coords = points
                    .iter()
                    .map(|(x, y)| format!("{x},{y}"))
                    .collect::<Vec<_>>()
                    .join(",");
                writeln!(
                    f,
                    r#"<area shape="poly" coords="{coords}" alt="{alt}" href="{href}">"#
                )
            }
        }
    }
}

/// Label for a link target: everything after its last `/`.
pub fn link_label(href: &str) -> &str {
    href.rsplit('/').next().unwrap_or(href)
}

/// One rectangular region per link wrapper, in walk order.
pub fn collect_link_regions(root: &Node) -> Vec<MapNode> {
    root.walk()
        .filter_map(|node| match &node.kind {
            NodeKind::Link { href } => {
                let b = node.bounds();
                Some(MapNode::Rect {
                    x1: b.x1,
                    y1: b.y1,
                    x2: b.x2,
                    y2: b.y2,
                    alt: link_label(href).to_string(),
                    href: href.clone(),
                })
            }
            _ => None,
        })
        .collect()
}

/// The `<map>` container holding every link region of `root`.
pub fn build_map(root: &Node, id: &str, name: &str) -> MapNode {
    MapNode::PicMap {
        id: id.to_string(),
        name: name.to_string(),
        children: collect_link_regions(root),
    }
}

/// A minimal HTML page binding `image_path` to the link map of `root`.
pub fn gen_html(root: &Node, image_path: &str) -> String {
    let map = build_map(root, DEFAULT_MAP_NAME, DEFAULT_MAP_NAME);
    let regions = map.children().len();
    tracing::debug!(regions, image_path, "generated image map");
    format!(
        r##"
<!DOCTYPE html>
<html>
<body>
<img src="{image_path}" usemap="#{DEFAULT_MAP_NAME}" />
{map}
</body>
</html>
"##
    )
}
