//! Visual primitives and structural containers: constructors, intrinsic
//! sizes, and the markup each kind emits around its children.

use std::fmt::Write as FmtWrite; // for write! on String

use super::{Node, NodeKind};
use crate::config::SvgConfig;

pub const DEFAULT_SVG_ID: &str = "svg-chart";
pub const DEFAULT_COLOR: &str = "rgb(0,0,0)";

impl Node {
    pub fn xml() -> Self {
        Node::new(NodeKind::Xml)
    }

    pub fn svg(id: impl Into<String>) -> Self {
        Node::new(NodeKind::Svg { id: id.into() })
    }

    pub fn group() -> Self {
        Node::new(NodeKind::Group)
    }

    pub fn link(href: impl Into<String>) -> Self {
        Node::new(NodeKind::Link { href: href.into() })
    }

    pub fn rect_container(fill: impl Into<String>) -> Self {
        Node::new(NodeKind::RectContainer { fill: fill.into() })
    }

    pub fn rect(w: f64, h: f64, fill: impl Into<String>) -> Self {
        Node::new(NodeKind::Rect {
            w,
            h,
            fill: fill.into(),
        })
    }

    pub fn line(dx: f64, dy: f64, stroke_color: impl Into<String>, stroke_width: f64) -> Self {
        Node::new(NodeKind::Line {
            dx,
            dy,
            stroke_color: stroke_color.into(),
            stroke_width,
        })
    }

    pub fn text(text: impl Into<String>, bold: bool) -> Self {
        Node::new(NodeKind::Text {
            text: text.into(),
            bold,
        })
    }

    pub fn text_center(text: impl Into<String>, min_width: f64, min_height: f64, bold: bool) -> Self {
        Node::new(NodeKind::TextCenter {
            text: text.into(),
            bold,
            min_width,
            min_height,
        })
    }
}

/// Perpendicular inflation per unit of line length. Zero-length lines have
/// no direction to inflate along.
pub(crate) fn line_ratio(dx: f64, dy: f64, stroke_width: f64) -> f64 {
    let length = dx.hypot(dy);
    if length == 0.0 {
        0.0
    } else {
        stroke_width / length
    }
}

/// Bounding box of a stroked segment, thickness included.
pub(crate) fn line_size(dx: f64, dy: f64, stroke_width: f64) -> (f64, f64) {
    let rat = line_ratio(dx, dy, stroke_width);
    (dx + dy * rat, dy + dx * rat)
}

/// Natural size of a padded single-line text cell.
pub(crate) fn text_size(conf: &SvgConfig, text: &str, bold: bool) -> (f64, f64) {
    (
        conf.text_width(text, bold) + conf.padding_x * 2.0,
        conf.line_height() + conf.padding_y * 2.0,
    )
}

pub(crate) fn open_tag(node: &Node, conf: &SvgConfig, out: &mut String) {
    let b = node.bounds;
    match &node.kind {
        NodeKind::Xml => {
            out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#);
        }
        NodeKind::Svg { id } => {
            let _ = write!(
                out,
                r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" xmlns:xlink="http://www.w3.org/1999/xlink" id="{}" font-family="{}" height="{}" width="{}" style="font-size: {}pt;">"#,
                id, conf.font_family, b.h, b.w, conf.font_size
            );
        }
        NodeKind::Group => out.push_str("<g>"),
        NodeKind::Link { href } => {
            let _ = write!(out, r#"<a xlink:href="{}">"#, href);
        }
        NodeKind::Rect { fill, .. } | NodeKind::RectContainer { fill } => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" style="fill:{};"/>"#,
                b.x1, b.y1, b.w, b.h, fill
            );
        }
        NodeKind::Line {
            dx,
            dy,
            stroke_color,
            stroke_width,
        } => {
            // Endpoints sit inside the inflated box, offset by half the inflation
            let rat = line_ratio(*dx, *dy, *stroke_width);
            let off_x = dy * rat / 2.0;
            let off_y = dx * rat / 2.0;
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" style="stroke:{};stroke-width:{}"/>"#,
                b.x1 + off_x,
                b.y1 + off_y,
                b.x1 + dx + off_x,
                b.y1 + dy + off_y,
                stroke_color,
                stroke_width
            );
        }
        NodeKind::Text { text, bold } => {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" class="table-data" "#,
                b.x1 + conf.padding_x,
                b.y1 + b.h / 2.0
            );
            if *bold {
                out.push_str(r#"font-weight="bold" "#);
            }
            let _ = write!(
                out,
                r#"height="{}" width="{}">{}"#,
                b.h,
                conf.text_width(text, false),
                text
            );
        }
        NodeKind::TextCenter { text, bold, .. } => {
            let dx_text_begin = b.w / 2.0 - conf.text_width(text, *bold) / 2.0;
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" "#,
                b.x1 + dx_text_begin,
                b.y1 + b.h / 2.0
            );
            if *bold {
                out.push_str(r#"font-weight="bold" "#);
            }
            let _ = write!(
                out,
                r#"class="table-data" height="{}" width="{}">{}"#,
                b.h,
                conf.text_width(text, false),
                text
            );
        }
        NodeKind::MoveTo { .. }
        | NodeKind::CarriageReturn
        | NodeKind::LineFeed
        | NodeKind::Advance { .. } => {}
    }
}

pub(crate) fn close_tag(node: &Node, out: &mut String) {
    match &node.kind {
        NodeKind::Svg { .. } => out.push_str("</svg>"),
        NodeKind::Group => out.push_str("</g>"),
        NodeKind::Link { .. } => out.push_str("</a>"),
        NodeKind::Text { .. } | NodeKind::TextCenter { .. } => out.push_str("</text>"),
        NodeKind::Xml
        | NodeKind::RectContainer { .. }
        | NodeKind::Rect { .. }
        | NodeKind::Line { .. }
        | NodeKind::MoveTo { .. }
        | NodeKind::CarriageReturn
        | NodeKind::LineFeed
        | NodeKind::Advance { .. } => {}
    }
}
