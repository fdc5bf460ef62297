//! Integration tests for the tablesvg pipeline.
//!
//! These exercise the public API end to end:
//! - builder trees generate well-formed SVG with the expected geometry
//! - flow directives size documents the way the layout rules say
//! - link wrappers become image-map regions at their placed bounds
//! - JSON documents render through `render_json`

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use tablesvg::font::{FontError, TextMeasurer};
use tablesvg::map::{collect_link_regions, gen_html, MapNode};
use tablesvg::node::primitives::DEFAULT_COLOR;
use tablesvg::{Node, SharedConfig, SvgConfig};

// ─── Helpers ────────────────────────────────────────────────────

/// Fixed 6 units per character, so text cells have predictable sizes.
struct FixedMeasurer;

impl TextMeasurer for FixedMeasurer {
    fn measure(&self, text: &str, _bold: bool, _size: f64, _family: &str) -> Result<f64, FontError> {
        Ok(text.chars().count() as f64 * 6.0)
    }
}

fn fixed_conf() -> SvgConfig {
    SvgConfig::default().with_measurer(FixedMeasurer)
}

fn black_rect(w: f64, h: f64) -> Node {
    Node::rect(w, h, DEFAULT_COLOR)
}

fn document(children: Vec<Node>) -> Node {
    let svg = Node::svg("svg-chart").with_children(children).unwrap();
    Node::xml().with_child(svg).unwrap()
}

#[derive(Debug)]
struct Element {
    name: String,
    attrs: HashMap<String, String>,
}

impl Element {
    fn num(&self, key: &str) -> f64 {
        self.attrs[key].parse().unwrap()
    }
}

/// Parse markup with quick-xml and return every start/empty element.
fn elements(markup: &str) -> Vec<Element> {
    let mut reader = Reader::from_str(markup);
    let mut out = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let attrs = e
                    .attributes()
                    .map(|a| {
                        let a = a.unwrap();
                        (
                            String::from_utf8_lossy(a.key.as_ref()).to_string(),
                            a.unescape_value().unwrap().to_string(),
                        )
                    })
                    .collect();
                out.push(Element { name, attrs });
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed markup at {}: {e}", reader.buffer_position()),
        }
    }
    out
}

fn named<'a>(elements: &'a [Element], name: &str) -> Vec<&'a Element> {
    elements.iter().filter(|e| e.name == name).collect()
}

// ─── End-to-end Layout ──────────────────────────────────────────

#[test]
fn test_two_rows_of_rects_stack_vertically() {
    let conf = fixed_conf();
    let mut doc = document(vec![
        black_rect(10.0, 10.0),
        Node::carriage_return(),
        Node::line_feed(),
        black_rect(10.0, 10.0),
    ]);
    let svg = doc.generate(&conf, 0.0, 0.0);
    assert!(svg.starts_with("<?xml"));

    let els = elements(&svg);
    let root = named(&els, "svg")[0];
    assert_eq!(root.num("height"), 20.0);
    assert_eq!(root.num("width"), 10.0);
    assert_eq!(root.attrs["id"], "svg-chart");
    assert_eq!(root.attrs["font-family"], "Arial");

    let rects = named(&els, "rect");
    assert_eq!(rects.len(), 2);
    assert_eq!(rects[0].num("y"), 0.0);
    assert_eq!(rects[1].num("y"), 10.0);
    assert_eq!(rects[0].attrs["style"], "fill:rgb(0,0,0);");
}

#[test]
fn test_fixed_advance_gaps_add_to_width_only() {
    let conf = fixed_conf();
    let gap = 3.0;
    let leaves = [(10.0, 4.0), (20.0, 9.0), (5.0, 6.0), (7.0, 1.0)];
    let mut children = Vec::new();
    for (i, (w, h)) in leaves.iter().enumerate() {
        if i > 0 {
            children.push(Node::advance(gap, 0.0));
        }
        children.push(black_rect(*w, *h));
    }
    let row = Node::group().with_children(children).unwrap();

    let sum: f64 = leaves.iter().map(|(w, _)| w).sum();
    assert_eq!(row.width(&conf), sum + 3.0 * gap);
    assert_eq!(row.height(&conf), 9.0);
}

#[test]
fn test_line_feed_sums_rows_but_move_to_does_not() {
    let conf = fixed_conf();
    let stacked = Node::group()
        .with_children([
            black_rect(10.0, 6.0),
            Node::carriage_return(),
            Node::line_feed(),
            black_rect(10.0, 9.0),
        ])
        .unwrap();
    assert_eq!(stacked.height(&conf), 15.0);

    let jumped = Node::group()
        .with_children([black_rect(10.0, 6.0), Node::move_to(0.0, 0.0), black_rect(10.0, 9.0)])
        .unwrap();
    assert_eq!(jumped.height(&conf), 9.0);
}

#[test]
fn test_stroked_line_bounding_box() {
    let conf = fixed_conf();
    let line = Node::line(3.0, 4.0, DEFAULT_COLOR, 5.0);
    assert!((line.width(&conf) - 7.0).abs() < 1e-9);
    assert!((line.height(&conf) - 7.0).abs() < 1e-9);
}

#[test]
fn test_generation_is_deterministic() {
    let conf = fixed_conf();
    let mut doc = document(vec![
        Node::text_center("Board", 80.0, 30.0, true),
        Node::text("Linux", false),
        Node::carriage_return(),
        Node::line_feed(),
        Node::link("https://example.org/boards/a")
            .with_child(Node::rect_container("rgb(0,255,0)").with_child(Node::text("ok", false)).unwrap())
            .unwrap(),
        Node::move_to(200.0, 0.0),
        Node::line(0.0, 40.0, "gray", 1.0),
    ]);
    let first = doc.generate(&conf, 5.0, 5.0);
    let second = doc.generate(&conf, 5.0, 5.0);
    assert_eq!(first, second);
}

#[test]
fn test_absolute_section_inside_flow() {
    let conf = fixed_conf();
    let mut doc = document(vec![
        black_rect(40.0, 10.0),
        Node::carriage_return(),
        Node::line_feed(),
        black_rect(40.0, 10.0),
        // side panel, measured independently
        Node::move_to(50.0, 0.0),
        black_rect(30.0, 15.0),
    ]);
    let svg = doc.generate(&conf, 0.0, 0.0);
    let els = elements(&svg);

    let root = named(&els, "svg")[0];
    assert_eq!(root.num("width"), 80.0);
    assert_eq!(root.num("height"), 20.0);

    let rects = named(&els, "rect");
    assert_eq!((rects[2].num("x"), rects[2].num("y")), (50.0, 0.0));
}

#[test]
fn test_nested_absolute_section_ignores_parent_offset() {
    let conf = fixed_conf();
    let inner = Node::group()
        .with_children([black_rect(4.0, 4.0), Node::move_to(50.0, 60.0), black_rect(6.0, 3.0)])
        .unwrap();
    let mut doc = document(vec![black_rect(10.0, 5.0), inner]);
    let svg = doc.generate(&conf, 0.0, 0.0);

    let inner = &doc.children()[0].children()[1];
    let b = inner.bounds();
    assert_eq!((b.x1, b.y1), (10.0, 0.0));
    // run after the jump starts at x = 50; its row is seeded with y = 60
    assert_eq!((b.w, b.h), (56.0, 60.0));

    let jumped = inner.children()[2].bounds();
    assert_eq!((jumped.x1, jumped.y1), (50.0, 60.0));

    let els = elements(&svg);
    let root = named(&els, "svg")[0];
    assert_eq!(root.num("width"), 66.0);
    assert_eq!(root.num("height"), 60.0);
    let rects = named(&els, "rect");
    assert_eq!((rects[2].num("x"), rects[2].num("y")), (50.0, 60.0));
}

#[test]
fn test_line_feed_after_jump_advances_by_seeded_row() {
    let conf = fixed_conf();

    // jump target taller than the row content
    let mut low = Node::group()
        .with_children([
            Node::move_to(20.0, 7.0),
            black_rect(10.0, 3.0),
            Node::carriage_return(),
            Node::line_feed(),
            black_rect(10.0, 2.0),
        ])
        .unwrap();
    low.generate(&conf, 0.0, 0.0);
    let next = low.children()[4].bounds();
    assert_eq!((next.x1, next.y1), (0.0, 14.0));
    assert_eq!(low.height(&conf), 9.0);

    // row content taller than the jump target
    let mut tall = Node::group()
        .with_children([
            Node::move_to(0.0, 4.0),
            black_rect(10.0, 9.0),
            Node::carriage_return(),
            Node::line_feed(),
            black_rect(10.0, 2.0),
        ])
        .unwrap();
    tall.generate(&conf, 0.0, 0.0);
    let next = tall.children()[4].bounds();
    assert_eq!((next.x1, next.y1), (0.0, 13.0));
    assert_eq!(tall.height(&conf), 11.0);
}

#[test]
fn test_text_cells_render_as_well_formed_markup() {
    let conf = fixed_conf();
    let mut doc = document(vec![
        Node::text_center("Header", 100.0, 30.0, true),
        Node::text("cell", false),
    ]);
    let svg = doc.generate(&conf, 0.0, 0.0);
    let els = elements(&svg);
    let texts = named(&els, "text");
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0].attrs["font-weight"], "bold");
    assert_eq!(texts[0].attrs["class"], "table-data");
    // second cell starts right after the 100-wide header, plus padding
    assert_eq!(texts[1].num("x"), 105.0);
    assert!(!texts[1].attrs.contains_key("font-weight"));
}

#[test]
fn test_missing_font_falls_back_without_failing() {
    let conf = SvgConfig::default().with_font_family("No Such Font");
    let mut doc = document(vec![Node::text("abc", false)]);
    let svg = doc.generate(&conf, 0.0, 0.0);
    let els = elements(&svg);
    // 3 chars * 12pt * 0.65 + 2 * 5 padding
    let width = named(&els, "svg")[0].num("width");
    assert!((width - 33.4).abs() < 1e-9, "width was {width}");
}

#[test]
fn test_shared_config_snapshot_drives_generation() {
    let shared = SharedConfig::new(fixed_conf());
    let mut doc = document(vec![Node::text("x", false)]);
    let small = doc.generate(&shared.current(), 0.0, 0.0);

    shared.replace(SvgConfig::default().with_font_size(24.0).with_measurer(FixedMeasurer));
    let large = doc.generate(&shared.current(), 0.0, 0.0);

    assert!(small.contains("font-size: 12pt;"));
    assert!(large.contains("font-size: 24pt;"));
    assert!(doc.bounds().h > 0.0);
}

// ─── Hit-Region Overlay ─────────────────────────────────────────

#[test]
fn test_link_around_text_yields_one_region() {
    let conf = fixed_conf();
    let mut doc = document(vec![
        black_rect(15.0, 5.0),
        Node::link("https://example.org/boards/alpha-v1")
            .with_child(Node::text("alpha", false))
            .unwrap(),
    ]);
    doc.generate(&conf, 0.0, 0.0);

    let link = doc.walk().find(|n| matches!(n.kind, tablesvg::NodeKind::Link { .. })).unwrap();
    let b = link.bounds();
    assert_eq!(b.x1, 15.0);

    let regions = collect_link_regions(&doc);
    assert_eq!(regions.len(), 1);
    match &regions[0] {
        MapNode::Rect {
            x1,
            y1,
            x2,
            y2,
            alt,
            href,
        } => {
            assert_eq!((*x1, *y1, *x2, *y2), (b.x1, b.y1, b.x2, b.y2));
            assert_eq!(alt, "alpha-v1");
            assert_eq!(href, "https://example.org/boards/alpha-v1");
        }
        other => panic!("expected rect region, got {other:?}"),
    }
}

#[test]
fn test_html_overlay_lists_every_link() {
    let conf = fixed_conf();
    let mut doc = document(vec![
        Node::link("https://x.org/a").with_child(black_rect(10.0, 10.0)).unwrap(),
        Node::carriage_return(),
        Node::line_feed(),
        Node::link("https://x.org/b").with_child(black_rect(10.0, 10.0)).unwrap(),
    ]);
    doc.generate(&conf, 0.0, 0.0);
    let html = gen_html(&doc, "matrix.svg");

    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains(r##"usemap="#svg_map""##));
    assert_eq!(html.matches("<area shape=\"rect\"").count(), 2);
    assert!(html.contains(r#"coords="0,0,10,10" alt="a""#));
    assert!(html.contains(r#"coords="0,10,10,20" alt="b""#));
}

// ─── JSON Documents ─────────────────────────────────────────────

#[test]
fn test_render_json_document() {
    let rendered = tablesvg::render_json(
        r#"{
            "id": "matrix",
            "children": [
                { "type": "Rect", "width": 10, "height": 10 },
                { "type": "NewLine" },
                { "type": "Link", "href": "https://x.org/boards/b1", "children": [
                    { "type": "RectContainer", "fill": "rgb(0,200,0)", "children": [
                        { "type": "TextCenter", "text": "ok", "width": 40, "height": 20 }
                    ]}
                ]}
            ]
        }"#,
    )
    .unwrap();

    let els = elements(&rendered.svg);
    let root = named(&els, "svg")[0];
    assert_eq!(root.attrs["id"], "matrix");
    assert_eq!(named(&els, "a").len(), 1);
    assert_eq!(named(&els, "a")[0].attrs["xlink:href"], "https://x.org/boards/b1");

    let html = rendered.html("matrix.svg");
    assert!(html.contains(r#"alt="b1" href="https://x.org/boards/b1""#));
    assert!(html.contains(r#"coords="0,10,"#));
}

#[test]
fn test_render_json_rejects_children_on_leaves() {
    let err = tablesvg::render_json(
        r#"{ "children": [{ "type": "Rect", "width": 1, "height": 1, "children": [] }] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, tablesvg::Error::Parse { .. }), "{err}");
}

#[test]
fn test_render_json_rejects_children_on_line_feed() {
    let err = tablesvg::render_json(
        r#"{ "children": [
            { "type": "Rect", "width": 10, "height": 10 },
            { "type": "LineFeed", "children": [{ "type": "Rect", "width": 99, "height": 99 }] }
        ] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, tablesvg::Error::Parse { .. }), "{err}");
}

#[test]
fn test_render_json_bad_syntax_has_hint() {
    let err = tablesvg::render_json("{ \"children\": [ ").unwrap_err();
    assert!(err.to_string().contains("Hint:"), "{err}");
}
