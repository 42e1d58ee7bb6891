// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG serialization for [`Scene`].

use core::fmt::Write as _;

use kurbo::Affine;
use peniko::{Brush, Mix};

use crate::node::{Node, Shape, TextAnchor};
use crate::paint::Paint;
use crate::scene::{Item, Scene};

pub(crate) fn write_document(scene: &Scene) -> String {
    let size = scene.size();
    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    let _ = write!(
        out,
        r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = fmt_num(size.width),
        h = fmt_num(size.height),
    );
    out.push('\n');

    for entry in scene.sorted_entries() {
        match &entry.item {
            Item::Node(node) => write_node(&mut out, node),
            Item::Isolated(nodes) => {
                out.push_str(r#"<g style="isolation:isolate">"#);
                out.push('\n');
                for node in sorted_nodes(nodes) {
                    write_node(&mut out, node);
                }
                out.push_str("</g>\n");
            }
        }
    }

    out.push_str("</svg>\n");
    out
}

pub(crate) fn sorted_nodes(nodes: &[Node]) -> Vec<&Node> {
    let mut sorted: Vec<(usize, &Node)> = nodes.iter().enumerate().collect();
    sorted.sort_by_key(|(seq, node)| (node.z_index, *seq));
    sorted.into_iter().map(|(_, node)| node).collect()
}

fn write_node(out: &mut String, node: &Node) {
    match &node.shape {
        Shape::Rect {
            rect,
            corner_radius,
        } => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                fmt_num(rect.x0),
                fmt_num(rect.y0),
                fmt_num(rect.width()),
                fmt_num(rect.height()),
            );
            if *corner_radius > 0.0 {
                let _ = write!(out, r#" rx="{}""#, fmt_num(*corner_radius));
            }
            write_common(out, node);
            out.push_str("/>\n");
        }
        Shape::Circle(c) => {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}""#,
                fmt_num(c.center.x),
                fmt_num(c.center.y),
                fmt_num(c.radius),
            );
            write_common(out, node);
            out.push_str("/>\n");
        }
        Shape::Path(path) => {
            let _ = write!(out, r#"<path d="{}""#, path.to_svg());
            write_common(out, node);
            out.push_str("/>\n");
        }
        Shape::Polygon(points) => {
            let points = points
                .iter()
                .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(out, r#"<polygon points="{points}""#);
            write_common(out, node);
            out.push_str("/>\n");
        }
        Shape::Text(t) => {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}""#,
                fmt_num(t.pos.x),
                fmt_num(t.pos.y)
            );
            if let Some(size) = t.font_size {
                let _ = write!(out, r#" font-size="{}""#, fmt_num(size));
            }
            if let Some(dy) = t.dy_em {
                let _ = write!(out, r#" dy="{}em""#, fmt_num(dy));
            }
            out.push_str(match t.anchor {
                TextAnchor::Start => "",
                TextAnchor::Middle => r#" text-anchor="middle""#,
                TextAnchor::End => r#" text-anchor="end""#,
            });
            if t.italic {
                out.push_str(r#" font-style="italic""#);
            }
            write_common(out, node);
            out.push('>');
            out.push_str(&escape_xml(&t.text));
            out.push_str("</text>\n");
        }
    }
}

fn write_common(out: &mut String, node: &Node) {
    write_paint(out, &node.paint);
    if let Some(transform) = svg_transform(node.transform) {
        let _ = write!(out, r#" transform="{transform}""#);
    }
}

fn write_paint(out: &mut String, paint: &Paint) {
    match &paint.fill {
        Some(brush) => write_paint_attr(out, "fill", brush, paint.fill_opacity),
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = &paint.stroke {
        write_paint_attr(out, "stroke", &stroke.brush, stroke.opacity);
        let _ = write!(out, r#" stroke-width="{}""#, fmt_num(stroke.stroke_width));
        if !stroke.dash.is_empty() {
            let dash = stroke
                .dash
                .iter()
                .map(|d| fmt_num(*d))
                .collect::<Vec<_>>()
                .join(",");
            let _ = write!(out, r#" stroke-dasharray="{dash}""#);
        }
    }
    if let Some(opacity) = paint.opacity {
        let _ = write!(out, r#" opacity="{}""#, fmt_num(opacity));
    }
    if let Some(mode) = blend_mode(paint.blend) {
        let _ = write!(out, r#" style="mix-blend-mode:{mode}""#);
    }
}

fn blend_mode(mix: Mix) -> Option<&'static str> {
    match mix {
        Mix::Multiply => Some("multiply"),
        Mix::Screen => Some("screen"),
        Mix::Overlay => Some("overlay"),
        Mix::Darken => Some("darken"),
        Mix::Lighten => Some("lighten"),
        _ => None,
    }
}

fn svg_transform(transform: Affine) -> Option<String> {
    if transform == Affine::IDENTITY {
        return None;
    }
    let [a, b, c, d, e, f] = transform.as_coeffs();
    if a == 1.0 && b == 0.0 && c == 0.0 && d == 1.0 {
        return Some(format!("translate({},{})", fmt_num(e), fmt_num(f)));
    }
    Some(format!(
        "matrix({} {} {} {} {} {})",
        fmt_num(a),
        fmt_num(b),
        fmt_num(c),
        fmt_num(d),
        fmt_num(e),
        fmt_num(f)
    ))
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let fill_opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, fill_opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush, extra_opacity: Option<f64>) {
    let (value, alpha) = svg_paint(brush);
    let _ = write!(out, r#" {name}="{value}""#);
    let opacity = match (alpha, extra_opacity) {
        (Some(a), Some(b)) => Some(a * b),
        (a, b) => a.or(b),
    };
    if let Some(o) = opacity {
        let _ = write!(out, r#" {name}-opacity="{}""#, fmt_num(o));
    }
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
pub fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let rounded = (v * 1000.0).round() / 1000.0;
    // Avoid "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Node, StrokeStyle, TextSpec};
    use kurbo::{Point, Rect};
    use peniko::Color;
    use peniko::color::palette::css;

    fn parse(svg: &str) -> roxmltree::Document<'_> {
        roxmltree::Document::parse(svg).unwrap()
    }

    #[test]
    fn writes_root_size_and_view_box() {
        let scene = Scene::new(500.0, 300.0);
        let svg = scene.to_svg_string();
        let doc = parse(&svg);
        let root = doc.root_element();
        assert_eq!(root.attribute("width"), Some("500"), "width");
        assert_eq!(root.attribute("height"), Some("300"), "height");
        assert_eq!(root.attribute("viewBox"), Some("0 0 500 300"), "viewBox");
    }

    #[test]
    fn writes_paint_and_blend() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(
            Node::rect(Rect::new(1.0, 2.0, 4.0, 6.0))
                .with_fill(Color::from_rgb8(0x95, 0xda, 0xb6))
                .with_fill_opacity(0.5)
                .with_stroke(StrokeStyle::solid(css::WHITE, 2.0).with_dash(&[5.0, 1.0]))
                .with_blend(Mix::Multiply),
        );
        let svg = scene.to_svg_string();
        let doc = parse(&svg);
        let rect = doc
            .descendants()
            .find(|n| n.has_tag_name("rect"))
            .unwrap();
        assert_eq!(rect.attribute("fill"), Some("#95dab6"), "fill");
        assert_eq!(rect.attribute("fill-opacity"), Some("0.5"), "fill-opacity");
        assert_eq!(rect.attribute("stroke"), Some("#ffffff"), "stroke");
        assert_eq!(rect.attribute("stroke-dasharray"), Some("5,1"), "dash");
        assert_eq!(rect.attribute("width"), Some("3"), "width");
        assert_eq!(
            rect.attribute("style"),
            Some("mix-blend-mode:multiply"),
            "blend"
        );
    }

    #[test]
    fn escapes_text_and_writes_transform() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(
            Node::text(TextSpec::new(Point::new(1.0, 2.0), "a<b & c").with_italic(true))
                .with_fill(css::BLACK)
                .with_transform(Affine::translate((3.0, 4.0))),
        );
        let svg = scene.to_svg_string();
        let doc = parse(&svg);
        let text = doc
            .descendants()
            .find(|n| n.has_tag_name("text"))
            .unwrap();
        assert_eq!(text.text(), Some("a<b & c"), "round-trips escaped content");
        assert_eq!(text.attribute("transform"), Some("translate(3,4)"), "translate");
        assert_eq!(text.attribute("font-style"), Some("italic"), "italic");
    }

    #[test]
    fn isolated_groups_wrap_members() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push_isolated(
            0,
            vec![
                Node::circle(Point::new(1.0, 1.0), 2.0).with_fill(css::RED),
                Node::circle(Point::new(2.0, 2.0), 2.0).with_fill(css::BLUE),
            ],
        );
        let svg = scene.to_svg_string();
        let doc = parse(&svg);
        let group = doc.descendants().find(|n| n.has_tag_name("g")).unwrap();
        assert_eq!(
            group.attribute("style"),
            Some("isolation:isolate"),
            "isolation"
        );
        assert_eq!(
            group.children().filter(|n| n.has_tag_name("circle")).count(),
            2,
            "members inside the group"
        );
    }

    #[test]
    fn fmt_num_trims() {
        assert_eq!(fmt_num(1.0), "1", "integer");
        assert_eq!(fmt_num(0.123_456), "0.123", "three decimals");
        assert_eq!(fmt_num(-0.000_1), "0", "negative zero");
        assert_eq!(fmt_num(f64::NAN), "0", "non-finite");
    }
}
