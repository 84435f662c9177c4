use std::fmt::Write as _;

use crate::core::geometry::fmt_coord;
use crate::error::FunnelResult;
use crate::render::{NodeKind, Paint, Renderer, Scene};

/// Renderer capturing the scene as SVG markup.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    pub last_markup: String,
}

impl Renderer for SvgRenderer {
    fn render(&mut self, scene: &Scene) -> FunnelResult<()> {
        scene.validate()?;
        self.last_markup = scene_to_svg(scene);
        Ok(())
    }
}

/// Serializes the scene. An unmounted scene serializes to an empty string.
#[must_use]
pub fn scene_to_svg(scene: &Scene) -> String {
    let Some(root) = scene.root() else {
        return String::new();
    };
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg class="funnel-graph" id="{}" width="{}" height="{}" viewBox="0 0 {} {}" preserveAspectRatio="xMidYMin meet">"#,
        escape(&root.id),
        root.width,
        root.height,
        fmt_coord(root.view_box.0),
        fmt_coord(root.view_box.1),
    );

    let mut gradients = scene.gradients().peekable();
    if gradients.peek().is_some() {
        out.push_str("<defs>");
        for gradient in gradients {
            let (x1, y1, x2, y2) = gradient.direction.vector();
            let _ = write!(
                out,
                r#"<linearGradient id="{}" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}">"#,
                escape(&gradient.id),
            );
            for stop in &gradient.stops {
                let _ = write!(
                    out,
                    r#"<stop offset="{}%" stop-color="{}"/>"#,
                    stop.offset_percent,
                    escape(&stop.color)
                );
            }
            out.push_str("</linearGradient>");
        }
        out.push_str("</defs>");
    }

    let _ = write!(
        out,
        r#"<g id="{}_graph" transform="translate({}, {})">"#,
        escape(&root.id),
        fmt_coord(root.graph_offset.0),
        fmt_coord(root.graph_offset.1),
    );
    for node in scene.nodes() {
        let NodeKind::Path(path) = &node.kind else {
            continue;
        };
        let _ = write!(
            out,
            r#"<path d="{}" fill="{}" stroke="{}" opacity="{}" stroke-width="{}""#,
            path.shape.to_svg_d(),
            paint(&path.fill),
            paint(&path.stroke),
            fmt_coord(path.opacity),
            fmt_coord(path.stroke_width),
        );
        push_style(&mut out, path.pointer_events, path.cursor_pointer);
        out.push_str("/>");
    }
    out.push_str("</g>");

    let _ = write!(out, r#"<g id="{}_info">"#, escape(&root.id));
    for node in scene.nodes() {
        match &node.kind {
            NodeKind::LabelGroup(group) => {
                let _ = write!(
                    out,
                    r#"<g class="label__group" opacity="{}""#,
                    fmt_coord(group.opacity)
                );
                push_style(&mut out, group.pointer_events, group.cursor_pointer);
                out.push('>');
                for line in &group.lines {
                    let _ = write!(
                        out,
                        r#"<text class="{}" x="{}" y="{}">{}</text>"#,
                        line.role.class_name(),
                        fmt_coord(line.x),
                        fmt_coord(line.y),
                        escape(&line.text),
                    );
                }
                out.push_str("</g>");
            }
            NodeKind::Divider(line) => {
                let _ = write!(
                    out,
                    r#"<line class="divider" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                    fmt_coord(line.x1),
                    fmt_coord(line.y1),
                    fmt_coord(line.x2),
                    fmt_coord(line.y2),
                );
            }
            NodeKind::Path(_) => {}
        }
    }
    out.push_str("</g></svg>");
    out
}

fn paint(paint: &Paint) -> String {
    match paint {
        Paint::None => "none".to_owned(),
        Paint::Color(color) => escape(color),
        Paint::Gradient(id) => format!("url(&quot;#{}&quot;)", escape(id)),
    }
}

fn push_style(out: &mut String, pointer_events: bool, cursor_pointer: bool) {
    let events = if pointer_events { "all" } else { "none" };
    let _ = write!(out, r#" style="pointer-events: {events};"#);
    if cursor_pointer {
        out.push_str(" cursor: pointer;");
    }
    out.push('"');
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
