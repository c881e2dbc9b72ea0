//! SVG serialisation of a surface's scene graph.

use std::fmt::Write;

use glam::DAffine2;

use super::primitive::{Coord, Primitive, PrimitiveId, Shape, Visibility};
use super::surface::Surface;

fn coord(c: &Coord) -> String {
    match c {
        Coord::Value(v) => format!("{v}"),
        Coord::Unit(s) => escape(s),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn matrix(t: &DAffine2) -> String {
    let m = t.matrix2;
    format!(
        "matrix({} {} {} {} {} {})",
        m.x_axis.x, m.x_axis.y, m.y_axis.x, m.y_axis.y, t.translation.x, t.translation.y
    )
}

fn style(p: &Primitive) -> String {
    let mut out = String::new();
    if p.visibility == Visibility::Hidden {
        let _ = write!(out, r#" visibility="{}""#, p.visibility.as_str());
    }
    if p.opacity < 1.0 {
        let _ = write!(out, r#" opacity="{}""#, p.opacity);
    }
    if let Some(fill) = &p.fill {
        let _ = write!(out, r#" fill="{}""#, escape(fill));
    }
    if let Some(stroke) = &p.stroke {
        let _ = write!(out, r#" stroke="{}""#, escape(stroke));
    }
    if !p.pointer_events {
        out.push_str(r#" pointer-events="none""#);
    }
    out
}

impl Surface {
    /// Serialise the attached scene as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let vb = self.view_box();
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}""#,
            vb.x, vb.y, vb.width, vb.height
        );
        if let Some(size) = self.container_size() {
            let _ = write!(out, r#" width="{}" height="{}""#, size.x, size.y);
        }
        out.push_str(">\n");

        let mut defs = String::new();
        let mut body = String::new();
        self.write_node(self.root(), 1, &mut defs, &mut body);
        if !defs.is_empty() {
            out.push_str("  <defs>\n");
            out.push_str(&defs);
            out.push_str("  </defs>\n");
        }
        out.push_str(&body);
        out.push_str("</svg>\n");
        out
    }

    fn write_node(
        &self,
        id: PrimitiveId,
        depth: usize,
        defs: &mut String,
        body: &mut String,
    ) {
        let Some(p) = self.get(id) else { return };
        let indent = "  ".repeat(depth);
        let attrs = style(p);
        match &p.shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => {
                let _ = writeln!(
                    body,
                    r#"{indent}<rect x="{}" y="{}" width="{}" height="{}"{attrs}/>"#,
                    coord(x),
                    coord(y),
                    coord(width),
                    coord(height)
                );
            }
            Shape::Path { data } => {
                let _ = writeln!(body, r#"{indent}<path d="{}"{attrs}/>"#, escape(data));
            }
            Shape::Circle { cx, cy, r } => {
                let _ = writeln!(
                    body,
                    r#"{indent}<circle cx="{}" cy="{}" r="{r}"{attrs}/>"#,
                    coord(cx),
                    coord(cy)
                );
            }
            Shape::Text { x, y, content } => {
                let _ = writeln!(
                    body,
                    r#"{indent}<text x="{}" y="{}"{attrs}>{}</text>"#,
                    coord(x),
                    coord(y),
                    escape(content)
                );
            }
            Shape::Group {
                children,
                transform,
            } => {
                let transform = if *transform == DAffine2::IDENTITY {
                    String::new()
                } else {
                    format!(r#" transform="{}""#, matrix(transform))
                };
                let _ = writeln!(body, "{indent}<g{transform}{attrs}>");
                for child in children {
                    self.write_node(*child, depth + 1, defs, body);
                }
                let _ = writeln!(body, "{indent}</g>");
            }
            Shape::Gradient { name, stops } => {
                let _ = writeln!(defs, r#"    <linearGradient id="{}">"#, escape(name));
                for stop in stops {
                    let _ = writeln!(
                        defs,
                        r#"      <stop offset="{}" stop-color="{}"/>"#,
                        stop.offset,
                        escape(&stop.color)
                    );
                }
                defs.push_str("    </linearGradient>\n");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Attributes, GradientStop, ViewBox};

    #[test]
    fn test_svg_contains_scene() {
        let mut s = Surface::new(2.0);
        s.set_view_box(ViewBox {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 50.0,
        });
        let g = s.group();
        let r = s.rect(1.0, 1.0, 5.0, "50%");
        let t = s.text(0.0, 0.0, "A<B");
        let grad = s.gradient(
            "fade",
            vec![GradientStop {
                offset: 0.0,
                color: "#fff".to_owned(),
            }],
        );
        let _ = s.attach(g);
        let _ = s.push(g, r);
        let _ = s.attach(t);
        let _ = s.attach(grad);
        s.apply(g, &Attributes::new().y(3.0)).unwrap();
        s.apply(t, &Attributes::new().visibility(Visibility::Hidden)).unwrap();

        let svg = s.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 100 50""#));
        assert!(svg.contains(r#"<rect x="2" y="2" width="10" height="50%"/>"#));
        assert!(svg.contains("matrix(1 0 0 1 0 6)"));
        assert!(svg.contains(r#"visibility="hidden">A&lt;B</text>"#));
        assert!(svg.contains(r#"<linearGradient id="fade">"#));
    }

    #[test]
    fn test_detached_primitives_are_not_exported() {
        let mut s = Surface::new(1.0);
        let _ = s.circle(1.0, 1.0, 1.0);
        assert!(!s.to_svg().contains("circle"));
    }
}
