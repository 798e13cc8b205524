//! Tiny SVG assembly helper shared by the plot modules.

use std::fmt::Write;

/// Accumulates SVG elements and renders the final document.
pub(crate) struct SvgCanvas {
    width: f64,
    height: f64,
    body: String,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, stroke: &str) {
        let _ = writeln!(
            self.body,
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{fill}" stroke="{stroke}"/>"#
        );
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str, stroke: &str, opacity: f64) {
        let _ = writeln!(
            self.body,
            r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{fill}" stroke="{stroke}" stroke-width="2" opacity="{opacity:.2}"/>"#
        );
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{stroke}" stroke-width="1"/>"#
        );
    }

    pub fn text(&mut self, x: f64, y: f64, size: f64, anchor: &str, content: &str) {
        let _ = writeln!(
            self.body,
            r#"<text x="{x:.2}" y="{y:.2}" font-size="{size:.0}" font-family="sans-serif" text-anchor="{anchor}">{content}</text>"#
        );
    }

    /// Five-pointed star marker, used for the projection center.
    pub fn star(&mut self, cx: f64, cy: f64, r: f64, fill: &str, stroke: &str) {
        let mut points = String::new();
        for k in 0..10 {
            let radius = if k % 2 == 0 { r } else { 0.4 * r };
            let angle = std::f64::consts::PI * (k as f64 / 5.0 - 0.5);
            let _ = write!(
                points,
                "{:.2},{:.2} ",
                cx + radius * angle.cos(),
                cy + radius * angle.sin()
            );
        }
        let _ = writeln!(
            self.body,
            r#"<polygon points="{}" fill="{fill}" stroke="{stroke}" stroke-width="1.5"/>"#,
            points.trim_end()
        );
    }

    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\" \
             viewBox=\"0 0 {:.0} {:.0}\" style=\"background:white\">\n{}</svg>\n",
            self.width, self.height, self.width, self.height, self.body
        )
    }
}
