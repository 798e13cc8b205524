//! Projection center distribution plots.
//!
//! `map` mode shows each PC component as a colormapped panel over the 2-D
//! scan grid; `scatter` mode shows the pairwise component scatter of all
//! PCs. Both need more than one PC to say anything.

use std::str::FromStr;

use ebsd_detector_core::{EbsdDetector, NavShape};

use crate::svg::SvgCanvas;

/// How to plot the PC distribution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlotMode {
    #[default]
    Map,
    Scatter,
}

/// Panel layout direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// PC plot request errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlotError {
    #[error("detector must have more than one projection center to plot")]
    SinglePc,
    #[error("pc map plot requires a 2-dimensional navigation shape, got {ndim} dimension(s)")]
    MapNeedsGrid { ndim: usize },
    #[error("unknown plot mode '{0}'; expected 'map' or 'scatter'")]
    UnknownMode(String),
}

impl FromStr for PlotMode {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "map" => Ok(Self::Map),
            "scatter" => Ok(Self::Scatter),
            _ => Err(PlotError::UnknownMode(s.to_string())),
        }
    }
}

/// Options for [`pc_plot`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PcPlotOptions {
    pub mode: PlotMode,
    pub orientation: Orientation,
    /// Label each scatter point with its flattened index.
    pub annotate: bool,
}

const PANEL: f64 = 220.0;
const PANEL_MARGIN: f64 = 36.0;
const COMPONENT_LABELS: [&str; 3] = ["PCx", "PCy", "PCz"];

/// Render the PC distribution of a detector as an SVG document.
pub fn pc_plot(det: &EbsdDetector, opts: &PcPlotOptions) -> Result<String, PlotError> {
    if det.navigation_size() <= 1 {
        return Err(PlotError::SinglePc);
    }

    match opts.mode {
        PlotMode::Map => pc_map(det, opts.orientation),
        PlotMode::Scatter => Ok(pc_scatter(det, opts)),
    }
}

fn canvas_for(orientation: Orientation) -> (SvgCanvas, impl Fn(usize) -> (f64, f64)) {
    let step = PANEL + 2.0 * PANEL_MARGIN;
    let (w, h) = match orientation {
        Orientation::Horizontal => (3.0 * step, step),
        Orientation::Vertical => (step, 3.0 * step),
    };
    let origin = move |panel: usize| {
        let offset = panel as f64 * step + PANEL_MARGIN;
        match orientation {
            Orientation::Horizontal => (offset, PANEL_MARGIN),
            Orientation::Vertical => (PANEL_MARGIN, offset),
        }
    };
    (SvgCanvas::new(w, h), origin)
}

/// Linear two-color ramp for map cells, dark to light.
fn ramp(t: f64) -> String {
    let lerp = |a: f64, b: f64| a + (b - a) * t.clamp(0.0, 1.0);
    format!(
        "rgb({:.0},{:.0},{:.0})",
        lerp(68.0, 253.0),
        lerp(1.0, 231.0),
        lerp(84.0, 37.0)
    )
}

fn pc_map(det: &EbsdDetector, orientation: Orientation) -> Result<String, PlotError> {
    let NavShape::Grid { rows, cols } = det.navigation_shape() else {
        return Err(PlotError::MapNeedsGrid {
            ndim: det.navigation_dimension(),
        });
    };

    let (mut canvas, origin) = canvas_for(orientation);
    let components = [det.pcx(), det.pcy(), det.pcz()];

    for (panel, values) in components.iter().enumerate() {
        let (x0, y0) = origin(panel);
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = if hi > lo { hi - lo } else { 1.0 };

        let cell_w = PANEL / cols as f64;
        let cell_h = PANEL / rows as f64;
        for row in 0..rows {
            for col in 0..cols {
                let v = values[row * cols + col];
                canvas.rect(
                    x0 + col as f64 * cell_w,
                    y0 + row as f64 * cell_h,
                    cell_w,
                    cell_h,
                    &ramp((v - lo) / span),
                    "none",
                );
            }
        }
        canvas.rect(x0, y0, PANEL, PANEL, "none", "black");
        canvas.text(
            x0 + PANEL / 2.0,
            y0 - 8.0,
            13.0,
            "middle",
            &format!("{} [{lo:.4}, {hi:.4}]", COMPONENT_LABELS[panel]),
        );
    }

    Ok(canvas.finish())
}

fn pc_scatter(det: &EbsdDetector, opts: &PcPlotOptions) -> String {
    let (mut canvas, origin) = canvas_for(opts.orientation);
    let flat = det.pc().entries();
    let n = flat.len();

    // Component pairs per panel: (x, y), (x, z), (z, y).
    for (panel, (i, j)) in [(0, 1), (0, 2), (2, 1)].into_iter().enumerate() {
        let (x0, y0) = origin(panel);
        let xs: Vec<f64> = flat.iter().map(|pc| pc[i]).collect();
        let ys: Vec<f64> = flat.iter().map(|pc| pc[j]).collect();

        let x_lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let x_hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let y_lo = ys.iter().copied().fold(f64::INFINITY, f64::min);
        let y_hi = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let x_span = if x_hi > x_lo { x_hi - x_lo } else { 1.0 };
        let y_span = if y_hi > y_lo { y_hi - y_lo } else { 1.0 };

        canvas.rect(x0, y0, PANEL, PANEL, "none", "black");
        for (k, (&x, &y)) in xs.iter().zip(&ys).enumerate() {
            let px = x0 + (x - x_lo) / x_span * PANEL;
            let py = y0 + PANEL - (y - y_lo) / y_span * PANEL;
            let t = if n > 1 { k as f64 / (n - 1) as f64 } else { 0.0 };
            canvas.circle(px, py, 4.0, &ramp(t), "black", 1.0);
            if opts.annotate {
                canvas.text(px + 5.0, py - 5.0, 10.0, "start", &k.to_string());
            }
        }
        canvas.text(
            x0 + PANEL / 2.0,
            y0 + PANEL + 24.0,
            13.0,
            "middle",
            COMPONENT_LABELS[i],
        );
        canvas.text(x0 - 24.0, y0 + PANEL / 2.0, 13.0, "middle", COMPONENT_LABELS[j]);
    }

    canvas.finish()
}
