//! Detector screen diagram.
//!
//! Draws the detector as seen from the detector towards the sample, in
//! pixel or gnomonic coordinates, with the average projection center and
//! optional gnomonic angle circles. The circle radii are `tan(angle)`,
//! following Winkelmann's plotting of angular distances from the pattern
//! center; they are positioned correctly only in gnomonic coordinates.

use ebsd_detector_core::EbsdDetector;
use log::debug;

use crate::svg::SvgCanvas;

/// Coordinate frame of the diagram axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoordinateFrame {
    #[default]
    Detector,
    Gnomonic,
}

/// Options for [`detector_diagram`].
#[derive(Clone, Debug)]
pub struct DiagramOptions {
    pub coordinates: CoordinateFrame,
    /// Mark the average PC with a star.
    pub show_pc: bool,
    /// Draw circles of constant angular distance from the PC.
    pub gnomonic_circles: bool,
    /// Angular distances in degrees for the circles.
    pub gnomonic_angles: Vec<f64>,
    /// View zoom; values above 1 zoom out to show circle extents.
    pub zoom: f64,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            coordinates: CoordinateFrame::Detector,
            show_pc: true,
            gnomonic_circles: false,
            gnomonic_angles: (1..9).map(|k| 10.0 * k as f64).collect(),
            zoom: 1.0,
        }
    }
}

const CANVAS_SIZE: f64 = 640.0;
const MARGIN: f64 = 40.0;

/// Render the detector screen as an SVG document.
pub fn detector_diagram(det: &EbsdDetector, opts: &DiagramOptions) -> String {
    let pc = det.pc_average();

    // World-coordinate view box [x0, x1] x [y0, y1] and the PC position
    // within it. Detector frame: pixel coordinates, y down. Gnomonic
    // frame: PC at the origin, y up.
    let (view, pc_world) = match opts.coordinates {
        CoordinateFrame::Detector => {
            let [x0, x1, y0, y1] = det.bounds().map(|v| v as f64);
            (
                [x0, x1, y1, y0],
                (pc.x * (det.ncols() - 1) as f64, pc.y * (det.nrows() - 1) as f64),
            )
        }
        CoordinateFrame::Gnomonic => {
            let b = det.average_gnomonic_bounds();
            ([b.x_min, b.x_max, b.y_min, b.y_max], (0.0, 0.0))
        }
    };
    debug!(
        "detector diagram in {:?} frame, view box {view:?}",
        opts.coordinates
    );

    let cx = 0.5 * (view[0] + view[1]);
    let cy = 0.5 * (view[2] + view[3]);
    let half_w = 0.5 * (view[1] - view[0]).abs() * opts.zoom;
    let half_h = 0.5 * (view[3] - view[2]).abs() * opts.zoom;
    let span = half_w.max(half_h).max(f64::MIN_POSITIVE);
    let scale = (CANVAS_SIZE / 2.0 - MARGIN) / span;

    // Flip y for the gnomonic frame so positive y points up on screen.
    let y_sign = match opts.coordinates {
        CoordinateFrame::Detector => 1.0,
        CoordinateFrame::Gnomonic => -1.0,
    };
    let to_px = |x: f64, y: f64| {
        (
            CANVAS_SIZE / 2.0 + (x - cx) * scale,
            CANVAS_SIZE / 2.0 + y_sign * (y - cy) * scale,
        )
    };

    let mut canvas = SvgCanvas::new(CANVAS_SIZE, CANVAS_SIZE);

    // Detector screen.
    let (sx0, sy0) = to_px(view[0], view[2].min(view[3]));
    let (sx1, sy1) = to_px(view[1], view[2].max(view[3]));
    let (rx, ry) = (sx0.min(sx1), sy0.min(sy1));
    canvas.rect(
        rx,
        ry,
        (sx1 - sx0).abs(),
        (sy1 - sy0).abs(),
        "#808080",
        "black",
    );

    let (pcx_px, pcy_px) = to_px(pc_world.0, pc_world.1);

    if opts.gnomonic_circles {
        for angle in &opts.gnomonic_angles {
            let r_world = angle.to_radians().tan();
            canvas.circle(pcx_px, pcy_px, r_world * scale, "none", "black", 0.4);
        }
    }

    if opts.show_pc {
        canvas.star(pcx_px, pcy_px, 12.0, "gold", "black");
    }

    let axis_label = match opts.coordinates {
        CoordinateFrame::Detector => ("x detector", "y detector"),
        CoordinateFrame::Gnomonic => ("x gnomonic", "y gnomonic"),
    };
    canvas.text(CANVAS_SIZE / 2.0, CANVAS_SIZE - 8.0, 14.0, "middle", axis_label.0);
    canvas.text(12.0, CANVAS_SIZE / 2.0, 14.0, "middle", axis_label.1);

    canvas.finish()
}
