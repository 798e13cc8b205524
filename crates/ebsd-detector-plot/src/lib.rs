//! SVG diagnostic plots for EBSD detector geometry.
//!
//! Consumes only the numeric outputs of `ebsd-detector-core` (bounds,
//! PCs, scales) and renders self-contained SVG documents: the detector
//! screen with its projection center and gnomonic circles, and the PC
//! distribution over a scan.

mod diagram;
mod pc_plot;
mod svg;

pub use diagram::{detector_diagram, CoordinateFrame, DiagramOptions};
pub use pc_plot::{pc_plot, Orientation, PcPlotOptions, PlotError, PlotMode};
