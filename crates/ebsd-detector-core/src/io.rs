//! JSON configuration and geometry report helpers.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detector::{DetectorConfig, EbsdDetector};
use crate::gnomonic::GnomonicBounds;

#[derive(thiserror::Error, Debug)]
pub enum DetectorIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DetectorConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DetectorIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DetectorIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Snapshot of every derived quantity of a detector, for diagnostics and
/// downstream tooling.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeometryReport {
    pub shape: [usize; 2],
    pub px_size: f64,
    pub px_size_binned: f64,
    pub binning: u32,
    pub tilt: f64,
    pub azimuthal: f64,
    pub sample_tilt: f64,
    pub aspect_ratio: f64,
    pub width_um: f64,
    pub height_um: f64,
    pub navigation_shape: Vec<usize>,
    pub pc_average: [f64; 3],
    pub pc_bruker: Vec<[f64; 3]>,
    pub pc_tsl: Vec<[f64; 3]>,
    pub pc_emsoft: Vec<[f64; 3]>,
    pub gnomonic_bounds: Vec<GnomonicBounds>,
    pub x_scale: Vec<f64>,
    pub y_scale: Vec<f64>,
    pub r_max: Vec<f64>,
}

fn triples(pc: &crate::pc::PcArray) -> Vec<[f64; 3]> {
    pc.entries().iter().map(|v| [v.x, v.y, v.z]).collect()
}

impl GeometryReport {
    /// Collect the derived geometry of a detector.
    pub fn from_detector(det: &EbsdDetector) -> Self {
        let shape = det.shape();
        let avg = det.pc_average();
        Self {
            shape: [shape.nrows, shape.ncols],
            px_size: det.px_size(),
            px_size_binned: det.px_size_binned(),
            binning: det.binning(),
            tilt: det.tilt(),
            azimuthal: det.azimuthal(),
            sample_tilt: det.sample_tilt(),
            aspect_ratio: det.aspect_ratio(),
            width_um: det.width(),
            height_um: det.height(),
            navigation_shape: det.navigation_shape().dims(),
            pc_average: [avg.x, avg.y, avg.z],
            pc_bruker: triples(&det.pc_bruker()),
            pc_tsl: triples(&det.pc_tsl()),
            pc_emsoft: triples(&det.pc_emsoft(crate::convention::EMSOFT_DEFAULT_VERSION)),
            gnomonic_bounds: det.gnomonic_bounds(),
            x_scale: det.x_scale(),
            y_scale: det.y_scale(),
            r_max: det.r_max(),
        }
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DetectorIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DetectorIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
