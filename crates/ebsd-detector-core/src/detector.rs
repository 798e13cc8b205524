//! The EBSD detector geometry value object.

use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::convention::{Convention, ConventionError, EMSOFT_DEFAULT_VERSION};
use crate::gnomonic::GnomonicBounds;
use crate::pc::{NavShape, PcArray, PcArrayError, PcInput};

/// Detector shape in pixels (possibly binned).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorShape {
    pub nrows: usize,
    pub ncols: usize,
}

/// Detector construction errors.
#[derive(thiserror::Error, Debug)]
pub enum DetectorError {
    #[error("detector shape must have positive rows and columns, got {nrows}x{ncols}")]
    InvalidShape { nrows: usize, ncols: usize },
    #[error("px_size must be finite and positive, got {0}")]
    InvalidPxSize(f64),
    #[error("binning must be at least 1")]
    InvalidBinning,
    #[error(transparent)]
    Convention(#[from] ConventionError),
    #[error(transparent)]
    Pc(#[from] PcArrayError),
}

/// Crop extent validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CropError {
    #[error("crop extent top {top}, bottom {bottom} leaves no rows; bottom must exceed top")]
    EmptyRows { top: i64, bottom: i64 },
    #[error("crop extent left {left}, right {right} leaves no columns; right must exceed left")]
    EmptyColumns { left: i64, right: i64 },
}

/// Pixel window for [`EbsdDetector::crop`], in detector pixel coordinates
/// with the origin in the upper left corner. The window covers rows
/// `top..bottom` and columns `left..right` (half-open).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropExtent {
    pub top: i64,
    pub bottom: i64,
    pub left: i64,
    pub right: i64,
}

fn default_shape() -> [usize; 2] {
    [1, 1]
}

fn default_px_size() -> f64 {
    1.0
}

fn default_binning() -> u32 {
    1
}

fn default_sample_tilt() -> f64 {
    70.0
}

/// Declarative detector description, the JSON-facing side of
/// [`EbsdDetector`]. All fields have the conventional defaults, so a
/// config may specify only what deviates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Detector rows and columns in pixels.
    #[serde(default = "default_shape")]
    pub shape: [usize; 2],
    /// Unbinned pixel size in microns (square pixels).
    #[serde(default = "default_px_size")]
    pub px_size: f64,
    /// How many physical pixels are combined into one logical pixel.
    #[serde(default = "default_binning")]
    pub binning: u32,
    /// Detector tilt from horizontal, degrees.
    #[serde(default)]
    pub tilt: f64,
    /// Sample tilt about the sample RD axis, degrees.
    #[serde(default)]
    pub azimuthal: f64,
    /// Sample tilt from horizontal, degrees.
    #[serde(default = "default_sample_tilt")]
    pub sample_tilt: f64,
    /// Projection center(s) in the convention named by `convention`.
    #[serde(default)]
    pub pc: PcInput,
    /// PC convention of the `pc` field. Bruker when omitted.
    #[serde(default)]
    pub convention: Option<Convention>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            shape: default_shape(),
            px_size: default_px_size(),
            binning: default_binning(),
            tilt: 0.0,
            azimuthal: 0.0,
            sample_tilt: default_sample_tilt(),
            pc: PcInput::default(),
            convention: None,
        }
    }
}

impl DetectorConfig {
    /// Validate this config into a detector.
    pub fn build(&self) -> Result<EbsdDetector, DetectorError> {
        EbsdDetector::new(self)
    }
}

/// An EBSD detector: shape, pixel size, binning, tilts and one projection
/// center (PC) per scan point.
///
/// PCs are stored in the Bruker convention regardless of the convention
/// they were supplied in; conversion happens once at construction and on
/// demand through the `pc_*` exports. All derived quantities are pure
/// functions of the stored state.
#[derive(Clone, Debug, PartialEq)]
pub struct EbsdDetector {
    shape: DetectorShape,
    px_size: f64,
    binning: u32,
    tilt: f64,
    azimuthal: f64,
    sample_tilt: f64,
    pc: PcArray,
}

impl EbsdDetector {
    /// Validate a config and convert its PCs into the internal Bruker
    /// convention.
    pub fn new(config: &DetectorConfig) -> Result<Self, DetectorError> {
        let [nrows, ncols] = config.shape;
        if nrows == 0 || ncols == 0 {
            return Err(DetectorError::InvalidShape { nrows, ncols });
        }
        if !config.px_size.is_finite() || config.px_size <= 0.0 {
            return Err(DetectorError::InvalidPxSize(config.px_size));
        }
        if config.binning == 0 {
            return Err(DetectorError::InvalidBinning);
        }

        let pc = PcArray::from_input(&config.pc)?;
        let mut detector = Self {
            shape: DetectorShape { nrows, ncols },
            px_size: config.px_size,
            binning: config.binning,
            tilt: config.tilt,
            azimuthal: config.azimuthal,
            sample_tilt: config.sample_tilt,
            pc,
        };

        let convention = config.convention.unwrap_or_default();
        if convention != Convention::Bruker {
            debug!(
                "converting {} projection center(s) from {convention} to bruker",
                detector.pc.len()
            );
        }
        detector.pc = detector.pc_to_bruker(convention);
        Ok(detector)
    }

    /// The declarative config describing this detector, with PCs in the
    /// Bruker convention. Building it reproduces the detector.
    pub fn to_config(&self) -> DetectorConfig {
        DetectorConfig {
            shape: [self.shape.nrows, self.shape.ncols],
            px_size: self.px_size,
            binning: self.binning,
            tilt: self.tilt,
            azimuthal: self.azimuthal,
            sample_tilt: self.sample_tilt,
            pc: self.pc.to_input(),
            convention: Some(Convention::Bruker),
        }
    }

    // ------------------------- configuration ------------------------- //

    /// Detector shape in pixels.
    #[inline]
    pub fn shape(&self) -> DetectorShape {
        self.shape
    }

    /// Number of detector pixel rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.shape.nrows
    }

    /// Number of detector pixel columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.shape.ncols
    }

    /// Number of detector pixels.
    #[inline]
    pub fn size(&self) -> usize {
        self.shape.nrows * self.shape.ncols
    }

    /// Unbinned pixel size in microns.
    #[inline]
    pub fn px_size(&self) -> f64 {
        self.px_size
    }

    /// Binning factor.
    #[inline]
    pub fn binning(&self) -> u32 {
        self.binning
    }

    /// Detector tilt from horizontal, degrees.
    #[inline]
    pub fn tilt(&self) -> f64 {
        self.tilt
    }

    /// Azimuthal sample tilt, degrees.
    #[inline]
    pub fn azimuthal(&self) -> f64 {
        self.azimuthal
    }

    /// Sample tilt from horizontal, degrees.
    #[inline]
    pub fn sample_tilt(&self) -> f64 {
        self.sample_tilt
    }

    /// Binned pixel size in microns.
    #[inline]
    pub fn px_size_binned(&self) -> f64 {
        self.px_size * self.binning as f64
    }

    /// Detector shape before binning.
    pub fn unbinned_shape(&self) -> DetectorShape {
        DetectorShape {
            nrows: self.shape.nrows * self.binning as usize,
            ncols: self.shape.ncols * self.binning as usize,
        }
    }

    /// Detector width in microns.
    #[inline]
    pub fn width(&self) -> f64 {
        self.shape.ncols as f64 * self.px_size_binned()
    }

    /// Detector height in microns.
    #[inline]
    pub fn height(&self) -> f64 {
        self.shape.nrows as f64 * self.px_size_binned()
    }

    /// Columns divided by rows.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.shape.ncols as f64 / self.shape.nrows as f64
    }

    /// Detector bounds `[x0, x1, y0, y1]` in pixel coordinates.
    pub fn bounds(&self) -> [usize; 4] {
        [0, self.shape.ncols - 1, 0, self.shape.nrows - 1]
    }

    // --------------------- projection centers ------------------------ //

    /// The stored PC array (Bruker convention).
    #[inline]
    pub fn pc(&self) -> &PcArray {
        &self.pc
    }

    /// Navigation shape of the PC array.
    #[inline]
    pub fn navigation_shape(&self) -> NavShape {
        self.pc.nav_shape()
    }

    /// Number of navigation dimensions of the PC array (0 to 2).
    #[inline]
    pub fn navigation_dimension(&self) -> usize {
        self.pc.nav_dimension()
    }

    /// Number of projection centers.
    #[inline]
    pub fn navigation_size(&self) -> usize {
        self.pc.len()
    }

    /// NaN-ignoring average PC in the Bruker convention.
    pub fn pc_average(&self) -> Vector3<f64> {
        self.pc.mean()
    }

    /// PC x components, flattened in navigation order.
    pub fn pcx(&self) -> Vec<f64> {
        self.pc.x()
    }

    /// PC y components, flattened in navigation order.
    pub fn pcy(&self) -> Vec<f64> {
        self.pc.y()
    }

    /// PC z components, flattened in navigation order.
    pub fn pcz(&self) -> Vec<f64> {
        self.pc.z()
    }

    /// A detector with the PC array reshaped to the given navigation
    /// dimensions; the entry count must be preserved.
    pub fn with_navigation_shape(&self, dims: &[usize]) -> Result<Self, PcArrayError> {
        let pc = self.pc.reshape(dims)?;
        Ok(Self {
            pc,
            ..self.clone()
        })
    }

    /// A detector with the PC x components replaced, other components and
    /// configuration unchanged.
    pub fn with_pcx(&self, values: &[f64]) -> Result<Self, PcArrayError> {
        self.with_pc_component(0, values)
    }

    /// A detector with the PC y components replaced.
    pub fn with_pcy(&self, values: &[f64]) -> Result<Self, PcArrayError> {
        self.with_pc_component(1, values)
    }

    /// A detector with the PC z components replaced.
    pub fn with_pcz(&self, values: &[f64]) -> Result<Self, PcArrayError> {
        self.with_pc_component(2, values)
    }

    fn with_pc_component(&self, axis: usize, values: &[f64]) -> Result<Self, PcArrayError> {
        let pc = self.pc.with_component(axis, values)?;
        Ok(Self {
            pc,
            ..self.clone()
        })
    }

    /// Specimen to scintillator distance per PC entry, in microns (`L` in
    /// the EMsoft convention).
    pub fn specimen_scintillator_distance(&self) -> Vec<f64> {
        let height = self.height();
        self.pc.entries().iter().map(|pc| pc.z * height).collect()
    }

    // --------------------- convention exports ------------------------ //

    /// PCs in the Bruker convention (the stored representation).
    pub fn pc_bruker(&self) -> PcArray {
        self.pc.clone()
    }

    /// PCs in the EDAX TSL convention.
    pub fn pc_tsl(&self) -> PcArray {
        let a = self.aspect_ratio();
        self.pc
            .map(|pc| Vector3::new(pc.x, (1.0 - pc.y) / a, pc.z / a))
    }

    /// PCs in the Oxford Instruments convention (numerically identical to
    /// TSL).
    pub fn pc_oxford(&self) -> PcArray {
        self.pc_tsl()
    }

    /// PCs in the EMsoft convention for the given EMsoft version.
    ///
    /// The x coordinate points right from version 5 on and left before.
    pub fn pc_emsoft(&self, version: u8) -> PcArray {
        let nxb = self.shape.ncols as f64 * self.binning as f64;
        let nyb = self.shape.nrows as f64 * self.binning as f64;
        let px = self.px_size;
        self.pc.map(|pc| {
            let mut xpc = (0.5 - pc.x) * nxb;
            if version < EMSOFT_DEFAULT_VERSION {
                xpc = -xpc;
            }
            Vector3::new(xpc, (0.5 - pc.y) * nyb, pc.z * nyb * px)
        })
    }

    /// PCs exported into any named convention.
    pub fn pc_in(&self, convention: Convention) -> PcArray {
        match convention {
            Convention::Bruker => self.pc_bruker(),
            Convention::Tsl => self.pc_tsl(),
            Convention::Oxford => self.pc_oxford(),
            Convention::Emsoft { version } => self.pc_emsoft(version),
        }
    }

    /// Convert the stored PC array, interpreted in `convention`, into the
    /// internal Bruker representation. Used once at construction.
    fn pc_to_bruker(&self, convention: Convention) -> PcArray {
        match convention {
            Convention::Bruker => self.pc.clone(),
            Convention::Tsl | Convention::Oxford => {
                let a = self.aspect_ratio();
                self.pc
                    .map(|pc| Vector3::new(pc.x, 1.0 - a * pc.y, a * pc.z))
            }
            Convention::Emsoft { version } => {
                let nxb = self.shape.ncols as f64 * self.binning as f64;
                let nyb = self.shape.nrows as f64 * self.binning as f64;
                let px = self.px_size;
                self.pc.map(|pc| {
                    let xpc = if version < EMSOFT_DEFAULT_VERSION {
                        -pc.x
                    } else {
                        pc.x
                    };
                    Vector3::new(0.5 - xpc / nxb, 0.5 - pc.y / nyb, pc.z / (nyb * px))
                })
            }
        }
    }

    // ---------------------- gnomonic geometry ------------------------ //

    /// Gnomonic window per PC entry, flattened in navigation order.
    pub fn gnomonic_bounds(&self) -> Vec<GnomonicBounds> {
        let a = self.aspect_ratio();
        self.pc
            .entries()
            .iter()
            .map(|&pc| GnomonicBounds::from_pc(pc, a))
            .collect()
    }

    /// NaN-ignoring average gnomonic window over all PC entries.
    pub fn average_gnomonic_bounds(&self) -> GnomonicBounds {
        GnomonicBounds::mean(&self.gnomonic_bounds())
    }

    /// Width of one pixel in gnomonic units, per PC entry.
    pub fn x_scale(&self) -> Vec<f64> {
        let ncols = self.ncols();
        self.gnomonic_bounds()
            .iter()
            .map(|b| b.x_scale(ncols))
            .collect()
    }

    /// Height of one pixel in gnomonic units, per PC entry.
    pub fn y_scale(&self) -> Vec<f64> {
        let nrows = self.nrows();
        self.gnomonic_bounds()
            .iter()
            .map(|b| b.y_scale(nrows))
            .collect()
    }

    /// Largest PC-to-corner distance in gnomonic units, per PC entry.
    pub fn r_max(&self) -> Vec<f64> {
        self.gnomonic_bounds().iter().map(GnomonicBounds::r_max).collect()
    }

    // --------------------------- cropping ---------------------------- //

    /// A new detector restricted to the given pixel window, with PCs
    /// remapped so the gnomonic geometry is preserved relative to the new
    /// origin.
    ///
    /// Out-of-range bounds are clamped to the detector; a window that is
    /// empty after clamping is an error. Tilts, binning and pixel size are
    /// carried over unchanged.
    pub fn crop(&self, extent: CropExtent) -> Result<Self, CropError> {
        let ny = self.nrows() as i64;
        let nx = self.ncols() as i64;

        let top = extent.top.max(0);
        let bottom = extent.bottom.min(ny);
        let left = extent.left.max(0);
        let right = extent.right.min(nx);

        let ny_new = bottom - top;
        let nx_new = right - left;
        if ny_new <= 0 {
            return Err(CropError::EmptyRows {
                top: extent.top,
                bottom: extent.bottom,
            });
        }
        if nx_new <= 0 {
            return Err(CropError::EmptyColumns {
                left: extent.left,
                right: extent.right,
            });
        }

        debug!(
            "cropping detector {}x{} to rows {top}..{bottom}, cols {left}..{right}",
            self.nrows(),
            self.ncols()
        );

        let pc = self.pc.map(|pc| {
            Vector3::new(
                (pc.x * nx as f64 - left as f64) / nx_new as f64,
                (pc.y * ny as f64 - top as f64) / ny_new as f64,
                pc.z * ny as f64 / ny_new as f64,
            )
        });

        Ok(Self {
            shape: DetectorShape {
                nrows: ny_new as usize,
                ncols: nx_new as usize,
            },
            pc,
            ..self.clone()
        })
    }
}

impl std::fmt::Display for EbsdDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pc = self.pc_average();
        write!(
            f,
            "EbsdDetector ({}, {}), px_size {} um, binning {}, tilt {}, azimuthal {}, pc ({:.3}, {:.3}, {:.3})",
            self.nrows(),
            self.ncols(),
            self.px_size,
            self.binning,
            self.tilt,
            self.azimuthal,
            pc.x,
            pc.y,
            pc.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn detector(shape: [usize; 2], pc: [f64; 3]) -> EbsdDetector {
        DetectorConfig {
            shape,
            pc: PcInput::Single(pc),
            ..DetectorConfig::default()
        }
        .build()
        .expect("valid detector")
    }

    fn assert_pc_close(actual: Vector3<f64>, expected: [f64; 3], tol: f64) {
        for axis in 0..3 {
            assert!(
                (actual[axis] - expected[axis]).abs() < tol,
                "axis {axis}: {actual:?} !~ {expected:?}"
            );
        }
    }

    #[test]
    fn defaults_match_the_conventional_detector() {
        let det = DetectorConfig::default().build().expect("default");
        assert_eq!(det.shape(), DetectorShape { nrows: 1, ncols: 1 });
        assert_eq!(det.binning(), 1);
        assert_relative_eq!(det.px_size(), 1.0);
        assert_relative_eq!(det.sample_tilt(), 70.0);
        assert_pc_close(det.pc_average(), [0.5, 0.5, 0.5], 1e-12);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let mut cfg = DetectorConfig::default();
        cfg.shape = [0, 10];
        assert!(matches!(
            cfg.build(),
            Err(DetectorError::InvalidShape { .. })
        ));

        let mut cfg = DetectorConfig::default();
        cfg.px_size = -1.0;
        assert!(matches!(cfg.build(), Err(DetectorError::InvalidPxSize(_))));

        let mut cfg = DetectorConfig::default();
        cfg.binning = 0;
        assert!(matches!(cfg.build(), Err(DetectorError::InvalidBinning)));
    }

    #[test]
    fn derived_scalars() {
        let det = DetectorConfig {
            shape: [60, 80],
            px_size: 59.2,
            binning: 8,
            ..DetectorConfig::default()
        }
        .build()
        .expect("detector");

        assert_relative_eq!(det.aspect_ratio(), 80.0 / 60.0);
        assert_relative_eq!(det.px_size_binned(), 59.2 * 8.0);
        assert_relative_eq!(det.width(), 80.0 * 59.2 * 8.0);
        assert_relative_eq!(det.height(), 60.0 * 59.2 * 8.0);
        assert_eq!(
            det.unbinned_shape(),
            DetectorShape {
                nrows: 480,
                ncols: 640
            }
        );
        assert_eq!(det.bounds(), [0, 79, 0, 59]);
        assert_eq!(det.size(), 4800);
    }

    #[test]
    fn emsoft_export_matches_reference_values() {
        // shape (60, 80), pc (0.4, 0.2, 0.6) bruker, binning 8, px 59.2.
        let det = DetectorConfig {
            shape: [60, 80],
            px_size: 59.2,
            binning: 8,
            pc: PcInput::Single([0.4, 0.2, 0.6]),
            convention: Some(Convention::Bruker),
            ..DetectorConfig::default()
        }
        .build()
        .expect("detector");

        let v5 = det.pc_emsoft(5);
        assert_pc_close(v5.entries()[0], [64.0, 144.0, 17049.6], 1e-9);

        let v4 = det.pc_emsoft(4);
        assert_pc_close(v4.entries()[0], [-64.0, 144.0, 17049.6], 1e-9);
    }

    #[test]
    fn tsl_export_matches_reference_values() {
        let det = detector([60, 80], [0.4, 0.2, 0.6]);
        let tsl = det.pc_tsl();
        assert_pc_close(tsl.entries()[0], [0.4, 0.6, 0.45], 1e-12);
        assert_eq!(det.pc_oxford(), tsl);
    }

    #[test]
    fn conversions_round_trip_through_bruker() {
        let bruker = [0.4, 0.2, 0.6];
        let det = detector([60, 80], bruker);

        for convention in [
            Convention::Tsl,
            Convention::Oxford,
            Convention::Emsoft { version: 4 },
            Convention::EMSOFT,
        ] {
            let exported = det.pc_in(convention);
            let back = DetectorConfig {
                shape: [60, 80],
                pc: PcInput::Single(exported.entries()[0].into()),
                convention: Some(convention),
                ..DetectorConfig::default()
            }
            .build()
            .expect("detector");
            assert_pc_close(back.pc_average(), bruker, 1e-12);
        }
    }

    #[test]
    fn construction_converts_tsl_input_once() {
        // pc (0.421, 0.779, 0.505) in EDAX becomes (0.421, 0.221, 0.505)
        // in Bruker on a square detector.
        let det = DetectorConfig {
            shape: [60, 60],
            pc: PcInput::Single([0.421, 0.779, 0.505]),
            convention: Some(Convention::Tsl),
            ..DetectorConfig::default()
        }
        .build()
        .expect("detector");
        assert_pc_close(det.pc_average(), [0.421, 0.221, 0.505], 1e-12);
    }

    #[test]
    fn crop_remaps_pc_to_the_new_origin() {
        let det = detector([6, 6], [0.5, 1.0 / 3.0, 0.5]);
        let cropped = det
            .crop(CropExtent {
                top: 1,
                bottom: 5,
                left: 2,
                right: 6,
            })
            .expect("crop");
        assert_eq!(cropped.shape(), DetectorShape { nrows: 4, ncols: 4 });
        assert_pc_close(cropped.pc_average(), [0.25, 0.25, 0.75], 1e-9);
        assert_relative_eq!(cropped.tilt(), det.tilt());
        assert_relative_eq!(cropped.sample_tilt(), det.sample_tilt());
        assert_eq!(cropped.binning(), det.binning());
    }

    #[test]
    fn full_extent_crop_is_the_identity() {
        let det = detector([60, 80], [0.4, 0.2, 0.6]);
        let cropped = det
            .crop(CropExtent {
                top: 0,
                bottom: 60,
                left: 0,
                right: 80,
            })
            .expect("crop");
        assert_eq!(cropped.shape(), det.shape());
        assert_pc_close(cropped.pc_average(), [0.4, 0.2, 0.6], 1e-12);
    }

    #[test]
    fn out_of_range_extent_is_clamped() {
        let det = detector([6, 6], [0.5, 0.5, 0.5]);
        let cropped = det
            .crop(CropExtent {
                top: -3,
                bottom: 100,
                left: -1,
                right: 100,
            })
            .expect("clamped crop");
        assert_eq!(cropped.shape(), det.shape());
    }

    #[test]
    fn empty_crop_window_is_rejected() {
        let det = detector([6, 6], [0.5, 0.5, 0.5]);
        assert_eq!(
            det.crop(CropExtent {
                top: 4,
                bottom: 2,
                left: 0,
                right: 6
            }),
            Err(CropError::EmptyRows { top: 4, bottom: 2 })
        );
        assert_eq!(
            det.crop(CropExtent {
                top: 0,
                bottom: 6,
                left: 6,
                right: 6
            }),
            Err(CropError::EmptyColumns { left: 6, right: 6 })
        );
    }

    #[test]
    fn navigation_reshape_keeps_entries() {
        let rows: Vec<[f64; 3]> = (0..6).map(|i| [0.4, 0.2 + 0.01 * i as f64, 0.6]).collect();
        let det = DetectorConfig {
            shape: [60, 80],
            pc: PcInput::Row(rows),
            ..DetectorConfig::default()
        }
        .build()
        .expect("detector");
        assert_eq!(det.navigation_dimension(), 1);
        assert_eq!(det.navigation_size(), 6);

        let grid = det.with_navigation_shape(&[2, 3]).expect("reshape");
        assert_eq!(grid.navigation_shape(), NavShape::Grid { rows: 2, cols: 3 });
        assert_eq!(grid.pc().entries(), det.pc().entries());

        assert!(det.with_navigation_shape(&[1, 2, 3]).is_err());
    }

    #[test]
    fn component_updates_are_immutable() {
        let det = detector([60, 60], [0.4, 0.2, 0.6]);
        let updated = det.with_pcx(&[0.45]).expect("update");
        assert_pc_close(updated.pc_average(), [0.45, 0.2, 0.6], 1e-12);
        assert_pc_close(det.pc_average(), [0.4, 0.2, 0.6], 1e-12);
    }

    #[test]
    fn specimen_scintillator_distance_is_pcz_times_height() {
        let det = DetectorConfig {
            shape: [60, 80],
            px_size: 59.2,
            binning: 8,
            pc: PcInput::Single([0.4, 0.2, 0.6]),
            ..DetectorConfig::default()
        }
        .build()
        .expect("detector");
        let l = det.specimen_scintillator_distance();
        assert_eq!(l.len(), 1);
        assert_relative_eq!(l[0], 0.6 * det.height());
        // Same L as the EMsoft z export.
        assert_relative_eq!(l[0], det.pc_emsoft(5).entries()[0].z);
    }

    #[test]
    fn to_config_reproduces_the_detector() {
        let det = DetectorConfig {
            shape: [60, 80],
            px_size: 59.2,
            binning: 8,
            tilt: 5.0,
            pc: PcInput::Single([0.421, 0.779, 0.505]),
            convention: Some(Convention::Tsl),
            ..DetectorConfig::default()
        }
        .build()
        .expect("detector");

        let rebuilt = det.to_config().build().expect("rebuild");
        assert_eq!(rebuilt, det);
    }

    #[test]
    fn display_summarizes_the_detector() {
        let det = detector([60, 60], [0.4, 0.2, 0.6]);
        let repr = det.to_string();
        assert!(repr.starts_with("EbsdDetector (60, 60)"), "{repr}");
        assert!(repr.contains("pc (0.400, 0.200, 0.600)"), "{repr}");
    }
}
