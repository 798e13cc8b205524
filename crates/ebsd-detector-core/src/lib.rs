//! EBSD detector geometry.
//!
//! This crate is intentionally small and purely geometric. It models an
//! electron backscatter diffraction detector as a plain value object:
//! shape, pixel size, binning, tilts and one projection center (PC) per
//! scan point. From that state it derives the gnomonic projection window
//! of the screen and converts PCs between the vendor coordinate
//! conventions (Bruker, EDAX TSL, Oxford, EMsoft).
//!
//! ## Quickstart
//!
//! ```
//! use ebsd_detector_core::{DetectorConfig, PcInput};
//!
//! let det = DetectorConfig {
//!     shape: [60, 80],
//!     px_size: 59.2,
//!     binning: 8,
//!     pc: PcInput::Single([0.4, 0.2, 0.6]),
//!     ..DetectorConfig::default()
//! }
//! .build()?;
//!
//! let emsoft = det.pc_emsoft(5);
//! println!("L = {} um", emsoft.entries()[0].z);
//! # Ok::<(), ebsd_detector_core::DetectorError>(())
//! ```

mod convention;
mod detector;
mod gnomonic;
mod io;
mod pc;

pub use convention::{Convention, ConventionError, CONVENTION_ALIASES, EMSOFT_DEFAULT_VERSION};
pub use detector::{
    CropError, CropExtent, DetectorConfig, DetectorError, DetectorShape, EbsdDetector,
};
pub use gnomonic::GnomonicBounds;
pub use io::{DetectorIoError, GeometryReport};
pub use pc::{NavShape, PcArray, PcArrayError, PcInput};
