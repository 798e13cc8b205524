//! Gnomonic projection window of a detector screen.
//!
//! For a PC triple `(pcx, pcy, pcz)` in the Bruker convention and a
//! detector with aspect ratio `r = ncols / nrows`, the detector screen
//! seen from the PC covers the gnomonic window
//!
//! ```text
//! x_min = -r * pcx / pcz          x_max = r * (1 - pcx) / pcz
//! y_min = -(1 - pcy) / pcz        y_max = pcy / pcz
//! ```
//!
//! following Winkelmann's band projection geometry.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Gnomonic window `[x_min, x_max] x [y_min, y_max]` of one PC entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GnomonicBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl GnomonicBounds {
    /// Window of the detector screen seen from `pc` (Bruker convention).
    pub fn from_pc(pc: Vector3<f64>, aspect_ratio: f64) -> Self {
        Self {
            x_min: -aspect_ratio * pc.x / pc.z,
            x_max: aspect_ratio * (1.0 - pc.x) / pc.z,
            y_min: -(1.0 - pc.y) / pc.z,
            y_max: pc.y / pc.z,
        }
    }

    /// Window extent along x.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Window extent along y.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Bounds as `[x_min, x_max, y_min, y_max]`.
    #[inline]
    pub fn as_array(&self) -> [f64; 4] {
        [self.x_min, self.x_max, self.y_min, self.y_max]
    }

    /// Width of one detector pixel in gnomonic units.
    ///
    /// For a single-column detector the full window width is returned.
    pub fn x_scale(&self, ncols: usize) -> f64 {
        if ncols <= 1 {
            self.width()
        } else {
            self.width() / (ncols - 1) as f64
        }
    }

    /// Height of one detector pixel in gnomonic units.
    pub fn y_scale(&self, nrows: usize) -> f64 {
        if nrows <= 1 {
            self.height()
        } else {
            self.height() / (nrows - 1) as f64
        }
    }

    /// Largest distance from the PC (the gnomonic origin) to any of the
    /// four window corners. Sets the extent of gnomonic-circle overlays.
    pub fn r_max(&self) -> f64 {
        let corners = [
            self.x_min * self.x_min + self.y_min * self.y_min,
            self.x_max * self.x_max + self.y_min * self.y_min,
            self.x_max * self.x_max + self.y_max * self.y_max,
            self.x_min * self.x_min + self.y_max * self.y_max,
        ];
        corners.into_iter().fold(f64::MIN, f64::max).sqrt()
    }

    /// Component-wise NaN-ignoring mean of several windows.
    pub fn mean(bounds: &[Self]) -> Self {
        let mut sums = [0.0_f64; 4];
        let mut counts = [0_usize; 4];
        for b in bounds {
            for (i, v) in b.as_array().into_iter().enumerate() {
                if !v.is_nan() {
                    sums[i] += v;
                    counts[i] += 1;
                }
            }
        }
        let avg = |i: usize| {
            if counts[i] == 0 {
                f64::NAN
            } else {
                sums[i] / counts[i] as f64
            }
        };
        Self {
            x_min: avg(0),
            x_max: avg(1),
            y_min: avg(2),
            y_max: avg(3),
        }
    }
}
