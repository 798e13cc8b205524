//! Projection center coordinate conventions.
//!
//! Every EBSD vendor reports the projection center (PC) in its own
//! normalized coordinate frame. The detector stores PCs internally in the
//! Bruker convention; this module provides the named conventions and the
//! alias parser. The conversion formulas themselves live on
//! [`EbsdDetector`](crate::EbsdDetector) because they need the detector
//! shape, binning and pixel size.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// EMsoft flipped the sign of the x PC coordinate in version 5.
pub const EMSOFT_DEFAULT_VERSION: u8 = 5;

/// Every alias accepted by the convention parser, lowercase.
pub const CONVENTION_ALIASES: [&str; 9] = [
    "bruker", "tsl", "edax", "amatek", "oxford", "aztec", "emsoft", "emsoft4", "emsoft5",
];

/// A named projection center coordinate convention.
///
/// - `Bruker`: fractions of detector width (x) and height (y, z), origin in
///   the upper left corner. Used internally.
/// - `Tsl` (EDAX TSL) and `Oxford` (Aztec): fractions of detector width,
///   origin in the lower left corner. The two are numerically identical.
/// - `Emsoft`: x and y in pixels relative to the detector center, z the
///   detector distance in microns. Prior to version 5 the x axis pointed
///   left instead of right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Convention {
    Bruker,
    Tsl,
    Oxford,
    Emsoft { version: u8 },
}

impl Convention {
    /// The EMsoft convention in its current (v5) form.
    pub const EMSOFT: Self = Self::Emsoft {
        version: EMSOFT_DEFAULT_VERSION,
    };
}

impl Default for Convention {
    fn default() -> Self {
        Self::Bruker
    }
}

/// Convention parsing errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConventionError {
    #[error(
        "projection center convention '{name}' not among the recognised conventions: {}",
        CONVENTION_ALIASES.join(", ")
    )]
    Unknown { name: String },
}

impl FromStr for Convention {
    type Err = ConventionError;

    /// Parse a vendor convention from its name, case-insensitively.
    ///
    /// Accepted aliases are `bruker`; `tsl`/`edax`/`amatek`;
    /// `oxford`/`aztec`; `emsoft`/`emsoft4`/`emsoft5`. A trailing digit on
    /// `emsoft` selects the version; plain `emsoft` means version 5.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "bruker" => Ok(Self::Bruker),
            "tsl" | "edax" | "amatek" => Ok(Self::Tsl),
            "oxford" | "aztec" => Ok(Self::Oxford),
            _ => {
                let unknown = || ConventionError::Unknown { name: s.to_string() };
                let suffix = lower.strip_prefix("emsoft").ok_or_else(unknown)?;
                if suffix.is_empty() {
                    return Ok(Self::EMSOFT);
                }
                let version = suffix.parse().map_err(|_| unknown())?;
                Ok(Self::Emsoft { version })
            }
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bruker => write!(f, "bruker"),
            Self::Tsl => write!(f, "tsl"),
            Self::Oxford => write!(f, "oxford"),
            Self::Emsoft { version } if *version == EMSOFT_DEFAULT_VERSION => write!(f, "emsoft"),
            Self::Emsoft { version } => write!(f, "emsoft{version}"),
        }
    }
}

// Conventions appear in config JSON as plain strings ("edax", "emsoft4"),
// so serde goes through the alias parser rather than a derived tag.
impl Serialize for Convention {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Convention {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
