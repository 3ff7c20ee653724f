//! # Section Properties
//!
//! Geometric and material properties for one steel cross-section, as reported
//! by the structural-analysis model (or a catalog standing in for it).
//!
//! All values are in SI-millimetre units: lengths in mm, stresses in MPa,
//! areas in mm², inertia in mm⁴ and section moduli in mm³.
//!
//! Section properties are fetched, never owned: the engine asks a
//! [`SectionSource`] for a section by name and shape. A failed lookup is not
//! fatal. [`fetch`] logs a warning and substitutes a zero-valued geometry so a
//! batch keeps moving.
//!
//! ## Example
//!
//! ```rust
//! use hinge_core::sections::{fetch, ShapeKind, SectionCatalog};
//!
//! let catalog = SectionCatalog::builtin();
//! let ipe300 = fetch(&catalog, "IPE300", ShapeKind::I);
//! assert_eq!(ipe300.depth_mm, 300.0);
//!
//! // Unknown sections degrade to zeros rather than failing
//! let missing = fetch(&catalog, "NOPE", ShapeKind::I);
//! assert!(!missing.is_resolved());
//! ```

pub mod catalog;

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{CalcError, CalcResult};

pub use catalog::SectionCatalog;

/// Cross-section shape family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Doubly-symmetric I / wide flange
    I,
    /// Channel
    Channel,
    /// Rectangular box
    Box,
    /// Single angle
    Angle,
    /// Circular tube / pipe
    Tube,
    /// Arbitrary section with no parametric geometry
    #[default]
    UserDefined,
}

impl ShapeKind {
    /// All shape kinds, in the order the category list presents them
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::I,
        ShapeKind::Channel,
        ShapeKind::Box,
        ShapeKind::Angle,
        ShapeKind::Tube,
        ShapeKind::UserDefined,
    ];

    /// Token used inside category tags (`Beam-I-Section`)
    pub fn tag(&self) -> &'static str {
        match self {
            ShapeKind::I => "I",
            ShapeKind::Channel => "Channel",
            ShapeKind::Box => "Box",
            ShapeKind::Angle => "Angle",
            ShapeKind::Tube => "Tube",
            ShapeKind::UserDefined => "UserDefined",
        }
    }

    /// Whether the shape carries a fillet radius between web and flange
    pub fn has_fillet(&self) -> bool {
        matches!(self, ShapeKind::I)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ShapeKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let token = trimmed
            .strip_suffix("-Section")
            .or_else(|| trimmed.strip_suffix("-section"))
            .unwrap_or(trimmed);
        match token.to_ascii_uppercase().as_str() {
            "I" => Ok(ShapeKind::I),
            "CHANNEL" => Ok(ShapeKind::Channel),
            "BOX" => Ok(ShapeKind::Box),
            "ANGLE" => Ok(ShapeKind::Angle),
            "TUBE" | "PIPE" => Ok(ShapeKind::Tube),
            "USERDEFINED" => Ok(ShapeKind::UserDefined),
            _ => Err(CalcError::invalid_input("shape", s, "Unknown section shape")),
        }
    }
}

/// Normalized section properties.
///
/// Fields the source could not resolve stay at zero. Which fields are
/// meaningful depends on [`SectionGeometry::shape`]; the fillet radius, for
/// instance, is always zero for anything but I-sections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionGeometry {
    /// Shape family the properties were read as
    pub shape: ShapeKind,

    /// Material label from the source, if any
    #[serde(default)]
    pub material: Option<String>,

    /// Total depth t3 (mm)
    pub depth_mm: f64,

    /// Flange width t2 (mm)
    pub flange_width_mm: f64,

    /// Flange thickness tf (mm)
    pub flange_thickness_mm: f64,

    /// Web thickness tw (mm)
    pub web_thickness_mm: f64,

    /// Bottom flange width t2b (mm)
    pub bottom_flange_width_mm: f64,

    /// Bottom flange thickness tfb (mm)
    pub bottom_flange_thickness_mm: f64,

    /// Web-to-flange fillet radius (mm)
    pub fillet_radius_mm: f64,

    /// Major-axis moment of inertia I33 (mm⁴)
    pub i33_mm4: f64,

    /// Major-axis plastic section modulus Z33 (mm³)
    pub z33_mm3: f64,

    /// Cross-sectional area (mm²)
    pub area_mm2: f64,

    /// Minor-axis radius of gyration r22 (mm)
    pub r22_mm: f64,

    /// Major-axis radius of gyration r33 (mm)
    pub r33_mm: f64,

    /// Material yield strength reported by the source (MPa)
    pub fy_mpa: f64,
}

impl SectionGeometry {
    /// An all-zero geometry tagged with `shape`
    pub fn zeroed(shape: ShapeKind) -> Self {
        SectionGeometry {
            shape,
            ..Default::default()
        }
    }

    /// True if any dimensional property was resolved
    pub fn is_resolved(&self) -> bool {
        [
            self.depth_mm,
            self.flange_width_mm,
            self.flange_thickness_mm,
            self.web_thickness_mm,
            self.area_mm2,
            self.i33_mm4,
        ]
        .iter()
        .any(|v| *v != 0.0)
    }

    /// Half-flange slenderness (t2/2)/tf
    pub fn flange_slenderness(&self) -> f64 {
        (self.flange_width_mm / 2.0) / self.flange_thickness_mm
    }

    /// Clear web height h = t3 - 2tf - 2r (mm)
    pub fn clear_web_height_mm(&self) -> f64 {
        self.depth_mm - 2.0 * self.flange_thickness_mm - 2.0 * self.fillet_radius_mm
    }

    /// Web slenderness h/tw
    pub fn web_slenderness(&self) -> f64 {
        self.clear_web_height_mm() / self.web_thickness_mm
    }

    /// Area from plate dimensions, for sources that report geometry but no area.
    ///
    /// Returns 0.0 for user-defined shapes.
    pub fn approximate_area_mm2(&self) -> f64 {
        let (d, b, tf, tw) = (
            self.depth_mm,
            self.flange_width_mm,
            self.flange_thickness_mm,
            self.web_thickness_mm,
        );
        match self.shape {
            ShapeKind::I => 2.0 * tf * b + (d - 2.0 * tf) * tw,
            ShapeKind::Channel => tf * b + (d - tf) * tw,
            ShapeKind::Box => 2.0 * tf * (b - 2.0 * tw) + 2.0 * tw * d,
            ShapeKind::Angle => tf * b + tw * d - tf * tw,
            ShapeKind::Tube => {
                let inner = d - 2.0 * tw;
                PI * (d * d - inner * inner) / 4.0
            }
            ShapeKind::UserDefined => 0.0,
        }
    }

    /// Reported area, or the plate approximation when the source gave none
    pub fn effective_area_mm2(&self) -> f64 {
        if self.area_mm2 > 0.0 {
            self.area_mm2
        } else {
            self.approximate_area_mm2()
        }
    }
}

/// Capability to look up section properties by name and shape.
///
/// Implementations stand in for the structural-analysis model's section
/// tables. A shape mismatch should be reported as
/// [`CalcError::LookupFailed`] so that callers probing several shapes can
/// move on to the next one.
pub trait SectionSource {
    /// Look up `name`, reading it as a `shape` section
    fn section_properties(&self, name: &str, shape: ShapeKind) -> CalcResult<SectionGeometry>;
}

impl<T: SectionSource + ?Sized> SectionSource for &T {
    fn section_properties(&self, name: &str, shape: ShapeKind) -> CalcResult<SectionGeometry> {
        (**self).section_properties(name, shape)
    }
}

/// Fetch a section, degrading to a zero-valued geometry on failure.
///
/// User-defined shapes never consult the source.
pub fn fetch<S: SectionSource + ?Sized>(source: &S, name: &str, shape: ShapeKind) -> SectionGeometry {
    if shape == ShapeKind::UserDefined {
        debug!(section = name, "user-defined section, using default geometry");
        return SectionGeometry::zeroed(shape);
    }

    match source.section_properties(name, shape) {
        Ok(geometry) => {
            debug!(section = name, %shape, "fetched section properties");
            geometry
        }
        Err(err) => {
            warn!(section = name, %shape, error = %err, "could not fetch section data, using zero defaults");
            SectionGeometry::zeroed(shape)
        }
    }
}

/// Shapes probed, in order, when the shape of a section is not known
pub const PROBE_ORDER: [ShapeKind; 4] = [ShapeKind::I, ShapeKind::Channel, ShapeKind::Box, ShapeKind::Angle];

/// Fetch a section whose shape is unknown by probing [`PROBE_ORDER`].
///
/// The first shape the source accepts wins; if none does, the geometry is
/// all zeros.
pub fn fetch_any<S: SectionSource + ?Sized>(source: &S, name: &str) -> SectionGeometry {
    if name.trim().is_empty() {
        warn!("no section name given, using zero defaults");
        return SectionGeometry::default();
    }

    for shape in PROBE_ORDER {
        if let Ok(geometry) = source.section_properties(name, shape) {
            debug!(section = name, %shape, "resolved section by probing");
            return geometry;
        }
    }

    warn!(section = name, "could not resolve section as any known shape, using zero defaults");
    SectionGeometry::default()
}
