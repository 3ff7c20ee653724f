//! # Brace Axial Hinge
//!
//! Derives force-displacement (axial P) hinge parameters for a steel brace.
//!
//! ## Capacity
//!
//! Euler stress `Fe = π²E/(KL/r)²`, and the critical stress
//!
//! - `Fcr = 0.658^(Fy/Fe)·Fy` when `KL/r ≤ 4.71·√(E/Fy)` (inelastic buckling)
//! - `Fcr = 0.877·Fe` otherwise (elastic buckling)
//!
//! Compression yield force `Py = Fcr·A`, tension yield force `Ty = Fy·A`, each
//! with the matching elastic displacement `P·L/(A·E)`.
//!
//! ## Parameters
//!
//! Compression parameters are interpolated on KL/r; tension parameters are
//! the session's configured constants.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::classification::{effective_slenderness, validate_yield_strength, AxialClassification};
use super::interpolation::compression_profile;
use super::parameters::HingeParameters;
use crate::errors::{CalcError, CalcResult};
use crate::sections::{fetch, SectionGeometry, SectionSource, ShapeKind};
use crate::settings::HingeSettings;

const INELASTIC_LIMIT_K: f64 = 4.71;

/// Input parameters for a brace hinge.
///
/// ## JSON Example
///
/// ```json
/// {
///   "section_name": "L100X10",
///   "shape": "Angle",
///   "length_mm": 4200.0,
///   "unbraced_length_minor_mm": 2100.0,
///   "unbraced_length_major_mm": 4200.0,
///   "fy_mpa": 355.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BraceInput {
    pub section_name: String,
    pub shape: ShapeKind,

    /// Brace length L (mm)
    pub length_mm: f64,

    /// Unbraced length about the minor axis L2 (mm)
    pub unbraced_length_minor_mm: f64,

    /// Unbraced length about the major axis L3 (mm)
    pub unbraced_length_major_mm: f64,

    /// Yield strength Fy (MPa)
    pub fy_mpa: f64,
}

impl BraceInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.section_name.trim().is_empty() {
            return Err(CalcError::missing_field("section_name"));
        }
        validate_positive("length_mm", self.length_mm)?;
        validate_positive("unbraced_length_minor_mm", self.unbraced_length_minor_mm)?;
        validate_positive("unbraced_length_major_mm", self.unbraced_length_major_mm)?;
        validate_yield_strength("fy_mpa", self.fy_mpa)
    }
}

pub(crate) fn validate_positive(field: &str, value: f64) -> CalcResult<()> {
    if !(value > 0.0) {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be positive"));
    }
    Ok(())
}

/// Yield forces and the elastic displacements that go with them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxialCapacity {
    /// Euler buckling stress Fe (MPa)
    pub euler_stress_mpa: f64,

    /// Critical buckling stress Fcr (MPa)
    pub critical_stress_mpa: f64,

    /// Compression yield force Py (kN)
    pub compression_force_kn: f64,

    /// Axial shortening at Py (mm)
    pub compression_displacement_mm: f64,

    /// Tension yield force Ty (kN)
    pub tension_force_kn: f64,

    /// Elongation at Ty (mm)
    pub tension_displacement_mm: f64,
}

impl AxialCapacity {
    /// Capacity for a member of `area_mm2` and `length_mm`.
    ///
    /// Displacements are reported as zero when the area is zero.
    pub fn derive(slenderness: f64, fy_mpa: f64, area_mm2: f64, length_mm: f64, elastic_modulus_mpa: f64) -> Self {
        let e = elastic_modulus_mpa;
        let euler_stress_mpa = PI * PI * e / (slenderness * slenderness);

        let critical_stress_mpa = if slenderness <= INELASTIC_LIMIT_K * (e / fy_mpa).sqrt() {
            0.658_f64.powf(fy_mpa / euler_stress_mpa) * fy_mpa
        } else {
            0.877 * euler_stress_mpa
        };

        let compression_force_kn = critical_stress_mpa * area_mm2 / 1000.0;
        let tension_force_kn = fy_mpa * area_mm2 / 1000.0;

        let displacement = |force_kn: f64| {
            if area_mm2 > 0.0 {
                force_kn * 1000.0 * length_mm / (area_mm2 * e)
            } else {
                0.0
            }
        };

        AxialCapacity {
            euler_stress_mpa,
            critical_stress_mpa,
            compression_force_kn,
            compression_displacement_mm: displacement(compression_force_kn),
            tension_force_kn,
            tension_displacement_mm: displacement(tension_force_kn),
        }
    }
}

/// Axial hinge values shared by braces and columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxialHinge {
    pub classification: AxialClassification,
    pub capacity: AxialCapacity,
    pub compression: HingeParameters,
    pub tension: HingeParameters,
}

impl AxialHinge {
    /// Evaluate an axial member with unbraced lengths `l2`/`l3` and full length `length_mm`
    pub fn evaluate(
        geometry: &SectionGeometry,
        l2_mm: f64,
        l3_mm: f64,
        length_mm: f64,
        fy_mpa: f64,
        area_mm2: f64,
        settings: &HingeSettings,
    ) -> CalcResult<Self> {
        settings.validate()?;
        let e = settings.elastic_modulus_mpa;

        let slenderness = effective_slenderness(l2_mm, l3_mm, geometry.r22_mm, geometry.r33_mm);
        if !slenderness.is_finite() {
            return Err(CalcError::invalid_input(
                "r22_mm/r33_mm",
                format!("{}/{}", geometry.r22_mm, geometry.r33_mm),
                "Radii of gyration are unresolved; KL/r is undefined",
            ));
        }
        let classification = AxialClassification::evaluate(slenderness, fy_mpa, e)?;
        let capacity = AxialCapacity::derive(slenderness, fy_mpa, area_mm2, length_mm, e);

        debug!(
            kl_r = slenderness,
            upper = classification.limits.upper,
            lower = classification.limits.lower,
            py_kn = capacity.compression_force_kn,
            ty_kn = capacity.tension_force_kn,
            "axial hinge evaluated"
        );

        Ok(AxialHinge {
            classification,
            capacity,
            compression: compression_profile(&classification),
            tension: settings.tension,
        })
    }
}

/// Results from a brace hinge calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BraceResult {
    /// Brace geometry as fetched
    pub geometry: SectionGeometry,

    /// Area used for the capacities (mm²)
    pub area_mm2: f64,

    #[serde(flatten)]
    pub hinge: AxialHinge,
}

/// Fetch brace geometry, then evaluate.
pub fn calculate<S: SectionSource + ?Sized>(
    input: &BraceInput,
    source: &S,
    settings: &HingeSettings,
) -> CalcResult<BraceResult> {
    input.validate()?;
    let geometry = fetch(source, &input.section_name, input.shape);
    evaluate(input, geometry, settings)
}

/// Evaluate a brace hinge from already-fetched geometry.
pub fn evaluate(input: &BraceInput, geometry: SectionGeometry, settings: &HingeSettings) -> CalcResult<BraceResult> {
    input.validate()?;

    let area_mm2 = geometry.effective_area_mm2();
    if area_mm2 <= 0.0 {
        warn!(section = %input.section_name, "brace has no usable area, capacities will be zero");
    }

    let hinge = AxialHinge::evaluate(
        &geometry,
        input.unbraced_length_minor_mm,
        input.unbraced_length_major_mm,
        input.length_mm,
        input.fy_mpa,
        area_mm2,
        settings,
    )?;

    Ok(BraceResult {
        geometry,
        area_mm2,
        hinge,
    })
}
