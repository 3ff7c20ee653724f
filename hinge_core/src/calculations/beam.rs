//! # Beam Flexural Hinge
//!
//! Derives the moment-rotation (M3) hinge parameters for a steel beam framing
//! into a column.
//!
//! ## Procedure
//!
//! 1. Fetch beam geometry by name and shape, and the connected column by
//!    probing shapes (see [`crate::sections::fetch_any`])
//! 2. Classify flange and web slenderness against the compact/slender limits
//! 3. Select the profile parameters (a, b, c, IO, LS, CP)
//! 4. Evaluate the four control factors and scale the profile by their product
//!
//! ## Example
//!
//! ```rust
//! use hinge_core::calculations::beam::{BeamInput, calculate};
//! use hinge_core::sections::{SectionCatalog, ShapeKind};
//! use hinge_core::settings::HingeSettings;
//!
//! let input = BeamInput {
//!     section_name: "IPE300".to_string(),
//!     shape: ShapeKind::I,
//!     length_mm: 6000.0,
//!     fy_mpa: 355.0,
//!     column_section: "HEB300".to_string(),
//!     column_length_mm: 3500.0,
//!     column_fy_mpa: 355.0,
//!     continuity_plate_thickness_mm: 0.0,
//!     n: None,
//! };
//!
//! let catalog = SectionCatalog::builtin();
//! let result = calculate(&input, &catalog, &HingeSettings::default()).unwrap();
//!
//! assert!(result.classification.is_compact());
//! assert_eq!(result.profile.a, 9.0);
//! assert!((result.controls.adjustment - 0.64).abs() < 1e-12);
//! assert!((result.adjusted.a - 5.76).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classification::{validate_yield_strength, BeamClassification};
use super::control::{ConnectionGeometry, ControlFactors};
use super::interpolation::beam_profile;
use super::parameters::HingeParameters;
use crate::errors::{CalcError, CalcResult};
use crate::sections::{fetch, fetch_any, SectionGeometry, SectionSource, ShapeKind};
use crate::settings::HingeSettings;

/// Input parameters for a beam hinge.
///
/// ## JSON Example
///
/// ```json
/// {
///   "section_name": "IPE300",
///   "shape": "I",
///   "length_mm": 6000.0,
///   "fy_mpa": 355.0,
///   "column_section": "HEB300",
///   "column_length_mm": 3500.0,
///   "column_fy_mpa": 355.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamInput {
    /// Beam section name as known to the section source
    pub section_name: String,

    /// Beam section shape
    pub shape: ShapeKind,

    /// Beam length L (mm)
    pub length_mm: f64,

    /// Beam yield strength Fy (MPa)
    pub fy_mpa: f64,

    /// Connected column section name
    pub column_section: String,

    /// Column length Lc (mm)
    pub column_length_mm: f64,

    /// Column yield strength (MPa)
    pub column_fy_mpa: f64,

    /// Continuity plate thickness (mm), zero without plates
    #[serde(default)]
    pub continuity_plate_thickness_mm: f64,

    /// Connection flag; falls back to the session default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<bool>,
}

impl BeamInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.section_name.trim().is_empty() {
            return Err(CalcError::missing_field("section_name"));
        }
        if !(self.length_mm > 0.0) {
            return Err(CalcError::invalid_input(
                "length_mm",
                self.length_mm.to_string(),
                "Length must be positive",
            ));
        }
        validate_yield_strength("fy_mpa", self.fy_mpa)?;
        if self.column_section.trim().is_empty() {
            return Err(CalcError::missing_field("column_section"));
        }
        if !(self.column_length_mm > 0.0) {
            return Err(CalcError::invalid_input(
                "column_length_mm",
                self.column_length_mm.to_string(),
                "Column length must be positive",
            ));
        }
        validate_yield_strength("column_fy_mpa", self.column_fy_mpa)?;
        if self.continuity_plate_thickness_mm < 0.0 {
            return Err(CalcError::invalid_input(
                "continuity_plate_thickness_mm",
                self.continuity_plate_thickness_mm.to_string(),
                "Plate thickness cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Results from a beam hinge calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamResult {
    /// Beam geometry as fetched
    pub geometry: SectionGeometry,

    /// Connected column geometry as fetched
    pub column_geometry: SectionGeometry,

    /// Flange/web slenderness and their flags
    pub classification: BeamClassification,

    /// Yield moment My = Z33·Fy (kN·m)
    pub yield_moment_knm: f64,

    /// Yield rotation θy = Z33·Fy·L/(6·E·I33) (rad)
    pub yield_rotation_rad: f64,

    /// Connection flag the controls were evaluated with
    pub single_sided: bool,

    /// Profile parameters before control adjustment
    pub profile: HingeParameters,

    /// Control factors and their product
    pub controls: ControlFactors,

    /// Profile scaled by the adjustment factor (the "prime" values)
    pub adjusted: HingeParameters,
}

/// Fetch beam and column geometry, then evaluate.
pub fn calculate<S: SectionSource + ?Sized>(
    input: &BeamInput,
    source: &S,
    settings: &HingeSettings,
) -> CalcResult<BeamResult> {
    input.validate()?;
    let geometry = fetch(source, &input.section_name, input.shape);
    let column_geometry = fetch_any(source, &input.column_section);
    evaluate(input, geometry, column_geometry, settings)
}

/// Evaluate a beam hinge from already-fetched geometry.
pub fn evaluate(
    input: &BeamInput,
    geometry: SectionGeometry,
    column_geometry: SectionGeometry,
    settings: &HingeSettings,
) -> CalcResult<BeamResult> {
    input.validate()?;
    settings.validate()?;

    if input.length_mm <= column_geometry.depth_mm {
        return Err(CalcError::invalid_input(
            "length_mm",
            input.length_mm.to_string(),
            format!("Beam length must exceed the column depth ({} mm)", column_geometry.depth_mm),
        ));
    }

    let flange = geometry.flange_slenderness();
    let web = geometry.web_slenderness();
    if !flange.is_finite() || !web.is_finite() {
        return Err(CalcError::invalid_input(
            "section_name",
            input.section_name.clone(),
            "Section geometry is unresolved; slenderness ratios are undefined",
        ));
    }

    let classification = BeamClassification::evaluate(flange, web, input.fy_mpa)?;
    let profile = beam_profile(&classification);

    let yield_moment_knm = geometry.z33_mm3 * input.fy_mpa / 1e6;
    let yield_rotation_rad = if geometry.i33_mm4 > 0.0 {
        geometry.z33_mm3 * input.fy_mpa * input.length_mm / (6.0 * settings.elastic_modulus_mpa * geometry.i33_mm4)
    } else {
        0.0
    };

    let single_sided = input.n.unwrap_or(settings.beam_n);
    let connection = ConnectionGeometry {
        beam_length_mm: input.length_mm,
        beam_depth_mm: geometry.depth_mm,
        beam_flange_width_mm: geometry.flange_width_mm,
        beam_flange_thickness_mm: geometry.flange_thickness_mm,
        column_depth_mm: column_geometry.depth_mm,
        column_flange_thickness_mm: column_geometry.flange_thickness_mm,
        column_web_thickness_mm: column_geometry.web_thickness_mm,
        column_length_mm: input.column_length_mm,
        column_fy_mpa: input.column_fy_mpa,
        continuity_plate_thickness_mm: input.continuity_plate_thickness_mm,
        yield_moment_knm,
        single_sided,
    };
    let controls = ControlFactors::evaluate(&connection, &classification);
    let adjusted = profile.scaled(controls.adjustment);

    debug!(
        section = %input.section_name,
        connection = controls.connection,
        panel_zone = controls.panel_zone,
        clear_span = controls.clear_span,
        slenderness = controls.slenderness,
        adjustment = controls.adjustment,
        "beam control factors"
    );

    Ok(BeamResult {
        geometry,
        column_geometry,
        classification,
        yield_moment_knm,
        yield_rotation_rad,
        single_sided,
        profile,
        controls,
        adjusted,
    })
}
