//! # Column Axial Hinge
//!
//! Columns get the same axial hinge as braces, with the unbraced lengths
//! defaulting to the full length, plus a squash-load estimate `A·Fy`.
//!
//! When the section reports no area, it is approximated from plate
//! dimensions; failing that, the session's default column area is used.
//!
//! User-defined sections carry no radii of gyration, so KL/r is undefined.
//! Such columns still get the squash load from the default area, but no
//! axial hinge (`hinge` is `None`) and nothing is written to the model file.
//!
//! ## Example
//!
//! ```rust
//! use hinge_core::calculations::column::{ColumnInput, calculate};
//! use hinge_core::sections::{SectionCatalog, ShapeKind};
//! use hinge_core::settings::HingeSettings;
//!
//! let input = ColumnInput {
//!     section_name: "HEB300".to_string(),
//!     shape: ShapeKind::I,
//!     length_mm: 3500.0,
//!     fy_mpa: 355.0,
//!     unbraced_length_minor_mm: None,
//!     unbraced_length_major_mm: None,
//! };
//!
//! let result = calculate(&input, &SectionCatalog::builtin(), &HingeSettings::default()).unwrap();
//! assert!((result.axial_capacity_kn - 14910.0 * 355.0 / 1000.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::brace::{validate_positive, AxialHinge};
use super::classification::{effective_slenderness, validate_yield_strength};
use crate::errors::{CalcError, CalcResult};
use crate::sections::{fetch, SectionGeometry, SectionSource, ShapeKind};
use crate::settings::HingeSettings;

/// Input parameters for a column hinge.
///
/// ## JSON Example
///
/// ```json
/// {
///   "section_name": "HEB300",
///   "shape": "I",
///   "length_mm": 3500.0,
///   "fy_mpa": 355.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInput {
    pub section_name: String,
    pub shape: ShapeKind,

    /// Column length L (mm)
    pub length_mm: f64,

    /// Yield strength Fy (MPa)
    pub fy_mpa: f64,

    /// Minor-axis unbraced length L2 (mm), defaults to L
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unbraced_length_minor_mm: Option<f64>,

    /// Major-axis unbraced length L3 (mm), defaults to L
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unbraced_length_major_mm: Option<f64>,
}

impl ColumnInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.section_name.trim().is_empty() {
            return Err(CalcError::missing_field("section_name"));
        }
        validate_positive("length_mm", self.length_mm)?;
        if let Some(l2) = self.unbraced_length_minor_mm {
            validate_positive("unbraced_length_minor_mm", l2)?;
        }
        if let Some(l3) = self.unbraced_length_major_mm {
            validate_positive("unbraced_length_major_mm", l3)?;
        }
        validate_yield_strength("fy_mpa", self.fy_mpa)
    }

    /// Minor-axis unbraced length L2 (mm)
    pub fn l2_mm(&self) -> f64 {
        self.unbraced_length_minor_mm.unwrap_or(self.length_mm)
    }

    /// Major-axis unbraced length L3 (mm)
    pub fn l3_mm(&self) -> f64 {
        self.unbraced_length_major_mm.unwrap_or(self.length_mm)
    }
}

/// Results from a column hinge calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnResult {
    /// Column geometry as fetched
    pub geometry: SectionGeometry,

    /// Area used for capacities (mm²)
    pub area_mm2: f64,

    /// True when `area_mm2` is the configured default rather than the section's
    pub area_is_default: bool,

    /// Squash load A·Fy (kN)
    pub axial_capacity_kn: f64,

    /// Axial hinge, absent when the radii of gyration are unresolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hinge: Option<AxialHinge>,
}

/// Fetch column geometry, then evaluate.
pub fn calculate<S: SectionSource + ?Sized>(
    input: &ColumnInput,
    source: &S,
    settings: &HingeSettings,
) -> CalcResult<ColumnResult> {
    input.validate()?;
    let geometry = fetch(source, &input.section_name, input.shape);
    evaluate(input, geometry, settings)
}

/// Evaluate a column hinge from already-fetched geometry.
pub fn evaluate(input: &ColumnInput, geometry: SectionGeometry, settings: &HingeSettings) -> CalcResult<ColumnResult> {
    input.validate()?;
    settings.validate()?;

    let section_area = geometry.effective_area_mm2();
    let area_is_default = !(section_area > 0.0);
    let area_mm2 = if area_is_default {
        warn!(
            section = %input.section_name,
            area_mm2 = settings.default_column_area_mm2,
            "no column area available, using default"
        );
        settings.default_column_area_mm2
    } else {
        section_area
    };

    let slenderness = effective_slenderness(input.l2_mm(), input.l3_mm(), geometry.r22_mm, geometry.r33_mm);
    let hinge = if slenderness.is_finite() {
        Some(AxialHinge::evaluate(
            &geometry,
            input.l2_mm(),
            input.l3_mm(),
            input.length_mm,
            input.fy_mpa,
            area_mm2,
            settings,
        )?)
    } else {
        warn!(section = %input.section_name, "radii of gyration unresolved, no axial hinge");
        None
    };

    Ok(ColumnResult {
        geometry,
        area_mm2,
        area_is_default,
        axial_capacity_kn: area_mm2 * input.fy_mpa / 1000.0,
        hinge,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::SectionCatalog;
    use approx::assert_relative_eq;

    fn test_input() -> ColumnInput {
        ColumnInput {
            section_name: "C1".to_string(),
            shape: ShapeKind::I,
            length_mm: 3500.0,
            fy_mpa: 355.0,
            unbraced_length_minor_mm: None,
            unbraced_length_major_mm: None,
        }
    }

    #[test]
    fn test_unbraced_lengths_default_to_length() {
        let mut input = test_input();
        assert_eq!(input.l2_mm(), 3500.0);
        assert_eq!(input.l3_mm(), 3500.0);

        input.unbraced_length_minor_mm = Some(1750.0);
        assert_eq!(input.l2_mm(), 1750.0);
        assert_eq!(input.l3_mm(), 3500.0);
    }

    #[test]
    fn test_validation() {
        let mut input = test_input();
        input.unbraced_length_major_mm = Some(-1.0);
        assert!(input.validate().is_err());

        let mut input = test_input();
        input.fy_mpa = 0.0;
        assert!(input.validate().unwrap_err().is_input_error());
    }

    #[test]
    fn test_area_from_plates_when_unreported() {
        let geometry = SectionGeometry {
            shape: ShapeKind::I,
            depth_mm: 300.0,
            flange_width_mm: 300.0,
            flange_thickness_mm: 19.0,
            web_thickness_mm: 11.0,
            r22_mm: 75.8,
            r33_mm: 129.9,
            ..Default::default()
        };
        let expected_area = 2.0 * 19.0 * 300.0 + (300.0 - 38.0) * 11.0;

        let result = evaluate(&test_input(), geometry, &HingeSettings::default()).unwrap();
        assert!(!result.area_is_default);
        assert_relative_eq!(result.area_mm2, expected_area);
        assert_relative_eq!(result.axial_capacity_kn, expected_area * 0.355, max_relative = 1e-12);
    }

    #[test]
    fn test_user_defined_column_uses_default_area() {
        let mut input = test_input();
        input.section_name = "HEB300".to_string();
        input.shape = ShapeKind::UserDefined;

        let result = calculate(&input, &SectionCatalog::builtin(), &HingeSettings::default()).unwrap();
        assert!(result.area_is_default);
        assert_eq!(result.area_mm2, 5000.0);
        assert_relative_eq!(result.axial_capacity_kn, 1775.0);
        assert!(result.hinge.is_none());
    }

    #[test]
    fn test_unknown_section_uses_default_area() {
        let mut input = test_input();
        input.section_name = "NOPE999".to_string();

        let result = calculate(&input, &SectionCatalog::builtin(), &HingeSettings::default()).unwrap();
        assert!(result.area_is_default);
        assert_relative_eq!(result.axial_capacity_kn, 1775.0);
        assert!(result.hinge.is_none());
    }

    #[test]
    fn test_catalog_column_has_hinge() {
        let mut input = test_input();
        input.section_name = "HEB300".to_string();

        let result = calculate(&input, &SectionCatalog::builtin(), &HingeSettings::default()).unwrap();
        assert!(!result.area_is_default);
        assert!(result.hinge.is_some());
    }

    #[test]
    fn test_column_hinge_matches_brace_evaluation() {
        let geometry = SectionGeometry {
            shape: ShapeKind::I,
            area_mm2: 4500.0,
            r22_mm: 40.0,
            r33_mm: 60.0,
            ..Default::default()
        };
        let mut input = test_input();
        input.length_mm = 3000.0;
        input.fy_mpa = 345.0;

        let result = evaluate(&input, geometry, &HingeSettings::default()).unwrap();
        let hinge = result.hinge.unwrap();
        assert_relative_eq!(hinge.classification.slenderness, 75.0);
        assert_relative_eq!(hinge.capacity.tension_force_kn, 1552.5);
    }
}
