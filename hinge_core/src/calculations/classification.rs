//! # Slenderness Classification
//!
//! Evaluates section and member slenderness against the code limits that
//! separate ductile from non-ductile hinge behavior.
//!
//! ## Beams
//!
//! Flange slenderness `bf/tf = (t2/2)/tf` and web slenderness
//! `h/tw = (t3 - 2tf - 2r)/tw` are compared with four limits of the form
//! `k / √(Fy/6.895)` (Fy in MPa, 6.895 MPa per ksi):
//!
//! | limit | k | check |
//! |-------|-----|-------|
//! | flange compact | 52 | bf/tf ≤ limit |
//! | web compact | 418 | h/tw ≤ limit |
//! | flange slender | 65 | bf/tf ≥ limit |
//! | web slender | 640 | h/tw ≥ limit |
//!
//! ## Braces and columns
//!
//! Effective slenderness `KL/r = max(L3/r33, L2/r22)` against
//! `4.2·√(E/Fy)` (upper) and `2.1·√(E/Fy)` (lower).
//!
//! All evaluations are pure. A non-positive yield strength makes the limits
//! undefined and is rejected as invalid input.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Elastic modulus of structural steel (MPa)
pub const STEEL_ELASTIC_MODULUS_MPA: f64 = 200_000.0;

/// Stress conversion used by the beam limits (MPa per ksi)
pub const MPA_PER_KSI: f64 = 6.895;

const FLANGE_COMPACT_K: f64 = 52.0;
const WEB_COMPACT_K: f64 = 418.0;
const FLANGE_SLENDER_K: f64 = 65.0;
const WEB_SLENDER_K: f64 = 640.0;

const UPPER_SLENDERNESS_K: f64 = 4.2;
const LOWER_SLENDERNESS_K: f64 = 2.1;

/// Reject yield strengths for which the limits are undefined
pub fn validate_yield_strength(field: &str, fy_mpa: f64) -> CalcResult<()> {
    if !(fy_mpa > 0.0) || !fy_mpa.is_finite() {
        return Err(CalcError::invalid_input(
            field,
            fy_mpa.to_string(),
            "Yield strength must be a positive number",
        ));
    }
    Ok(())
}

/// Beam slenderness limits for one yield strength
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamLimits {
    pub flange_compact: f64,
    pub web_compact: f64,
    pub flange_slender: f64,
    pub web_slender: f64,
}

impl BeamLimits {
    pub fn for_yield_strength(fy_mpa: f64) -> CalcResult<Self> {
        validate_yield_strength("fy_mpa", fy_mpa)?;
        let root = (fy_mpa / MPA_PER_KSI).sqrt();
        Ok(BeamLimits {
            flange_compact: FLANGE_COMPACT_K / root,
            web_compact: WEB_COMPACT_K / root,
            flange_slender: FLANGE_SLENDER_K / root,
            web_slender: WEB_SLENDER_K / root,
        })
    }
}

/// Beam section classification.
///
/// A section is compact only if both flange and web are compact; it is
/// slender if either one reaches its slender limit. Anything else lies in
/// the transition zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamClassification {
    pub flange_slenderness: f64,
    pub web_slenderness: f64,
    pub limits: BeamLimits,
    pub flange_compact: bool,
    pub web_compact: bool,
    pub flange_slender: bool,
    pub web_slender: bool,
}

impl BeamClassification {
    pub fn evaluate(flange_slenderness: f64, web_slenderness: f64, fy_mpa: f64) -> CalcResult<Self> {
        let limits = BeamLimits::for_yield_strength(fy_mpa)?;
        Ok(BeamClassification {
            flange_slenderness,
            web_slenderness,
            limits,
            flange_compact: flange_slenderness <= limits.flange_compact,
            web_compact: web_slenderness <= limits.web_compact,
            flange_slender: flange_slenderness >= limits.flange_slender,
            web_slender: web_slenderness >= limits.web_slender,
        })
    }

    /// Both flange and web within compact limits
    pub fn is_compact(&self) -> bool {
        self.flange_compact && self.web_compact
    }

    /// Flange or web at or beyond its slender limit
    pub fn is_slender(&self) -> bool {
        self.flange_slender || self.web_slender
    }
}

/// Brace/column slenderness limits for one yield strength
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlendernessLimits {
    /// 4.2·√(E/Fy)
    pub upper: f64,
    /// 2.1·√(E/Fy)
    pub lower: f64,
}

impl SlendernessLimits {
    pub fn for_yield_strength(fy_mpa: f64, elastic_modulus_mpa: f64) -> CalcResult<Self> {
        validate_yield_strength("fy_mpa", fy_mpa)?;
        let root = (elastic_modulus_mpa / fy_mpa).sqrt();
        Ok(SlendernessLimits {
            upper: UPPER_SLENDERNESS_K * root,
            lower: LOWER_SLENDERNESS_K * root,
        })
    }
}

/// Effective slenderness KL/r = max(L3/r33, L2/r22)
pub fn effective_slenderness(l2_mm: f64, l3_mm: f64, r22_mm: f64, r33_mm: f64) -> f64 {
    (l3_mm / r33_mm).max(l2_mm / r22_mm)
}

/// Brace/column member classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxialClassification {
    pub slenderness: f64,
    pub limits: SlendernessLimits,
    /// KL/r ≥ upper limit
    pub at_or_above_upper: bool,
    /// KL/r ≤ lower limit
    pub at_or_below_lower: bool,
}

impl AxialClassification {
    pub fn evaluate(slenderness: f64, fy_mpa: f64, elastic_modulus_mpa: f64) -> CalcResult<Self> {
        let limits = SlendernessLimits::for_yield_strength(fy_mpa, elastic_modulus_mpa)?;
        Ok(AxialClassification {
            slenderness,
            limits,
            at_or_above_upper: slenderness >= limits.upper,
            at_or_below_lower: slenderness <= limits.lower,
        })
    }
}
