//! # Parameter Interpolation
//!
//! Chooses each hinge parameter between its two reference values based on
//! the slenderness classification.
//!
//! - **Beams**: compact (flange AND web) takes the ductile value, slender
//!   (flange OR web) takes the non-ductile value. In the transition zone each
//!   ratio is blended linearly between its own pair of limits and the
//!   smaller of the two blends governs.
//! - **Braces/columns**: a single KL/r ratio, a single linear blend between
//!   the lower and upper limits.

use super::classification::{AxialClassification, BeamClassification};
use super::parameters::{HingeParameters, ParameterPair, SlendernessPair, BEAM_TABLE, COMPRESSION_TABLE};

/// Straight line through (x0, y0) and (x1, y1), evaluated at `x`
pub fn lerp(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    y0 + (y1 - y0) / (x1 - x0) * (x - x0)
}

/// Select one beam parameter
pub fn beam_parameter(class: &BeamClassification, pair: ParameterPair) -> f64 {
    if class.is_compact() {
        return pair.ductile;
    }
    if class.is_slender() {
        return pair.non_ductile;
    }

    let limits = &class.limits;
    let by_flange = lerp(
        class.flange_slenderness,
        limits.flange_compact,
        limits.flange_slender,
        pair.ductile,
        pair.non_ductile,
    );
    let by_web = lerp(
        class.web_slenderness,
        limits.web_compact,
        limits.web_slender,
        pair.ductile,
        pair.non_ductile,
    );
    by_flange.min(by_web)
}

/// Select one brace/column compression parameter
pub fn axial_parameter(class: &AxialClassification, pair: SlendernessPair) -> f64 {
    if class.at_or_above_upper {
        return pair.stocky;
    }
    if class.at_or_below_lower {
        return pair.slender;
    }
    lerp(
        class.slenderness,
        class.limits.lower,
        class.limits.upper,
        pair.slender,
        pair.stocky,
    )
}

/// Beam profile (a, b, c, IO, LS, CP) before control adjustment
pub fn beam_profile(class: &BeamClassification) -> HingeParameters {
    BEAM_TABLE.map(|pair| beam_parameter(class, pair))
}

/// Compression profile for a brace or column
pub fn compression_profile(class: &AxialClassification) -> HingeParameters {
    COMPRESSION_TABLE.map(|pair| axial_parameter(class, pair))
}
