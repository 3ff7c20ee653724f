//! # Beam Control Factors
//!
//! Four reduction factors applied to the beam hinge profile. Their product is
//! the adjustment factor, and every profile parameter is multiplied by it.
//!
//! | factor | checks | value |
//! |--------|--------|-------|
//! | control 1 | connection: column flange vs. beam flange, continuity plates | 1.0 or 0.8 |
//! | control 2 | panel-zone demand ratio | 1.0 inside [0.6, 0.9], else 0.8 |
//! | control 3 | clear span to depth ratio | 1.0 at ≥ 8, else 0.5^((8 - ratio)/3) |
//! | control 4 | flange/web slenderness | 1.0 compact, 0.5 slender, linear between |

use serde::{Deserialize, Serialize};

use super::classification::BeamClassification;
use super::interpolation::lerp;

const REDUCED: f64 = 0.8;
const PANEL_ZONE_MIN: f64 = 0.6;
const PANEL_ZONE_MAX: f64 = 0.9;
const CLEAR_SPAN_RATIO_LIMIT: f64 = 8.0;

/// Connection geometry the control factors depend on
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConnectionGeometry {
    /// Beam length L (mm)
    pub beam_length_mm: f64,
    /// Beam depth db (mm)
    pub beam_depth_mm: f64,
    /// Beam flange width t2 (mm)
    pub beam_flange_width_mm: f64,
    /// Beam flange thickness tf (mm)
    pub beam_flange_thickness_mm: f64,
    /// Column depth dc (mm)
    pub column_depth_mm: f64,
    /// Column flange thickness (mm)
    pub column_flange_thickness_mm: f64,
    /// Column web thickness (mm)
    pub column_web_thickness_mm: f64,
    /// Column length Lc (mm)
    pub column_length_mm: f64,
    /// Column yield strength (MPa)
    pub column_fy_mpa: f64,
    /// Continuity plate thickness (mm), zero when there are none
    pub continuity_plate_thickness_mm: f64,
    /// Beam yield moment My (kN·m)
    pub yield_moment_knm: f64,
    /// Connection flag `n`: one column depth is deducted from the span instead of two
    pub single_sided: bool,
}

/// The four control factors and their product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlFactors {
    pub connection: f64,
    pub panel_zone: f64,
    pub clear_span: f64,
    pub slenderness: f64,
    pub adjustment: f64,
}

impl ControlFactors {
    /// Evaluate all four factors for one beam
    pub fn evaluate(geometry: &ConnectionGeometry, class: &BeamClassification) -> Self {
        let connection = connection_factor(
            geometry.column_flange_thickness_mm,
            geometry.beam_flange_width_mm,
            geometry.continuity_plate_thickness_mm,
            geometry.beam_flange_thickness_mm,
        );
        let panel_zone = panel_zone_factor(panel_zone_ratio(geometry));
        let clear_span = clear_span_factor(clear_span_ratio(
            geometry.beam_length_mm,
            geometry.column_depth_mm,
            geometry.beam_depth_mm,
            geometry.single_sided,
        ));
        let slenderness = slenderness_factor(class);

        ControlFactors {
            connection,
            panel_zone,
            clear_span,
            slenderness,
            adjustment: connection * panel_zone * clear_span * slenderness,
        }
    }
}

/// Control 1: connection strength.
///
/// A column flange at least t2/5.2 thick is adequate on its own. Between
/// t2/7 and t2/5.2, continuity plates no thicker than t2/5.2 and at least
/// tf/2 are needed. Thinner column flanges need plates at least as thick as
/// the beam flange.
pub fn connection_factor(
    column_flange_thickness_mm: f64,
    beam_flange_width_mm: f64,
    continuity_plate_thickness_mm: f64,
    beam_flange_thickness_mm: f64,
) -> f64 {
    let tcf = column_flange_thickness_mm;
    let tcp = continuity_plate_thickness_mm;
    let upper = beam_flange_width_mm / 5.2;
    let lower = beam_flange_width_mm / 7.0;

    if tcf >= upper {
        1.0
    } else if tcf >= lower && tcp <= upper && tcp >= beam_flange_thickness_mm / 2.0 {
        1.0
    } else if tcf < lower && tcp >= beam_flange_thickness_mm {
        1.0
    } else {
        REDUCED
    }
}

/// Panel-zone demand ratio: beam flange force over panel-zone shear capacity
pub fn panel_zone_ratio(geometry: &ConnectionGeometry) -> f64 {
    let n = if geometry.single_sided { 1.0 } else { 0.0 };
    let db = geometry.beam_depth_mm;
    let dc = geometry.column_depth_mm;
    let l = geometry.beam_length_mm;
    let lc = geometry.column_length_mm;

    let demand = n * geometry.yield_moment_knm * 1e6 / db * (l / (l - dc)) * ((lc - db) / lc) / 1000.0;
    let capacity = 0.55 * geometry.column_fy_mpa * dc * geometry.column_web_thickness_mm / 1000.0;
    demand / capacity
}

/// Control 2: 1.0 when the panel-zone ratio lies in [0.6, 0.9]
pub fn panel_zone_factor(ratio: f64) -> f64 {
    if (PANEL_ZONE_MIN..=PANEL_ZONE_MAX).contains(&ratio) {
        1.0
    } else {
        REDUCED
    }
}

/// Clear span to depth ratio, deducting one column depth when single-sided
/// and two otherwise
pub fn clear_span_ratio(beam_length_mm: f64, column_depth_mm: f64, beam_depth_mm: f64, single_sided: bool) -> f64 {
    let deducted = if single_sided { column_depth_mm } else { 2.0 * column_depth_mm };
    (beam_length_mm - deducted) / beam_depth_mm
}

/// Control 3: 1.0 at or above a ratio of 8, halving every 3 below it
pub fn clear_span_factor(ratio: f64) -> f64 {
    if ratio >= CLEAR_SPAN_RATIO_LIMIT {
        1.0
    } else {
        0.5_f64.powf((CLEAR_SPAN_RATIO_LIMIT - ratio) / 3.0)
    }
}

/// Control 4: the smaller of the flange and web slenderness factors
pub fn slenderness_factor(class: &BeamClassification) -> f64 {
    let limits = &class.limits;
    let flange = slenderness_part(
        class.flange_slenderness,
        class.flange_compact,
        class.flange_slender,
        limits.flange_compact,
        limits.flange_slender,
    );
    let web = slenderness_part(
        class.web_slenderness,
        class.web_compact,
        class.web_slender,
        limits.web_compact,
        limits.web_slender,
    );
    flange.min(web)
}

fn slenderness_part(ratio: f64, compact: bool, slender: bool, compact_limit: f64, slender_limit: f64) -> f64 {
    if compact {
        1.0
    } else if slender {
        0.5
    } else {
        lerp(ratio, compact_limit, slender_limit, 1.0, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::classification::BeamLimits;
    use approx::assert_relative_eq;

    fn geometry() -> ConnectionGeometry {
        ConnectionGeometry {
            beam_length_mm: 6000.0,
            beam_depth_mm: 300.0,
            beam_flange_width_mm: 150.0,
            beam_flange_thickness_mm: 10.7,
            column_depth_mm: 300.0,
            column_flange_thickness_mm: 19.0,
            column_web_thickness_mm: 11.0,
            column_length_mm: 3500.0,
            column_fy_mpa: 355.0,
            continuity_plate_thickness_mm: 0.0,
            yield_moment_knm: 223.0,
            single_sided: false,
        }
    }

    #[test]
    fn test_connection_factor_branches() {
        // thick column flange
        assert_eq!(connection_factor(30.0, 150.0, 0.0, 10.7), 1.0);
        // 150/7 = 21.4 <= 25 < 28.8 = 150/5.2, plate 6 within [5.35, 28.8]
        assert_eq!(connection_factor(25.0, 150.0, 6.0, 10.7), 1.0);
        // same flange, no plate
        assert_eq!(connection_factor(25.0, 150.0, 0.0, 10.7), 0.8);
        // thin column flange with a full plate
        assert_eq!(connection_factor(15.0, 150.0, 12.0, 10.7), 1.0);
        assert_eq!(connection_factor(15.0, 150.0, 8.0, 10.7), 0.8);
    }

    #[test]
    fn test_panel_zone_without_flag_is_reduced() {
        // n = 0 zeroes the demand, which falls outside [0.6, 0.9]
        let ratio = panel_zone_ratio(&geometry());
        assert_eq!(ratio, 0.0);
        assert_eq!(panel_zone_factor(ratio), 0.8);
    }

    #[test]
    fn test_panel_zone_window_is_inclusive() {
        assert_eq!(panel_zone_factor(0.6), 1.0);
        assert_eq!(panel_zone_factor(0.75), 1.0);
        assert_eq!(panel_zone_factor(0.9), 1.0);
        assert_eq!(panel_zone_factor(0.59), 0.8);
        assert_eq!(panel_zone_factor(0.91), 0.8);
    }

    #[test]
    fn test_panel_zone_ratio_single_sided() {
        let g = ConnectionGeometry {
            single_sided: true,
            ..geometry()
        };
        let demand = 223.0 * 1e6 / 300.0 * (6000.0 / 5700.0) * (3200.0 / 3500.0) / 1000.0;
        let capacity = 0.55 * 355.0 * 300.0 * 11.0 / 1000.0;
        assert_relative_eq!(panel_zone_ratio(&g), demand / capacity, max_relative = 1e-12);
    }

    #[test]
    fn test_clear_span_factor() {
        assert_eq!(clear_span_factor(8.0), 1.0);
        assert_eq!(clear_span_factor(12.0), 1.0);
        assert_relative_eq!(clear_span_factor(5.0), 0.5);
        assert!((clear_span_factor(0.0) - 0.1575).abs() < 1e-4);
    }

    #[test]
    fn test_clear_span_ratio_deducts_column_depths() {
        assert_relative_eq!(clear_span_ratio(6000.0, 300.0, 300.0, false), 18.0);
        assert_relative_eq!(clear_span_ratio(6000.0, 300.0, 300.0, true), 19.0);
    }

    #[test]
    fn test_slenderness_factor() {
        let compact = BeamClassification::evaluate(6.0, 40.0, 345.0).unwrap();
        assert_eq!(slenderness_factor(&compact), 1.0);

        let limits = BeamLimits::for_yield_strength(345.0).unwrap();
        let slender = BeamClassification::evaluate(6.0, limits.web_slender, 345.0).unwrap();
        assert_eq!(slenderness_factor(&slender), 0.5);

        let mid = 0.5 * (limits.flange_compact + limits.flange_slender);
        let transition = BeamClassification::evaluate(mid, 40.0, 345.0).unwrap();
        assert_relative_eq!(slenderness_factor(&transition), 0.75, epsilon = 1e-9);
    }

    #[test]
    fn test_adjustment_is_product() {
        let class = BeamClassification::evaluate(6.0, 40.0, 345.0).unwrap();
        let factors = ControlFactors::evaluate(&geometry(), &class);
        assert_eq!(factors.connection, 1.0);
        assert_eq!(factors.panel_zone, 0.8);
        assert_eq!(factors.clear_span, 1.0);
        assert_eq!(factors.slenderness, 1.0);
        assert_relative_eq!(factors.adjustment, 0.8);
    }
}
