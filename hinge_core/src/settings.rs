//! Calculation settings stored with each session.

use serde::{Deserialize, Serialize};

use crate::calculations::classification::STEEL_ELASTIC_MODULUS_MPA;
use crate::calculations::parameters::{HingeParameters, DEFAULT_TENSION};
use crate::errors::{CalcError, CalcResult};

/// Area assumed for a column whose section reports no usable geometry (mm²)
pub const DEFAULT_COLUMN_AREA_MM2: f64 = 5000.0;

/// Session-wide constants used by the calculators.
///
/// Every field has a default so older session files load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HingeSettings {
    /// Elastic modulus E (MPa)
    pub elastic_modulus_mpa: f64,

    /// Brace/column tension backbone parameters
    pub tension: HingeParameters,

    /// Default connection flag for beams that do not set their own
    pub beam_n: bool,

    /// Fallback area for the column axial-capacity estimate (mm²)
    pub default_column_area_mm2: f64,
}

impl Default for HingeSettings {
    fn default() -> Self {
        HingeSettings {
            elastic_modulus_mpa: STEEL_ELASTIC_MODULUS_MPA,
            tension: DEFAULT_TENSION,
            beam_n: false,
            default_column_area_mm2: DEFAULT_COLUMN_AREA_MM2,
        }
    }
}

impl HingeSettings {
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.elastic_modulus_mpa > 0.0) {
            return Err(CalcError::invalid_input(
                "elastic_modulus_mpa",
                self.elastic_modulus_mpa.to_string(),
                "Elastic modulus must be positive",
            ));
        }
        if self.default_column_area_mm2 < 0.0 {
            return Err(CalcError::invalid_input(
                "default_column_area_mm2",
                self.default_column_area_mm2.to_string(),
                "Area cannot be negative",
            ));
        }
        Ok(())
    }
}
