//! # Hinge Calculations
//!
//! Each member type follows the same pattern:
//!
//! - `*Input` - user inputs (JSON-serializable)
//! - `*Result` - fetched geometry plus every intermediate and final value
//! - `calculate(input, source, settings)` - fetch, then evaluate
//! - `evaluate(input, geometry, settings)` - pure calculation on fetched geometry
//!
//! [`MemberInput`] wraps the three input types as a tagged enum so a session
//! can hold heterogeneous variants, and [`calculate`] dispatches on the tag.
//!
//! ## Available Calculations
//!
//! - [`beam`] - moment-rotation hinge with control factors
//! - [`brace`] - axial hinge with buckling capacity
//! - [`column`] - axial hinge plus squash-load estimate

pub mod beam;
pub mod brace;
pub mod category;
pub mod classification;
pub mod column;
pub mod control;
pub mod interpolation;
pub mod parameters;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::sections::{SectionSource, ShapeKind};
use crate::settings::HingeSettings;

pub use beam::{BeamInput, BeamResult};
pub use brace::{AxialCapacity, AxialHinge, BraceInput, BraceResult};
pub use category::{Category, MemberRole};
pub use column::{ColumnInput, ColumnResult};
pub use parameters::HingeParameters;

/// Inputs for one variant, tagged by member role.
///
/// ```json
/// { "type": "Brace", "section_name": "L100X10", "shape": "Angle", ... }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MemberInput {
    Beam(BeamInput),
    Brace(BraceInput),
    Column(ColumnInput),
}

impl MemberInput {
    pub fn section_name(&self) -> &str {
        match self {
            MemberInput::Beam(b) => &b.section_name,
            MemberInput::Brace(b) => &b.section_name,
            MemberInput::Column(c) => &c.section_name,
        }
    }

    pub fn shape(&self) -> ShapeKind {
        match self {
            MemberInput::Beam(b) => b.shape,
            MemberInput::Brace(b) => b.shape,
            MemberInput::Column(c) => c.shape,
        }
    }

    pub fn role(&self) -> MemberRole {
        match self {
            MemberInput::Beam(_) => MemberRole::Beam,
            MemberInput::Brace(_) => MemberRole::Brace,
            MemberInput::Column(_) => MemberRole::Column,
        }
    }

    /// Category tag, e.g. `Beam-I-Section`
    pub fn category(&self) -> Category {
        Category::new(self.role(), self.shape())
    }

    pub fn validate(&self) -> CalcResult<()> {
        match self {
            MemberInput::Beam(b) => b.validate(),
            MemberInput::Brace(b) => b.validate(),
            MemberInput::Column(c) => c.validate(),
        }
    }
}

/// Result of one variant calculation, tagged like its input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    Beam(BeamResult),
    Brace(BraceResult),
    Column(ColumnResult),
}

impl CalculationOutput {
    pub fn role(&self) -> MemberRole {
        match self {
            CalculationOutput::Beam(_) => MemberRole::Beam,
            CalculationOutput::Brace(_) => MemberRole::Brace,
            CalculationOutput::Column(_) => MemberRole::Column,
        }
    }

    /// One-line description of the headline result
    pub fn summary(&self) -> String {
        match self {
            CalculationOutput::Beam(r) => format!(
                "a'={:.2} b'={:.2} adj={:.2}",
                r.adjusted.a, r.adjusted.b, r.controls.adjustment
            ),
            CalculationOutput::Brace(r) => format!(
                "KL/r={:.1} Py={:.2} kN Ty={:.2} kN",
                r.hinge.classification.slenderness,
                r.hinge.capacity.compression_force_kn,
                r.hinge.capacity.tension_force_kn
            ),
            CalculationOutput::Column(r) => format!("Axial: {:.2}", r.axial_capacity_kn),
        }
    }
}

/// Fetch geometry and calculate one variant
pub fn calculate<S: SectionSource + ?Sized>(
    input: &MemberInput,
    source: &S,
    settings: &HingeSettings,
) -> CalcResult<CalculationOutput> {
    match input {
        MemberInput::Beam(b) => beam::calculate(b, source, settings).map(CalculationOutput::Beam),
        MemberInput::Brace(b) => brace::calculate(b, source, settings).map(CalculationOutput::Brace),
        MemberInput::Column(c) => column::calculate(c, source, settings).map(CalculationOutput::Column),
    }
}
