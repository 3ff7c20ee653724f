//! Hinge records and their text rendering.
//!
//! A record is one general line, nine backbone points (-E to E) and three
//! acceptance rows (IO, LS, CP). Numbers are fixed-point with the precision
//! the analysis program expects; each value carries its own precision.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::{AxialCapacity, CalculationOutput, HingeParameters};
use crate::errors::{CalcError, CalcResult};

/// General hinge definitions
pub const GENERAL_HEADER: &str = "TABLE:  \"HINGES DEF 02 - NONINTERACTING - DEFORM CONTROL - GENERAL\"";
/// Backbone force-deformation points
pub const FORCE_DEFORM_HEADER: &str = "TABLE:  \"HINGES DEF 03 - NONINTERACTING - DEFORM CONTROL - FORCE-DEFORM\"";
/// IO/LS/CP acceptance criteria
pub const ACCEPTANCE_HEADER: &str = "TABLE:  \"HINGES DEF 04 - NONINTERACTING - DEFORM CONTROL - ACCEPTANCE\"";

/// Separator between tokens, and the indent of every record line
const GAP: &str = "   ";

/// The three tables a hinge record is written into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HingeTable {
    General,
    ForceDeform,
    Acceptance,
}

impl HingeTable {
    pub const ALL: [HingeTable; 3] = [HingeTable::General, HingeTable::ForceDeform, HingeTable::Acceptance];

    /// Exact header line
    pub fn header(&self) -> &'static str {
        match self {
            HingeTable::General => GENERAL_HEADER,
            HingeTable::ForceDeform => FORCE_DEFORM_HEADER,
            HingeTable::Acceptance => ACCEPTANCE_HEADER,
        }
    }
}

/// Backbone stations in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Station {
    NegE,
    NegD,
    NegC,
    NegB,
    A,
    B,
    C,
    D,
    E,
}

impl Station {
    pub const ALL: [Station; 9] = [
        Station::NegE,
        Station::NegD,
        Station::NegC,
        Station::NegB,
        Station::A,
        Station::B,
        Station::C,
        Station::D,
        Station::E,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Station::NegE => "-E",
            Station::NegD => "-D",
            Station::NegC => "-C",
            Station::NegB => "-B",
            Station::A => "A",
            Station::B => "B",
            Station::C => "C",
            Station::D => "D",
            Station::E => "E",
        }
    }
}

/// Acceptance levels in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceLevel {
    IO,
    LS,
    CP,
}

impl PerformanceLevel {
    pub const ALL: [PerformanceLevel; 3] = [PerformanceLevel::IO, PerformanceLevel::LS, PerformanceLevel::CP];

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceLevel::IO => "IO",
            PerformanceLevel::LS => "LS",
            PerformanceLevel::CP => "CP",
        }
    }

    fn pick(&self, params: &HingeParameters) -> f64 {
        match self {
            PerformanceLevel::IO => params.io,
            PerformanceLevel::LS => params.ls,
            PerformanceLevel::CP => params.cp,
        }
    }
}

/// A number rendered with a fixed count of decimals.
///
/// Negative zero, and negatives that round to zero, print without a sign:
/// `-0.001` at two decimals is `0.00`, not `-0.00`. The analysis program
/// reads both as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fixed {
    pub value: f64,
    pub decimals: usize,
}

impl Fixed {
    pub fn new(value: f64, decimals: usize) -> Self {
        Fixed { value, decimals }
    }

    pub fn f1(value: f64) -> Self {
        Fixed::new(value, 1)
    }

    pub fn f2(value: f64) -> Self {
        Fixed::new(value, 2)
    }

    pub fn f4(value: f64) -> Self {
        Fixed::new(value, 4)
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{:.*}", self.decimals, self.value);
        match text.strip_prefix('-') {
            Some(unsigned) if unsigned.bytes().all(|b| b == b'0' || b == b'.') => f.write_str(unsigned),
            _ => f.write_str(&text),
        }
    }
}

/// One point on the backbone curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackbonePoint {
    pub station: Station,
    pub force: Fixed,
    pub displacement: Fixed,
}

/// Deformation limits for one performance level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptancePoint {
    pub level: PerformanceLevel,
    pub positive: Fixed,
    pub negative: Fixed,
}

/// Yield-force and yield-displacement scale factors of an axial hinge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxialScale {
    pub positive_force: f64,
    pub positive_displacement: f64,
    pub negative_force: f64,
    pub negative_displacement: f64,
}

impl From<&AxialCapacity> for AxialScale {
    fn from(capacity: &AxialCapacity) -> Self {
        AxialScale {
            positive_force: capacity.tension_force_kn,
            positive_displacement: capacity.tension_displacement_mm,
            negative_force: capacity.compression_force_kn,
            negative_displacement: capacity.compression_displacement_mm,
        }
    }
}

/// Degree of freedom the hinge acts on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HingeKind {
    /// Symmetric moment-rotation hinge (M3)
    Moment,
    /// Asymmetric force-displacement hinge (P)
    Axial(AxialScale),
}

/// Everything written for one hinge name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HingeRecord {
    pub kind: HingeKind,
    pub backbone: [BackbonePoint; 9],
    pub acceptance: [AcceptancePoint; 3],
}

fn point(station: Station, force: Fixed, displacement: Fixed) -> BackbonePoint {
    BackbonePoint {
        station,
        force,
        displacement,
    }
}

impl HingeRecord {
    /// Lines written per hinge: general + backbone + acceptance
    pub const LINE_COUNT: usize = 1 + 9 + 3;

    /// Moment hinge from the adjusted beam parameters.
    ///
    /// The residual strength `c` is taken unadjusted from `profile`.
    pub fn moment(profile: &HingeParameters, adjusted: &HingeParameters) -> Self {
        let a = adjusted.a;
        let b = adjusted.b;
        let c = profile.c;
        let hardening = 1.0 + 0.03 * a;

        let backbone = [
            point(Station::NegE, Fixed::f2(-c), Fixed::f2(-b)),
            point(Station::NegD, Fixed::f2(-c), Fixed::f2(-1.1 * a)),
            point(Station::NegC, Fixed::f2(-hardening), Fixed::f2(-a)),
            point(Station::NegB, Fixed::f1(-1.0), Fixed::f1(0.0)),
            point(Station::A, Fixed::f1(0.0), Fixed::f1(0.0)),
            point(Station::B, Fixed::f1(1.0), Fixed::f1(0.0)),
            point(Station::C, Fixed::f2(hardening), Fixed::f2(a)),
            point(Station::D, Fixed::f2(c), Fixed::f2(1.1 * a)),
            point(Station::E, Fixed::f2(c), Fixed::f2(b)),
        ];

        let acceptance = PerformanceLevel::ALL.map(|level| {
            let x = level.pick(adjusted);
            AcceptancePoint {
                level,
                positive: Fixed::f2(x),
                negative: Fixed::f2(-x),
            }
        });

        HingeRecord {
            kind: HingeKind::Moment,
            backbone,
            acceptance,
        }
    }

    /// Axial hinge: tension on the positive side, compression on the negative.
    pub fn axial(compression: &HingeParameters, tension: &HingeParameters, capacity: &AxialCapacity) -> Self {
        let (ac, bc, cc) = (compression.a, compression.b, compression.c);
        let (at, bt, ct) = (tension.a, tension.b, tension.c);
        let hardening = 1.0 + 0.03 * at;

        let backbone = [
            point(Station::NegE, Fixed::f2(-cc), Fixed::f4(-bc)),
            point(Station::NegD, Fixed::f2(-cc), Fixed::f4((-ac - 1.0) + cc)),
            point(Station::NegC, Fixed::f2(-1.0), Fixed::f4(-ac)),
            point(Station::NegB, Fixed::f2(-1.0), Fixed::f1(0.0)),
            point(Station::A, Fixed::f1(0.0), Fixed::f1(0.0)),
            point(Station::B, Fixed::f2(1.0), Fixed::f1(0.0)),
            point(Station::C, Fixed::f2(hardening), Fixed::f4(at)),
            point(Station::D, Fixed::f2(ct), Fixed::f4(hardening - ct + at)),
            point(Station::E, Fixed::f2(ct), Fixed::f4(bt)),
        ];

        let acceptance = PerformanceLevel::ALL.map(|level| AcceptancePoint {
            level,
            positive: Fixed::f2(level.pick(tension)),
            negative: Fixed::f2(-level.pick(compression)),
        });

        HingeRecord {
            kind: HingeKind::Axial(AxialScale::from(capacity)),
            backbone,
            acceptance,
        }
    }

    /// Record for a calculated variant, `None` for a column without an axial hinge
    pub fn from_output(output: &CalculationOutput) -> Option<Self> {
        match output {
            CalculationOutput::Beam(r) => Some(HingeRecord::moment(&r.profile, &r.adjusted)),
            CalculationOutput::Brace(r) => Some(HingeRecord::axial(
                &r.hinge.compression,
                &r.hinge.tension,
                &r.hinge.capacity,
            )),
            CalculationOutput::Column(r) => r
                .hinge
                .as_ref()
                .map(|h| HingeRecord::axial(&h.compression, &h.tension, &h.capacity)),
        }
    }

    /// Lines this record contributes to `table`
    pub fn lines_for(&self, table: HingeTable, hinge_name: &str) -> Vec<String> {
        let name = format!("HingeName={}", quote_if_needed(hinge_name));
        match table {
            HingeTable::General => vec![self.general_line(&name)],
            HingeTable::ForceDeform => self
                .backbone
                .iter()
                .map(|p| {
                    join(&[
                        &name,
                        &format!("FDPoint={}", p.station.label()),
                        &format!("Force={}", p.force),
                        &format!("Displ={}", p.displacement),
                    ])
                })
                .collect(),
            HingeTable::Acceptance => self
                .acceptance
                .iter()
                .map(|p| {
                    join(&[
                        &name,
                        &format!("ACPoint={}", p.level.label()),
                        &format!("ACPos={}", p.positive),
                        &format!("ACNeg={}", p.negative),
                    ])
                })
                .collect(),
        }
    }

    fn general_line(&self, name: &str) -> String {
        match &self.kind {
            HingeKind::Moment => join(&[
                name,
                "DOFType=\"Moment M3\"",
                "Symmetric=Yes",
                "BeyondE=Extrapolated",
                "FDType=Moment-Rot",
                "UseYldForce=Yes",
                "UseYldDispl=Yes",
                "LengthType=Absolute",
                "SSAbsLen=1",
                "HysType=Kinematic",
            ]),
            HingeKind::Axial(scale) => join(&[
                name,
                "DOFType=\"Axial P\"",
                "Symmetric=No",
                "BeyondE=Extrapolated",
                "FDType=Force-Displ",
                "UseYldForce=No",
                "UseYldDispl=No",
                &format!("FDPosForSF={}", Fixed::f2(scale.positive_force)),
                &format!("FDPosDisSF={}", Fixed::f2(scale.positive_displacement)),
                &format!("FDNegForSF={}", Fixed::f2(scale.negative_force)),
                &format!("FDNegDisSF={}", Fixed::f2(scale.negative_displacement)),
                "LengthType=Absolute",
                "SSAbsLen=1",
                "HysType=Kinematic",
            ]),
        }
    }
}

fn join(tokens: &[&str]) -> String {
    let mut line = String::from(GAP);
    line.push_str(&tokens.join(GAP));
    line
}

fn quote_if_needed(name: &str) -> String {
    if name.chars().any(char::is_whitespace) {
        format!("\"{}\"", name)
    } else {
        name.to_string()
    }
}

/// Reject hinge names that cannot be written as a single token
pub fn validate_hinge_name(name: &str) -> CalcResult<()> {
    if name.trim().is_empty() {
        return Err(CalcError::missing_field("hinge_name"));
    }
    if name != name.trim() || name.contains(['"', '\r', '\n']) {
        return Err(CalcError::invalid_input(
            "hinge_name",
            name,
            "Hinge names cannot contain quotes, line breaks or surrounding spaces",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beam_profile() -> HingeParameters {
        HingeParameters {
            a: 9.0,
            b: 11.0,
            c: 0.6,
            io: 1.0,
            ls: 9.0,
            cp: 11.0,
        }
    }

    #[test]
    fn test_fixed_formatting() {
        assert_eq!(Fixed::f2(1.276).to_string(), "1.28");
        assert_eq!(Fixed::f1(-1.0).to_string(), "-1.0");
        assert_eq!(Fixed::f2(-0.0).to_string(), "0.00");
        assert_eq!(Fixed::f2(-0.001).to_string(), "0.00");
        assert_eq!(Fixed::f4(-0.25).to_string(), "-0.2500");
    }

    #[test]
    fn test_moment_general_line() {
        let record = HingeRecord::moment(&beam_profile(), &beam_profile());
        let lines = record.lines_for(HingeTable::General, "H1");
        assert_eq!(
            lines,
            vec![
                "   HingeName=H1   DOFType=\"Moment M3\"   Symmetric=Yes   BeyondE=Extrapolated   \
                 FDType=Moment-Rot   UseYldForce=Yes   UseYldDispl=Yes   LengthType=Absolute   \
                 SSAbsLen=1   HysType=Kinematic"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_moment_backbone() {
        let adjusted = beam_profile().scaled(0.8);
        let record = HingeRecord::moment(&beam_profile(), &adjusted);
        let lines = record.lines_for(HingeTable::ForceDeform, "H1");

        assert_eq!(lines.len(), 9);
        // a' = 7.2, b' = 8.8, c = 0.6 unadjusted
        assert_eq!(lines[0], "   HingeName=H1   FDPoint=-E   Force=-0.60   Displ=-8.80");
        assert_eq!(lines[1], "   HingeName=H1   FDPoint=-D   Force=-0.60   Displ=-7.92");
        assert_eq!(lines[2], "   HingeName=H1   FDPoint=-C   Force=-1.22   Displ=-7.20");
        assert_eq!(lines[3], "   HingeName=H1   FDPoint=-B   Force=-1.0   Displ=0.0");
        assert_eq!(lines[4], "   HingeName=H1   FDPoint=A   Force=0.0   Displ=0.0");
        assert_eq!(lines[5], "   HingeName=H1   FDPoint=B   Force=1.0   Displ=0.0");
        assert_eq!(lines[6], "   HingeName=H1   FDPoint=C   Force=1.22   Displ=7.20");
        assert_eq!(lines[8], "   HingeName=H1   FDPoint=E   Force=0.60   Displ=8.80");
    }

    #[test]
    fn test_moment_acceptance() {
        let record = HingeRecord::moment(&beam_profile(), &beam_profile().scaled(0.5));
        let lines = record.lines_for(HingeTable::Acceptance, "H1");
        assert_eq!(
            lines,
            vec![
                "   HingeName=H1   ACPoint=IO   ACPos=0.50   ACNeg=-0.50",
                "   HingeName=H1   ACPoint=LS   ACPos=4.50   ACNeg=-4.50",
                "   HingeName=H1   ACPoint=CP   ACPos=5.50   ACNeg=-5.50",
            ]
        );
    }

    #[test]
    fn test_axial_record() {
        let compression = HingeParameters {
            a: 0.75,
            b: 8.0,
            c: 0.4,
            io: 0.5,
            ls: 6.5,
            cp: 8.0,
        };
        let tension = HingeParameters {
            a: 8.0,
            b: 9.0,
            c: 0.6,
            io: 0.5,
            ls: 7.0,
            cp: 9.0,
        };
        let capacity = AxialCapacity {
            euler_stress_mpa: 350.9,
            critical_stress_mpa: 245.5,
            compression_force_kn: 1104.75,
            compression_displacement_mm: 3.6825,
            tension_force_kn: 1552.5,
            tension_displacement_mm: 5.1761,
        };

        let record = HingeRecord::axial(&compression, &tension, &capacity);
        let general = record.lines_for(HingeTable::General, "BR-1");
        assert_eq!(
            general[0],
            "   HingeName=BR-1   DOFType=\"Axial P\"   Symmetric=No   BeyondE=Extrapolated   \
             FDType=Force-Displ   UseYldForce=No   UseYldDispl=No   FDPosForSF=1552.50   \
             FDPosDisSF=5.18   FDNegForSF=1104.75   FDNegDisSF=3.68   LengthType=Absolute   \
             SSAbsLen=1   HysType=Kinematic"
        );

        let backbone = record.lines_for(HingeTable::ForceDeform, "BR-1");
        assert_eq!(backbone[0], "   HingeName=BR-1   FDPoint=-E   Force=-0.40   Displ=-8.0000");
        assert_eq!(backbone[1], "   HingeName=BR-1   FDPoint=-D   Force=-0.40   Displ=-1.3500");
        assert_eq!(backbone[2], "   HingeName=BR-1   FDPoint=-C   Force=-1.00   Displ=-0.7500");
        assert_eq!(backbone[3], "   HingeName=BR-1   FDPoint=-B   Force=-1.00   Displ=0.0");
        assert_eq!(backbone[5], "   HingeName=BR-1   FDPoint=B   Force=1.00   Displ=0.0");
        assert_eq!(backbone[6], "   HingeName=BR-1   FDPoint=C   Force=1.24   Displ=8.0000");
        assert_eq!(backbone[7], "   HingeName=BR-1   FDPoint=D   Force=0.60   Displ=8.6400");
        assert_eq!(backbone[8], "   HingeName=BR-1   FDPoint=E   Force=0.60   Displ=9.0000");

        let acceptance = record.lines_for(HingeTable::Acceptance, "BR-1");
        assert_eq!(acceptance[1], "   HingeName=BR-1   ACPoint=LS   ACPos=7.00   ACNeg=-6.50");
    }

    #[test]
    fn test_column_without_radii_has_no_record() {
        use crate::calculations::{calculate, ColumnInput, MemberInput};
        use crate::sections::{SectionCatalog, ShapeKind};
        use crate::settings::HingeSettings;

        let column = |shape| {
            MemberInput::Column(ColumnInput {
                section_name: "HEB300".to_string(),
                shape,
                length_mm: 3500.0,
                fy_mpa: 355.0,
                unbraced_length_minor_mm: None,
                unbraced_length_major_mm: None,
            })
        };
        let run = |input: &MemberInput| {
            calculate(input, &SectionCatalog::builtin(), &HingeSettings::default()).unwrap()
        };

        assert!(HingeRecord::from_output(&run(&column(ShapeKind::UserDefined))).is_none());
        let record = HingeRecord::from_output(&run(&column(ShapeKind::I))).unwrap();
        assert!(matches!(record.kind, HingeKind::Axial(_)));
    }

    #[test]
    fn test_names_with_spaces_are_quoted() {
        let record = HingeRecord::moment(&beam_profile(), &beam_profile());
        let lines = record.lines_for(HingeTable::Acceptance, "Roof Beam");
        assert!(lines[0].starts_with("   HingeName=\"Roof Beam\"   ACPoint=IO"));
    }

    #[test]
    fn test_hinge_name_validation() {
        assert!(validate_hinge_name("B1-v2").is_ok());
        assert!(validate_hinge_name("Roof Beam").is_ok());
        assert_eq!(validate_hinge_name(" ").unwrap_err().error_code(), "MISSING_FIELD");
        assert!(validate_hinge_name("bad\"name").is_err());
        assert!(validate_hinge_name(" padded").is_err());
    }

    #[test]
    fn test_line_count() {
        let record = HingeRecord::moment(&beam_profile(), &beam_profile());
        let total: usize = HingeTable::ALL
            .iter()
            .map(|table| record.lines_for(*table, "H").len())
            .sum();
        assert_eq!(total, HingeRecord::LINE_COUNT);
    }
}
