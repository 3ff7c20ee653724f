//! # Results Export
//!
//! After a variant is written to the model file, its full calculation trail
//! (inputs, fetched geometry, intermediate and final values) is appended to a
//! per-role results table next to the model:
//!
//! ```text
//! frame.$2k
//! frame_Beam_Results.csv
//! frame_Brace_Results.csv
//! frame_Column_Results.csv
//! ```
//!
//! Export is a side channel. The batch runner logs export failures and moves on.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use crate::calculations::{
    AxialHinge, BeamResult, BraceResult, CalculationOutput, ColumnResult, HingeParameters, MemberInput, MemberRole,
};
use crate::errors::{CalcError, CalcResult};
use crate::sections::SectionGeometry;
use crate::session::Variant;

/// Destination for per-variant calculation results
pub trait ResultsSink {
    fn export(&mut self, variant: &Variant, output: &CalculationOutput) -> CalcResult<()>;
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ResultsSink for NullSink {
    fn export(&mut self, _variant: &Variant, _output: &CalculationOutput) -> CalcResult<()> {
        Ok(())
    }
}

/// Appends rows to `<stem>_<Role>_Results.csv` beside the model file
#[derive(Debug, Clone)]
pub struct CsvResultsSink {
    directory: PathBuf,
    stem: String,
}

impl CsvResultsSink {
    pub fn new(model_path: &Path) -> Self {
        CsvResultsSink {
            directory: model_path.parent().map(Path::to_path_buf).unwrap_or_default(),
            stem: model_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "model".to_string()),
        }
    }

    /// Results file for one member role
    pub fn path_for(&self, role: MemberRole) -> PathBuf {
        self.directory.join(format!("{}_{}_Results.csv", self.stem, role))
    }
}

impl ResultsSink for CsvResultsSink {
    fn export(&mut self, variant: &Variant, output: &CalculationOutput) -> CalcResult<()> {
        let path = self.path_for(output.role());
        let row = result_row(variant, output);
        let failed = |reason: String| CalcError::export_failed(path.display().to_string(), reason);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| failed(e.to_string()))?;
        let is_new = file.metadata().map(|m| m.len() == 0).map_err(|e| failed(e.to_string()))?;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer
                .write_record(row.iter().map(|(header, _)| *header))
                .map_err(|e| failed(e.to_string()))?;
        }
        writer
            .write_record(row.iter().map(|(_, value)| value.as_str()))
            .map_err(|e| failed(e.to_string()))?;
        writer.flush().map_err(|e| failed(e.to_string()))?;

        debug!(variant = %variant.name, path = %path.display(), "results exported");
        Ok(())
    }
}

type Row = Vec<(&'static str, String)>;

fn num(value: f64) -> String {
    format!("{:.3}", value)
}

fn flag(value: bool) -> String {
    let text = if value { "Yes" } else { "No" };
    text.to_string()
}

fn result_row(variant: &Variant, output: &CalculationOutput) -> Row {
    let mut row: Row = vec![
        ("Variant", variant.name.clone()),
        ("Section", variant.section_name().to_string()),
        ("Category", variant.input.category().to_string()),
    ];

    match (&variant.input, output) {
        (MemberInput::Beam(input), CalculationOutput::Beam(result)) => {
            row.extend([
                ("L (mm)", num(input.length_mm)),
                ("Fy (MPa)", num(input.fy_mpa)),
                ("Selected Column", input.column_section.clone()),
                ("Column Length (mm)", num(input.column_length_mm)),
                ("Column Fy (MPa)", num(input.column_fy_mpa)),
                ("Continuity Plate (mm)", num(input.continuity_plate_thickness_mm)),
            ]);
            beam_columns(&mut row, result);
        }
        (MemberInput::Brace(input), CalculationOutput::Brace(result)) => {
            row.extend([
                ("L (mm)", num(input.length_mm)),
                ("L2 (mm)", num(input.unbraced_length_minor_mm)),
                ("L3 (mm)", num(input.unbraced_length_major_mm)),
                ("Fy (MPa)", num(input.fy_mpa)),
            ]);
            brace_columns(&mut row, result);
        }
        (MemberInput::Column(input), CalculationOutput::Column(result)) => {
            row.extend([
                ("L (mm)", num(input.length_mm)),
                ("L2 (mm)", num(input.l2_mm())),
                ("L3 (mm)", num(input.l3_mm())),
                ("Fy (MPa)", num(input.fy_mpa)),
            ]);
            column_columns(&mut row, result);
        }
        // Stale output from an edited variant: keep what identifies it
        _ => row.push(("Summary", output.summary())),
    }

    row.push(("Calculated At", Local::now().format("%Y-%m-%d %H:%M:%S").to_string()));
    row
}

fn geometry_columns(row: &mut Row, prefix: GeometryPrefix, g: &SectionGeometry) {
    let names = prefix.names();
    row.extend([
        (names[0], num(g.depth_mm)),
        (names[1], num(g.flange_width_mm)),
        (names[2], num(g.flange_thickness_mm)),
        (names[3], num(g.web_thickness_mm)),
        (names[4], num(g.bottom_flange_width_mm)),
        (names[5], num(g.bottom_flange_thickness_mm)),
        (names[6], num(g.fillet_radius_mm)),
        (names[7], num(g.i33_mm4)),
        (names[8], num(g.z33_mm3)),
        (names[9], num(g.area_mm2)),
        (names[10], num(g.r22_mm)),
        (names[11], num(g.r33_mm)),
        (names[12], g.material.clone().unwrap_or_default()),
    ]);
}

#[derive(Clone, Copy)]
enum GeometryPrefix {
    Member,
    Column,
}

impl GeometryPrefix {
    fn names(self) -> [&'static str; 13] {
        match self {
            GeometryPrefix::Member => [
                "t3 (mm)",
                "t2 (mm)",
                "tf (mm)",
                "tw (mm)",
                "t2b (mm)",
                "tfb (mm)",
                "Radius (mm)",
                "I33 (mm4)",
                "Z33 (mm3)",
                "Area (mm2)",
                "r22 (mm)",
                "r33 (mm)",
                "Material",
            ],
            GeometryPrefix::Column => [
                "Column t3 (mm)",
                "Column t2 (mm)",
                "Column tf (mm)",
                "Column tw (mm)",
                "Column t2b (mm)",
                "Column tfb (mm)",
                "Column Radius (mm)",
                "Column I33 (mm4)",
                "Column Z33 (mm3)",
                "Column Area (mm2)",
                "Column r22 (mm)",
                "Column r33 (mm)",
                "Column Material",
            ],
        }
    }
}

fn parameter_columns(row: &mut Row, names: [&'static str; 6], p: Option<&HingeParameters>) {
    let values = p.map(|p| [p.a, p.b, p.c, p.io, p.ls, p.cp]);
    row.extend(
        names
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, values.map(|v| num(v[i])).unwrap_or_default())),
    );
}

fn beam_columns(row: &mut Row, r: &BeamResult) {
    geometry_columns(row, GeometryPrefix::Member, &r.geometry);
    geometry_columns(row, GeometryPrefix::Column, &r.column_geometry);
    row.extend([
        ("bf/2tf", num(r.classification.flange_slenderness)),
        ("h/tw", num(r.classification.web_slenderness)),
        ("Flange Compact", flag(r.classification.flange_compact)),
        ("Web Compact", flag(r.classification.web_compact)),
        ("Flange Slender", flag(r.classification.flange_slender)),
        ("Web Slender", flag(r.classification.web_slender)),
        ("My (kNm)", num(r.yield_moment_knm)),
        ("Yield Rotation (rad)", format!("{:.6}", r.yield_rotation_rad)),
        ("Single Sided", flag(r.single_sided)),
    ]);
    parameter_columns(
        row,
        ["profile_a", "profile_b", "profile_c", "profile_IO", "profile_LS", "profile_CP"],
        Some(&r.profile),
    );
    row.extend([
        ("control_1", num(r.controls.connection)),
        ("control_2", num(r.controls.panel_zone)),
        ("control_3", num(r.controls.clear_span)),
        ("control_4", num(r.controls.slenderness)),
        ("Adjustment Factor", num(r.controls.adjustment)),
    ]);
    parameter_columns(
        row,
        [
            "profile_a_prime",
            "profile_b_prime",
            "profile_c_prime",
            "profile_IO_prime",
            "profile_LS_prime",
            "profile_CP_prime",
        ],
        Some(&r.adjusted),
    );
}

/// Blank cells when the column has no axial hinge, so rows stay aligned
fn axial_columns(row: &mut Row, h: Option<&AxialHinge>) {
    let cell = |value: fn(&AxialHinge) -> f64| h.map(|h| num(value(h))).unwrap_or_default();
    row.extend([
        ("KL/r", cell(|h| h.classification.slenderness)),
        ("Upper Limit", cell(|h| h.classification.limits.upper)),
        ("Lower Limit", cell(|h| h.classification.limits.lower)),
        ("Fe (MPa)", cell(|h| h.capacity.euler_stress_mpa)),
        ("Fcr (MPa)", cell(|h| h.capacity.critical_stress_mpa)),
        ("Py (kN)", cell(|h| h.capacity.compression_force_kn)),
        ("Compression Displacement (mm)", cell(|h| h.capacity.compression_displacement_mm)),
        ("Ty (kN)", cell(|h| h.capacity.tension_force_kn)),
        ("Tension Displacement (mm)", cell(|h| h.capacity.tension_displacement_mm)),
    ]);
    parameter_columns(
        row,
        [
            "compression_a",
            "compression_b",
            "compression_c",
            "compression_IO",
            "compression_LS",
            "compression_CP",
        ],
        h.map(|h| &h.compression),
    );
    parameter_columns(
        row,
        ["tension_a", "tension_b", "tension_c", "tension_IO", "tension_LS", "tension_CP"],
        h.map(|h| &h.tension),
    );
}

fn brace_columns(row: &mut Row, r: &BraceResult) {
    geometry_columns(row, GeometryPrefix::Member, &r.geometry);
    row.push(("Area Used (mm2)", num(r.area_mm2)));
    axial_columns(row, Some(&r.hinge));
}

fn column_columns(row: &mut Row, r: &ColumnResult) {
    geometry_columns(row, GeometryPrefix::Member, &r.geometry);
    row.extend([
        ("Area Used (mm2)", num(r.area_mm2)),
        ("Default Area", flag(r.area_is_default)),
        ("Axial Capacity (kN)", num(r.axial_capacity_kn)),
    ]);
    axial_columns(row, r.hinge.as_ref());
}
