//! End-to-end: session file -> batch -> model file, results tables, saved outputs.

use std::fs;
use std::path::Path;

use hinge_core::calculations::{BeamInput, BraceInput, ColumnInput, MemberInput, MemberRole};
use hinge_core::export::CsvResultsSink;
use hinge_core::file_io::{load_session, save_session};
use hinge_core::hinge::record::{ACCEPTANCE_HEADER, FORCE_DEFORM_HEADER, GENERAL_HEADER};
use hinge_core::hinge::{s2k_path_for, ModelDocument};
use hinge_core::run_batch;
use hinge_core::sections::{SectionCatalog, ShapeKind};
use hinge_core::session::{Session, Variant};
use tempfile::TempDir;

const MODEL: &str = "File frame.$2k was saved on 1/1/25 at 12:00:00\r\n\
\r\n\
TABLE:  \"PROGRAM CONTROL\"\r\n\
   ProgramName=SAP2000   Version=24.0.0   CurrUnits=\"KN, mm, C\"\r\n\
\r\n\
TABLE:  \"FRAME SECTION PROPERTIES 01 - GENERAL\"\r\n\
   SectionName=IPE300   Material=S355   Shape=\"I/Wide Flange\"\r\n\
\r\n\
END TABLE DATA\r\n";

const CATALOG: &str = "\
name,shape,t3,t2,tf,tw,t2b,tfb,radius,i33,z33,area,r22,r33,fy,material
IPE300,I,300,150,10.7,7.1,150,10.7,15,83560000,628400,5381,33.5,124.6,355,S355
HEB300,I,300,300,19,11,300,19,27,251700000,1869000,14910,75.8,129.9,355,S355
L100X10,Angle,100,100,10,10,,,12,1770000,,1920,19.5,30.4,355,S355
";

fn session() -> Session {
    let mut session = Session::new("Test Engineer", "frame.sdb");
    let variants = [
        Variant::new(
            "B1",
            MemberInput::Beam(BeamInput {
                section_name: "IPE300".to_string(),
                shape: ShapeKind::I,
                length_mm: 6000.0,
                fy_mpa: 355.0,
                column_section: "HEB300".to_string(),
                column_length_mm: 3500.0,
                column_fy_mpa: 355.0,
                continuity_plate_thickness_mm: 0.0,
                n: None,
            }),
        ),
        Variant::new(
            "BR1",
            MemberInput::Brace(BraceInput {
                section_name: "L100X10".to_string(),
                shape: ShapeKind::Angle,
                length_mm: 4200.0,
                unbraced_length_minor_mm: 2100.0,
                unbraced_length_major_mm: 4200.0,
                fy_mpa: 355.0,
            }),
        ),
        Variant::new(
            "C1",
            MemberInput::Column(ColumnInput {
                section_name: "HEB300".to_string(),
                shape: ShapeKind::I,
                length_mm: 3500.0,
                fy_mpa: 355.0,
                unbraced_length_minor_mm: None,
                unbraced_length_major_mm: None,
            }),
        ),
        Variant::new(
            "X1",
            MemberInput::Brace(BraceInput {
                section_name: "NOPE999".to_string(),
                shape: ShapeKind::Angle,
                length_mm: 4200.0,
                unbraced_length_minor_mm: 2100.0,
                unbraced_length_major_mm: 4200.0,
                fy_mpa: 355.0,
            }),
        ),
        Variant::new(
            "U1",
            MemberInput::Column(ColumnInput {
                section_name: "PLATE-COL".to_string(),
                shape: ShapeKind::UserDefined,
                length_mm: 3500.0,
                fy_mpa: 355.0,
                unbraced_length_minor_mm: None,
                unbraced_length_major_mm: None,
            }),
        ),
    ];
    for variant in variants {
        session.upsert_variant(variant).unwrap();
    }
    session
}

fn setup(dir: &Path) -> (std::path::PathBuf, SectionCatalog) {
    let session_path = dir.join("hinges.json");
    save_session(&session(), &session_path).unwrap();
    fs::write(dir.join("frame.$2k"), MODEL).unwrap();
    let catalog_path = dir.join("sections.csv");
    fs::write(&catalog_path, CATALOG).unwrap();
    (session_path, SectionCatalog::load_from_csv(&catalog_path).unwrap())
}

#[test]
fn batch_writes_model_results_and_session() {
    let dir = TempDir::new().unwrap();
    let (session_path, catalog) = setup(dir.path());

    let mut session = load_session(&session_path).unwrap();
    let model_file = s2k_path_for(&session.resolved_model_path(&session_path));
    assert_eq!(model_file, dir.path().join("frame.$2k"));

    let mut sink = CsvResultsSink::new(&model_file);
    let summary = run_batch(&mut session, &catalog, &model_file, &mut sink);

    // the unknown section degrades to zero geometry, which the brace rejects;
    // the user-defined column gets a capacity but no hinge
    assert_eq!(summary.total, 5);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.unwritten, vec!["U1".to_string()]);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].variant, "X1");

    let text = fs::read_to_string(&model_file).unwrap();
    assert!(text.starts_with(MODEL));
    let document = ModelDocument::parse(&text);
    for name in ["B1", "BR1", "C1"] {
        assert_eq!(document.count_hinge_lines(name), 13, "hinge {}", name);
    }
    assert_eq!(document.count_hinge_lines("X1"), 0);
    assert_eq!(document.count_hinge_lines("U1"), 0);
    assert_eq!(document.table_lines(ACCEPTANCE_HEADER).unwrap().len(), 9);
    assert!(document.has_table(GENERAL_HEADER));
    assert!(document.has_table(FORCE_DEFORM_HEADER));
    // inserted lines follow the file's CRLF convention
    assert!(!text.replace("\r\n", "").contains('\n'));

    for (role, rows) in [(MemberRole::Beam, 1), (MemberRole::Brace, 1), (MemberRole::Column, 2)] {
        let results = fs::read_to_string(sink.path_for(role)).unwrap();
        assert_eq!(results.lines().count(), rows + 1, "{} results", role);
    }

    save_session(&session, &session_path).unwrap();
    let reloaded = load_session(&session_path).unwrap();
    assert_eq!(reloaded.variant("IPE300", "B1").unwrap().result_summary(), "a'=5.76 b'=7.04 adj=0.64");
    assert_eq!(reloaded.variant("NOPE999", "X1").unwrap().result_summary(), "Not calculated");
    assert_eq!(reloaded.variant("PLATE-COL", "U1").unwrap().result_summary(), "Axial: 1775.00");
}

#[test]
fn rerunning_a_batch_leaves_the_model_unchanged() {
    let dir = TempDir::new().unwrap();
    let (session_path, catalog) = setup(dir.path());
    let model_file = dir.path().join("frame.$2k");

    let mut session = load_session(&session_path).unwrap();
    run_batch(&mut session, &catalog, &model_file, &mut hinge_core::export::NullSink);
    let first = fs::read(&model_file).unwrap();

    let mut session = load_session(&session_path).unwrap();
    run_batch(&mut session, &catalog, &model_file, &mut hinge_core::export::NullSink);
    assert_eq!(fs::read(&model_file).unwrap(), first);
}

#[test]
fn editing_a_variant_replaces_only_its_hinge() {
    let dir = TempDir::new().unwrap();
    let (session_path, catalog) = setup(dir.path());
    let model_file = dir.path().join("frame.$2k");

    let mut session = load_session(&session_path).unwrap();
    run_batch(&mut session, &catalog, &model_file, &mut hinge_core::export::NullSink);
    let before = ModelDocument::parse(&fs::read_to_string(&model_file).unwrap());
    let brace_lines: Vec<String> = before
        .table_lines(FORCE_DEFORM_HEADER)
        .unwrap()
        .into_iter()
        .filter(|l| l.contains("HingeName=BR1 "))
        .map(str::to_string)
        .collect();

    let mut column = session.variant("HEB300", "C1").unwrap().clone();
    if let MemberInput::Column(input) = &mut column.input {
        input.length_mm = 7000.0;
    }
    column.output = None;
    session.upsert_variant(column).unwrap();
    let summary = run_batch(&mut session, &catalog, &model_file, &mut hinge_core::export::NullSink);
    assert_eq!(summary.succeeded, 3);

    let after = ModelDocument::parse(&fs::read_to_string(&model_file).unwrap());
    assert_eq!(after.line_count(), before.line_count());
    let brace_after: Vec<String> = after
        .table_lines(FORCE_DEFORM_HEADER)
        .unwrap()
        .into_iter()
        .filter(|l| l.contains("HingeName=BR1 "))
        .map(str::to_string)
        .collect();
    assert_eq!(brace_after, brace_lines);
}
