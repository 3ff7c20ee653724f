//! # Session Data Structures
//!
//! A `Session` is the persisted working set: which model file to patch, the
//! calculation settings, and the ordered list of named variants.
//!
//! ## Structure
//!
//! ```text
//! Session
//! ├── meta: SessionMetadata (version, engineer, timestamps)
//! ├── model_path: target model text file
//! ├── settings: HingeSettings
//! └── variants: Vec<Variant> (insertion order, unique per section + name)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use hinge_core::calculations::{ColumnInput, MemberInput};
//! use hinge_core::sections::ShapeKind;
//! use hinge_core::session::{Session, Variant};
//!
//! let mut session = Session::new("Jane Engineer", "frame.$2k");
//! let input = MemberInput::Column(ColumnInput {
//!     section_name: "HEB300".to_string(),
//!     shape: ShapeKind::I,
//!     length_mm: 3500.0,
//!     fy_mpa: 355.0,
//!     unbraced_length_minor_mm: None,
//!     unbraced_length_major_mm: None,
//! });
//!
//! session.upsert_variant(Variant::new("C1-ground", input)).unwrap();
//! assert_eq!(session.variant_count(), 1);
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::{CalculationOutput, MemberInput};
use crate::errors::{CalcError, CalcResult};
use crate::settings::HingeSettings;

/// Current schema version for session files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root session container, serialized as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub meta: SessionMetadata,

    /// Model text file the hinges are written into.
    ///
    /// Relative paths are resolved against the session file's directory.
    pub model_path: PathBuf,

    #[serde(default)]
    pub settings: HingeSettings,

    /// Variants in insertion order
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Session {
    /// Create an empty session.
    pub fn new(engineer: impl Into<String>, model_path: impl Into<PathBuf>) -> Self {
        let now = Utc::now();
        Session {
            meta: SessionMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                created: now,
                modified: now,
            },
            model_path: model_path.into(),
            settings: HingeSettings::default(),
            variants: Vec::new(),
        }
    }

    /// Insert a variant, or replace the one with the same section and name.
    ///
    /// A replaced variant keeps its position. Returns `true` on replace.
    pub fn upsert_variant(&mut self, variant: Variant) -> CalcResult<bool> {
        variant.validate_name()?;
        let existing = self
            .variants
            .iter_mut()
            .find(|v| v.section_name() == variant.section_name() && v.name == variant.name);

        let replaced = match existing {
            Some(slot) => {
                *slot = variant;
                true
            }
            None => {
                self.variants.push(variant);
                false
            }
        };
        self.touch();
        Ok(replaced)
    }

    /// Reject empty names and repeated (section, name) pairs.
    ///
    /// `upsert_variant` keeps a session clean; this catches hand-edited files.
    pub fn validate_variants(&self) -> CalcResult<()> {
        let mut seen = HashSet::new();
        for variant in &self.variants {
            variant.validate_name()?;
            if !seen.insert((variant.section_name(), variant.name.as_str())) {
                return Err(CalcError::invalid_input(
                    "variants",
                    format!("{}/{}", variant.section_name(), variant.name),
                    "Variant name is used more than once for this section",
                ));
            }
        }
        Ok(())
    }

    /// Remove a variant by section and name.
    pub fn remove_variant(&mut self, section_name: &str, name: &str) -> Option<Variant> {
        let index = self
            .variants
            .iter()
            .position(|v| v.section_name() == section_name && v.name == name)?;
        self.touch();
        Some(self.variants.remove(index))
    }

    pub fn variant(&self, section_name: &str, name: &str) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.section_name() == section_name && v.name == name)
    }

    /// Variants defined for one section, in insertion order
    pub fn variants_for_section<'a>(&'a self, section_name: &'a str) -> impl Iterator<Item = &'a Variant> + 'a {
        self.variants.iter().filter(move |v| v.section_name() == section_name)
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Model path, resolved against the directory holding the session file
    pub fn resolved_model_path(&self, session_path: &Path) -> PathBuf {
        if self.model_path.is_absolute() {
            return self.model_path.clone();
        }
        match session_path.parent() {
            Some(dir) => dir.join(&self.model_path),
            None => self.model_path.clone(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

/// Session metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// A named set of inputs for one section, and its last result.
///
/// The variant name doubles as the hinge name in the model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub input: MemberInput,
    pub created: DateTime<Utc>,

    /// Output of the last successful calculation of `input`.
    ///
    /// Cleared when a batch fails to recalculate the variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<CalculationOutput>,
}

impl Variant {
    pub fn new(name: impl Into<String>, input: MemberInput) -> Self {
        Variant {
            name: name.into(),
            input,
            created: Utc::now(),
            output: None,
        }
    }

    pub fn section_name(&self) -> &str {
        self.input.section_name()
    }

    fn validate_name(&self) -> CalcResult<()> {
        if self.name.trim().is_empty() {
            return Err(CalcError::missing_field("name"));
        }
        Ok(())
    }

    /// Summary line for listings
    pub fn result_summary(&self) -> String {
        match &self.output {
            Some(output) => output.summary(),
            None => "Not calculated".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{BraceInput, ColumnInput};
    use crate::sections::ShapeKind;

    fn column(section: &str) -> MemberInput {
        MemberInput::Column(ColumnInput {
            section_name: section.to_string(),
            shape: ShapeKind::I,
            length_mm: 3500.0,
            fy_mpa: 355.0,
            unbraced_length_minor_mm: None,
            unbraced_length_major_mm: None,
        })
    }

    fn brace(section: &str, length_mm: f64) -> MemberInput {
        MemberInput::Brace(BraceInput {
            section_name: section.to_string(),
            shape: ShapeKind::Angle,
            length_mm,
            unbraced_length_minor_mm: length_mm / 2.0,
            unbraced_length_major_mm: length_mm,
            fy_mpa: 355.0,
        })
    }

    #[test]
    fn test_validate_variants_rejects_duplicates() {
        let mut session = Session::new("Engineer", "frame.$2k");
        session.upsert_variant(Variant::new("V1", column("HEB300"))).unwrap();
        session.upsert_variant(Variant::new("V1", brace("L100X10", 4000.0))).unwrap();
        assert!(session.validate_variants().is_ok());

        session.variants.push(Variant::new("V1", column("HEB300")));
        let err = session.validate_variants().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("HEB300/V1"));
    }

    #[test]
    fn test_session_creation() {
        let session = Session::new("John Doe", "frame.$2k");
        assert_eq!(session.meta.engineer, "John Doe");
        assert_eq!(session.meta.version, SCHEMA_VERSION);
        assert_eq!(session.variant_count(), 0);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut session = Session::new("Engineer", "frame.$2k");
        assert!(!session.upsert_variant(Variant::new("V1", brace("L100X10", 4000.0))).unwrap());
        assert!(!session.upsert_variant(Variant::new("V2", brace("L100X10", 4000.0))).unwrap());
        assert!(!session.upsert_variant(Variant::new("V1", column("HEB300"))).unwrap());
        assert_eq!(session.variant_count(), 3);

        let replaced = session.upsert_variant(Variant::new("V1", brace("L100X10", 5000.0))).unwrap();
        assert!(replaced);
        assert_eq!(session.variant_count(), 3);
        assert_eq!(session.variants[0].name, "V1");
        match &session.variants[0].input {
            MemberInput::Brace(b) => assert_eq!(b.length_mm, 5000.0),
            other => panic!("unexpected input {:?}", other),
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut session = Session::new("Engineer", "frame.$2k");
        let err = session.upsert_variant(Variant::new("  ", column("HEB300"))).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
        assert_eq!(session.variant_count(), 0);
    }

    #[test]
    fn test_lookup_and_remove() {
        let mut session = Session::new("Engineer", "frame.$2k");
        session.upsert_variant(Variant::new("A", column("HEB300"))).unwrap();
        session.upsert_variant(Variant::new("B", column("HEA200"))).unwrap();
        session.upsert_variant(Variant::new("C", column("HEB300"))).unwrap();

        let names: Vec<&str> = session.variants_for_section("HEB300").map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert!(session.variant("HEA200", "B").is_some());
        assert!(session.variant("HEB300", "B").is_none());

        let removed = session.remove_variant("HEB300", "A").unwrap();
        assert_eq!(removed.name, "A");
        assert!(session.remove_variant("HEB300", "A").is_none());
        assert_eq!(session.variant_count(), 2);
    }

    #[test]
    fn test_result_summary() {
        let variant = Variant::new("A", column("HEB300"));
        assert_eq!(variant.result_summary(), "Not calculated");
    }

    #[test]
    fn test_resolved_model_path() {
        let session = Session::new("Engineer", "frame.$2k");
        assert_eq!(
            session.resolved_model_path(Path::new("/jobs/25-001/hinges.json")),
            Path::new("/jobs/25-001/frame.$2k")
        );
    }

    #[test]
    fn test_session_serialization() {
        let mut session = Session::new("Jane Engineer", "frame.$2k");
        session.upsert_variant(Variant::new("C1", column("HEB300"))).unwrap();
        let json = serde_json::to_string_pretty(&session).unwrap();
        assert!(json.contains("\"type\": \"Column\""));
        assert!(!json.contains("\"output\""));

        let roundtrip: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.variants, session.variants);
        assert_eq!(roundtrip.settings, HingeSettings::default());
    }

    #[test]
    fn test_settings_default_when_absent() {
        let json = r#"{
            "meta": {
                "version": "0.1.0",
                "engineer": "E",
                "created": "2025-01-01T00:00:00Z",
                "modified": "2025-01-01T00:00:00Z"
            },
            "model_path": "frame.$2k"
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.settings.elastic_modulus_mpa, 200_000.0);
        assert_eq!(session.variant_count(), 0);
    }
}
