//! # Batch Runner
//!
//! Calculates every variant of a session in order and writes each hinge into
//! the model file:
//!
//! ```text
//! validate -> fetch -> calculate -> build record -> patch -> export
//! ```
//!
//! A failing variant is recorded and the batch moves on. Export failures are
//! logged only; the hinge is already in the model file at that point.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::calculations::calculate;
use crate::errors::CalcError;
use crate::export::ResultsSink;
use crate::hinge::{patch, HingeRecord};
use crate::sections::SectionSource;
use crate::session::Session;

/// Where a variant failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureStage {
    /// Input validation, section lookup or calculation
    Calculation,
    /// Writing the hinge into the model file
    Patch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantFailure {
    pub variant: String,
    pub section_name: String,
    pub stage: FailureStage,
    pub error: CalcError,
}

/// Outcome of one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    /// Variants calculated and written into the model file
    pub succeeded: usize,
    /// Variants calculated without a hinge to write (columns with unresolved radii)
    #[serde(default)]
    pub unwritten: Vec<String>,
    pub failures: Vec<VariantFailure>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary_line(&self) -> String {
        let mut line = format!("{} of {} variants calculated and written", self.succeeded, self.total);
        if !self.unwritten.is_empty() {
            line.push_str(&format!(", {} calculated without a hinge", self.unwritten.len()));
        }
        line
    }
}

/// Calculate and write every variant of `session` into `model_file`.
///
/// Each successful calculation is stored on its variant, even when the
/// patch that follows fails. A failed calculation clears the stored output.
pub fn run_batch<S: SectionSource + ?Sized>(
    session: &mut Session,
    source: &S,
    model_file: &Path,
    sink: &mut dyn ResultsSink,
) -> BatchSummary {
    let mut summary = BatchSummary {
        total: session.variants.len(),
        ..Default::default()
    };
    warn_on_shared_hinge_names(session);

    let settings_error = session.settings.validate().err();
    let settings = session.settings.clone();

    for variant in session.variants.iter_mut() {
        let name = variant.name.clone();
        let section_name = variant.section_name().to_string();
        let mut fail = |stage: FailureStage, error: CalcError| {
            error!(
                variant = %name,
                section = %section_name,
                ?stage,
                code = error.error_code(),
                "{}",
                error
            );
            summary.failures.push(VariantFailure {
                variant: name.clone(),
                section_name: section_name.clone(),
                stage,
                error,
            });
        };

        let calculated = match &settings_error {
            Some(e) => Err(e.clone()),
            None => variant
                .input
                .validate()
                .and_then(|_| calculate(&variant.input, source, &settings)),
        };
        let output = match calculated {
            Ok(output) => output,
            Err(e) => {
                fail(FailureStage::Calculation, e);
                variant.output = None;
                continue;
            }
        };

        let written = match HingeRecord::from_output(&output) {
            Some(record) => match patch(model_file, &variant.name, &record) {
                Ok(_) => true,
                Err(e) => {
                    fail(FailureStage::Patch, e);
                    variant.output = Some(output);
                    continue;
                }
            },
            None => {
                warn!(variant = %variant.name, "no hinge to write, model file left as is");
                false
            }
        };

        if let Err(e) = sink.export(variant, &output) {
            warn!(variant = %variant.name, error = %e, "results export failed");
        }

        variant.output = Some(output);
        if written {
            summary.succeeded += 1;
        } else {
            summary.unwritten.push(variant.name.clone());
        }
    }

    session.touch();
    info!(
        model = %model_file.display(),
        failed = summary.failures.len(),
        "{}",
        summary.summary_line()
    );
    summary
}

/// Hinge names come from variant names, so two sections sharing a variant
/// name overwrite each other's hinge in the model file.
fn warn_on_shared_hinge_names(session: &Session) {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for variant in &session.variants {
        if let Some(first) = seen.insert(variant.name.as_str(), variant.section_name()) {
            if first != variant.section_name() {
                warn!(
                    hinge = %variant.name,
                    first_section = first,
                    section = variant.section_name(),
                    "hinge name used by more than one section, last one wins"
                );
            }
        }
    }
}
