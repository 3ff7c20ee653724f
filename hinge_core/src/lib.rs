//! # hinge_core - Nonlinear Hinge Parameter Engine
//!
//! `hinge_core` derives plastic-hinge parameters for structural steel beams,
//! braces and columns, and writes them into the hinge tables of an analysis
//! program's text model file. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure calculations**: `evaluate` functions take fetched geometry and return results
//! - **Lookup at the seam**: section properties come through [`sections::SectionSource`]
//! - **Byte-preserving writes**: only the hinge lines of a model file ever change
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use hinge_core::calculations::{calculate, BraceInput, MemberInput};
//! use hinge_core::hinge::{HingeRecord, HingeTable};
//! use hinge_core::sections::{SectionCatalog, ShapeKind};
//! use hinge_core::settings::HingeSettings;
//!
//! let input = MemberInput::Brace(BraceInput {
//!     section_name: "L100X10".to_string(),
//!     shape: ShapeKind::Angle,
//!     length_mm: 4200.0,
//!     unbraced_length_minor_mm: 2100.0,
//!     unbraced_length_major_mm: 4200.0,
//!     fy_mpa: 355.0,
//! });
//!
//! let output = calculate(&input, &SectionCatalog::builtin(), &HingeSettings::default()).unwrap();
//! let record = HingeRecord::from_output(&output).unwrap();
//! assert_eq!(record.lines_for(HingeTable::ForceDeform, "BR-1").len(), 9);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - beam, brace and column hinge calculators
//! - [`sections`] - section geometry, lookup trait and catalog
//! - [`hinge`] - hinge records and model file patching
//! - [`session`] - variant collection and metadata
//! - [`batch`] - calculate-and-write over a whole session
//! - [`export`] - per-role results tables
//! - [`file_io`] - atomic writes, locking, session persistence
//! - [`errors`] - structured error types

pub mod batch;
pub mod calculations;
pub mod errors;
pub mod export;
pub mod file_io;
pub mod hinge;
pub mod sections;
pub mod session;
pub mod settings;

// Re-export commonly used types at crate root for convenience
pub use batch::{run_batch, BatchSummary};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_session, save_session, FileLock};
pub use session::{Session, Variant};
pub use settings::HingeSettings;
