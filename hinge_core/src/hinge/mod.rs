//! # Hinge Records
//!
//! Turning a calculation result into model file text:
//!
//! - [`record`] - the 13 lines (general, backbone, acceptance) for one hinge
//! - [`document`] - table-aware, byte-preserving model text
//! - [`patcher`] - locked, atomic upsert of a record into a file on disk

pub mod document;
pub mod patcher;
pub mod record;

pub use document::{ModelDocument, UpsertReport};
pub use patcher::{patch, s2k_path_for, PatchReport};
pub use record::{validate_hinge_name, HingeRecord, HingeTable};
