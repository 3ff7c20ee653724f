//! Category tags
//!
//! A category combines the member role with the cross-section shape, written
//! `{Role}-{Shape}-Section` (e.g. `Beam-I-Section`, `Brace-Tube-Section`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;
use crate::sections::ShapeKind;

/// Structural role of the member the hinge is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberRole {
    Beam,
    Brace,
    Column,
}

impl MemberRole {
    pub const ALL: [MemberRole; 3] = [MemberRole::Beam, MemberRole::Brace, MemberRole::Column];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Beam => "Beam",
            MemberRole::Brace => "Brace",
            MemberRole::Column => "Column",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beam" => Ok(MemberRole::Beam),
            "brace" => Ok(MemberRole::Brace),
            "column" => Ok(MemberRole::Column),
            _ => Err(CalcError::invalid_input("role", s, "Expected Beam, Brace or Column")),
        }
    }
}

/// Role and shape of a section variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    pub role: MemberRole,
    pub shape: ShapeKind,
}

impl Category {
    pub fn new(role: MemberRole, shape: ShapeKind) -> Self {
        Category { role, shape }
    }

    /// All role/shape combinations, grouped by role
    pub fn all() -> Vec<Category> {
        MemberRole::ALL
            .iter()
            .flat_map(|role| ShapeKind::ALL.iter().map(move |shape| Category::new(*role, *shape)))
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-Section", self.role, self.shape)
    }
}

impl FromStr for Category {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (role, shape) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| CalcError::invalid_input("category", s, "Expected '{Role}-{Shape}-Section'"))?;
        Ok(Category::new(role.parse()?, shape.parse()?))
    }
}

impl Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
