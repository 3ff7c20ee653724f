//! Hinge parameter sets and their reference tables.
//!
//! Every hinge is described by six numbers: the backbone deformations `a`
//! and `b`, the residual strength ratio `c`, and the IO/LS/CP acceptance
//! deformations. [`HingeParameters`] carries one value per parameter and is
//! generic so the same shape holds the (ductile, non-ductile) reference pairs.

use serde::{Deserialize, Serialize};

/// One value per hinge parameter
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HingeParameters<T = f64> {
    pub a: T,
    pub b: T,
    pub c: T,
    pub io: T,
    pub ls: T,
    pub cp: T,
}

impl<T: Copy> HingeParameters<T> {
    /// Apply `f` to every parameter
    pub fn map<U>(&self, mut f: impl FnMut(T) -> U) -> HingeParameters<U> {
        HingeParameters {
            a: f(self.a),
            b: f(self.b),
            c: f(self.c),
            io: f(self.io),
            ls: f(self.ls),
            cp: f(self.cp),
        }
    }
}

impl HingeParameters<f64> {
    /// Multiply every parameter by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }
}

/// Reference values for a beam parameter: compact section vs. slender section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterPair {
    pub ductile: f64,
    pub non_ductile: f64,
}

impl ParameterPair {
    pub const fn new(ductile: f64, non_ductile: f64) -> Self {
        ParameterPair { ductile, non_ductile }
    }
}

/// Reference values for a brace/column compression parameter.
///
/// `stocky` is selected when KL/r ≥ 4.2√(E/Fy) and `slender` when
/// KL/r ≤ 2.1√(E/Fy).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlendernessPair {
    pub stocky: f64,
    pub slender: f64,
}

impl SlendernessPair {
    pub const fn new(stocky: f64, slender: f64) -> Self {
        SlendernessPair { stocky, slender }
    }
}

/// Beam flexural hinge table (moment M3)
pub const BEAM_TABLE: HingeParameters<ParameterPair> = HingeParameters {
    a: ParameterPair::new(9.0, 4.0),
    b: ParameterPair::new(11.0, 6.0),
    c: ParameterPair::new(0.6, 0.2),
    io: ParameterPair::new(1.0, 0.25),
    ls: ParameterPair::new(9.0, 3.0),
    cp: ParameterPair::new(11.0, 4.0),
};

/// Brace/column compression hinge table (axial P)
pub const COMPRESSION_TABLE: HingeParameters<SlendernessPair> = HingeParameters {
    a: SlendernessPair::new(1.0, 0.5),
    b: SlendernessPair::new(7.0, 9.0),
    c: SlendernessPair::new(0.5, 0.3),
    io: SlendernessPair::new(0.5, 0.5),
    ls: SlendernessPair::new(6.0, 7.0),
    cp: SlendernessPair::new(7.0, 9.0),
};

/// Brace/column tension constants, used until a geometric derivation exists
pub const DEFAULT_TENSION: HingeParameters = HingeParameters {
    a: 8.0,
    b: 9.0,
    c: 0.6,
    io: 0.5,
    ls: 7.0,
    cp: 9.0,
};
