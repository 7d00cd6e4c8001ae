//! Constant entries.

use uc_core::{BaseDim, DimVec, Real, UcError, UcResult};

/// How a constant's unit string relates to the unit registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum UnitFlag {
    /// The unit is one of the seven SI base units.
    SiBase = 1,
    /// The unit is a single recognized derived label (e.g. `C`, `J`).
    Derived = 2,
    /// The unit is a compound expression (e.g. `m/s`, `J.s`).
    Expression = 3,
    /// No unit.
    Unitless = 4,
}

impl UnitFlag {
    /// Classify a unit string by its shape.
    pub fn classify(unit: &str) -> Self {
        let unit = unit.trim();
        if unit.is_empty() {
            UnitFlag::Unitless
        } else if BaseDim::ALL.iter().any(|d| d.symbol() == unit) {
            UnitFlag::SiBase
        } else if unit.chars().all(|c| c.is_alphabetic() || c == '_') {
            UnitFlag::Derived
        } else {
            UnitFlag::Expression
        }
    }
}

/// A named constant.
///
/// `names[0]` is the canonical name; the rest are aliases. `dims` is the SI
/// decomposition of one `unit` (its exponents, and the value of one `unit` in
/// SI base units), so the SI value of the constant is `value * dims.value()`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstantEntry {
    pub names: Vec<String>,
    pub unit: String,
    pub unit_flag: UnitFlag,
    pub dims: DimVec,
    pub value: Real,
    pub source: String,
}

impl ConstantEntry {
    pub fn new<I, S>(
        names: I,
        unit: impl Into<String>,
        dims: DimVec,
        value: Real,
        source: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unit = unit.into();
        Self {
            names: names.into_iter().map(Into::into).collect(),
            unit_flag: UnitFlag::classify(&unit),
            unit,
            dims,
            value,
            source: source.into(),
        }
    }

    pub fn canonical(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("")
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Value in SI base units.
    pub fn si_value(&self) -> Real {
        self.value * self.dims.value()
    }

    /// The constant itself as a dimension vector in SI base units.
    pub fn si_dims(&self) -> DimVec {
        DimVec::from_exps(self.dims.exps(), self.value * self.dims.mantissa())
            .with_pow10(self.dims.exp10())
    }

    pub(crate) fn validate(&self) -> UcResult<()> {
        if self.names.is_empty() || self.names.iter().any(|n| n.trim().is_empty()) {
            return Err(UcError::InvalidArg {
                what: "constant names must be non-empty",
            });
        }
        uc_core::ensure_finite(self.value, "constant value")?;
        uc_core::ensure_finite(self.dims.value(), "constant unit magnitude")?;
        Ok(())
    }
}
