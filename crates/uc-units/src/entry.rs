use core::fmt;

use uc_core::DimVec;

/// A registered unit: unique label, human-readable name, and its dimension vector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitEntry {
    pub label: String,
    pub name: String,
    pub dims: DimVec,
}

impl UnitEntry {
    pub fn new(label: impl Into<String>, name: impl Into<String>, dims: DimVec) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            dims,
        }
    }
}

impl fmt::Display for UnitEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} = {}", self.label, self.dims)
        } else {
            write!(f, "{} ({}) = {}", self.label, self.name, self.dims)
        }
    }
}
