//! Dimension vectors: seven SI exponents plus a magnitude.
//!
//! The magnitude is kept as an `f64` mantissa times an integer power of ten.
//! SI prefixes only ever touch the decimal exponent, so prefix arithmetic
//! (`km` against `m`, `m^2` against `cm^2`) stays exact.

use core::fmt;

use crate::natural::NaturalUnits;
use crate::numeric::{pow10, Real};
use crate::{UcError, UcResult};

/// The seven SI base dimensions, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaseDim {
    Length,
    Mass,
    Time,
    Temperature,
    Current,
    Amount,
    Luminosity,
}

impl BaseDim {
    pub const ALL: [BaseDim; 7] = [
        BaseDim::Length,
        BaseDim::Mass,
        BaseDim::Time,
        BaseDim::Temperature,
        BaseDim::Current,
        BaseDim::Amount,
        BaseDim::Luminosity,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// SI base unit label for this dimension.
    pub fn symbol(self) -> &'static str {
        match self {
            BaseDim::Length => "m",
            BaseDim::Mass => "kg",
            BaseDim::Time => "s",
            BaseDim::Temperature => "K",
            BaseDim::Current => "A",
            BaseDim::Amount => "mol",
            BaseDim::Luminosity => "cd",
        }
    }

    pub fn unit_name(self) -> &'static str {
        match self {
            BaseDim::Length => "meter",
            BaseDim::Mass => "kilogram",
            BaseDim::Time => "second",
            BaseDim::Temperature => "kelvin",
            BaseDim::Current => "ampere",
            BaseDim::Amount => "mole",
            BaseDim::Luminosity => "candela",
        }
    }
}

impl fmt::Display for BaseDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A dimension vector: exponents over `(m, kg, s, K, A, mol, cd)` and the
/// value of one unit of that compound dimension in SI base units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimVec {
    exps: [i32; 7],
    mant: Real,
    exp10: i32,
}

impl DimVec {
    #[allow(clippy::too_many_arguments)]
    pub fn new(m: i32, kg: i32, s: i32, k: i32, a: i32, mol: i32, cd: i32, val: Real) -> Self {
        Self::from_exps([m, kg, s, k, a, mol, cd], val)
    }

    pub fn from_exps(exps: [i32; 7], val: Real) -> Self {
        Self {
            exps,
            mant: val,
            exp10: 0,
        }
    }

    pub fn dimensionless(val: Real) -> Self {
        Self::from_exps([0; 7], val)
    }

    /// The SI base unit of `dim` (one exponent set, magnitude 1).
    pub fn base(dim: BaseDim) -> Self {
        let mut exps = [0; 7];
        exps[dim.index()] = 1;
        Self::from_exps(exps, 1.0)
    }

    /// Scale the magnitude by `10^n` without touching the mantissa.
    ///
    /// Saturates at the `i32` limits; such magnitudes are not finite anyway.
    pub fn with_pow10(mut self, n: i32) -> Self {
        self.exp10 = self.exp10.saturating_add(n);
        self
    }

    pub fn exps(&self) -> [i32; 7] {
        self.exps
    }

    pub fn exp(&self, dim: BaseDim) -> i32 {
        self.exps[dim.index()]
    }

    pub fn mantissa(&self) -> Real {
        self.mant
    }

    pub fn exp10(&self) -> i32 {
        self.exp10
    }

    /// Magnitude as a single `f64`.
    pub fn value(&self) -> Real {
        self.mant * pow10(self.exp10)
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exps.iter().all(|&e| e == 0)
    }

    /// Exponent equality, ignoring magnitudes and natural units.
    pub fn same_dims(&self, other: &DimVec) -> bool {
        self.exps == other.exps
    }

    /// Exponent equality after the projection selected by `flags`.
    ///
    /// A vector whose projection leaves the `i32` range is compatible with
    /// nothing.
    pub fn compatible(&self, other: &DimVec, flags: NaturalUnits) -> bool {
        match (flags.project_exps(self.exps), flags.project_exps(other.exps)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Fails with `InvalidArg` if an exponent leaves the `i32` range.
    pub fn multiply(&self, other: &DimVec) -> UcResult<DimVec> {
        Ok(DimVec {
            exps: combine(self.exps, other.exps, 1)?,
            mant: self.mant * other.mant,
            exp10: narrow(i64::from(self.exp10) + i64::from(other.exp10))?,
        })
    }

    pub fn divide(&self, other: &DimVec) -> UcResult<DimVec> {
        if other.mant == 0.0 {
            return Err(UcError::DivisionByZero {
                what: format!("division by {other}"),
            });
        }
        Ok(DimVec {
            exps: combine(self.exps, other.exps, -1)?,
            mant: self.mant / other.mant,
            exp10: narrow(i64::from(self.exp10) - i64::from(other.exp10))?,
        })
    }

    pub fn pow_int(&self, n: i32) -> UcResult<DimVec> {
        let wide = i64::from(n);
        let mut exps = [0; 7];
        for (slot, &e) in exps.iter_mut().zip(&self.exps) {
            *slot = narrow(i64::from(e) * wide)?;
        }
        Ok(DimVec {
            exps,
            mant: self.mant.powi(n),
            exp10: narrow(i64::from(self.exp10) * wide)?,
        })
    }

    /// Raise to `p/q`; every exponent must stay integral.
    pub fn pow_rational(&self, p: i32, q: i32) -> UcResult<DimVec> {
        if q == 0 {
            return Err(UcError::InvalidArg {
                what: "zero denominator in rational exponent",
            });
        }
        // Keep the sign on the numerator.
        let (p, q) = if q < 0 {
            (-i64::from(p), -i64::from(q))
        } else {
            (i64::from(p), i64::from(q))
        };
        if q == 1 {
            return self.pow_int(narrow(p)?);
        }
        if self.exps.iter().any(|&e| i64::from(e) * p % q != 0) {
            return Err(UcError::FractionalExponent {
                num: narrow(p)?,
                den: narrow(q)?,
            });
        }
        let ratio = p as Real / q as Real;
        let shifted = i64::from(self.exp10) * p;
        let (mant, exp10) = if shifted % q == 0 {
            (self.mant.powf(ratio), narrow(shifted / q)?)
        } else {
            (self.value().powf(ratio), 0)
        };
        let mut exps = [0; 7];
        for (slot, &e) in exps.iter_mut().zip(&self.exps) {
            *slot = narrow(i64::from(e) * p / q)?;
        }
        Ok(DimVec { exps, mant, exp10 })
    }

    /// `self.value() / other.value()` with the decimal exponents cancelled first.
    pub fn ratio(&self, other: &DimVec) -> UcResult<Real> {
        if other.mant == 0.0 {
            return Err(UcError::DivisionByZero {
                what: format!("ratio against {other}"),
            });
        }
        let shift = (i64::from(self.exp10) - i64::from(other.exp10))
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX));
        Ok(self.mant / other.mant * pow10(shift as i32))
    }
}

/// Narrow an exponent computed in `i64` back to storage width.
fn narrow(v: i64) -> UcResult<i32> {
    i32::try_from(v).map_err(|_| UcError::InvalidArg {
        what: "dimension exponent out of range",
    })
}

fn combine(a: [i32; 7], b: [i32; 7], sign: i64) -> UcResult<[i32; 7]> {
    let mut out = [0; 7];
    for ((slot, x), y) in out.iter_mut().zip(a).zip(b) {
        *slot = narrow(i64::from(x) + sign * i64::from(y))?;
    }
    Ok(out)
}

impl fmt::Display for DimVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())?;
        for dim in BaseDim::ALL {
            match self.exp(dim) {
                0 => {}
                1 => write!(f, " {}", dim.symbol())?,
                e => write!(f, " {}^{}", dim.symbol(), e)?,
            }
        }
        Ok(())
    }
}
