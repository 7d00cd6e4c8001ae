//! Natural-units projection.
//!
//! Setting a constant to one identifies two otherwise independent dimensions.
//! Each active flag eliminates one base dimension by substituting the SI
//! dimensions of its constant, always in the order k_B, ħ, c:
//!
//! | flag          | identity          | eliminated | substitution            |
//! |---------------|-------------------|------------|-------------------------|
//! | `kb_is_one`   | `K = kg m^2 s^-2` | K          | `kg += K, m += 2K, s -= 2K` |
//! | `hbar_is_one` | `kg = m^-2 s`     | kg         | `m -= 2kg, s += kg`     |
//! | `c_is_one`    | `s = m`           | s          | `m += s`                |
//!
//! A substitution only introduces dimensions that are eliminated later in the
//! order (or never), so the projected exponents are a canonical representative
//! of the quotient space.

use crate::dims::{BaseDim, DimVec};
use crate::numeric::Real;
use crate::{UcError, UcResult};

const M: usize = BaseDim::Length as usize;
const KG: usize = BaseDim::Mass as usize;
const S: usize = BaseDim::Time as usize;
const K: usize = BaseDim::Temperature as usize;

/// Natural-units flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NaturalUnits {
    pub c_is_one: bool,
    pub hbar_is_one: bool,
    pub kb_is_one: bool,
}

/// SI values of the constants that natural units set to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnityValues {
    /// Speed of light in m/s.
    pub c: Real,
    /// Reduced Planck constant in J s.
    pub hbar: Real,
    /// Boltzmann constant in J/K.
    pub kb: Real,
}

/// A dimension vector after projection, with the powers of each unity
/// constant that were absorbed into its magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub exps: [i32; 7],
    pub value: Real,
    pub kb_power: i32,
    pub hbar_power: i32,
    pub c_power: i32,
}

impl NaturalUnits {
    pub fn new(c_is_one: bool, hbar_is_one: bool, kb_is_one: bool) -> Self {
        Self {
            c_is_one,
            hbar_is_one,
            kb_is_one,
        }
    }

    pub fn any(&self) -> bool {
        self.c_is_one || self.hbar_is_one || self.kb_is_one
    }

    /// Project exponents only; `None` if a projected exponent leaves the
    /// `i32` range.
    pub fn project_exps(&self, exps: [i32; 7]) -> Option<[i32; 7]> {
        self.project_with_powers(exps).map(|(e, ..)| e)
    }

    fn project_with_powers(&self, exps: [i32; 7]) -> Option<([i32; 7], i32, i32, i32)> {
        let mut e = exps.map(i64::from);
        let (mut kb_power, mut hbar_power, mut c_power) = (0, 0, 0);
        if self.kb_is_one {
            let t = e[K];
            e[KG] += t;
            e[M] += 2 * t;
            e[S] -= 2 * t;
            e[K] = 0;
            kb_power = t;
        }
        if self.hbar_is_one {
            let mass = e[KG];
            e[M] -= 2 * mass;
            e[S] += mass;
            e[KG] = 0;
            hbar_power = -mass;
        }
        if self.c_is_one {
            let time = e[S];
            e[M] += time;
            e[S] = 0;
            c_power = time;
        }
        let mut out = [0; 7];
        for (slot, v) in out.iter_mut().zip(e) {
            *slot = i32::try_from(v).ok()?;
        }
        Some((
            out,
            i32::try_from(kb_power).ok()?,
            i32::try_from(hbar_power).ok()?,
            i32::try_from(c_power).ok()?,
        ))
    }

    /// Project a dimension vector, folding the absorbed constants into its
    /// magnitude: `value * kb^kb_power * hbar^hbar_power * c^c_power`.
    pub fn project(&self, dv: &DimVec, unity: &UnityValues) -> UcResult<Projected> {
        let (exps, kb_power, hbar_power, c_power) = self
            .project_with_powers(dv.exps())
            .ok_or(UcError::InvalidArg {
                what: "projected exponent out of range",
            })?;
        let mut value = dv.value();
        if kb_power != 0 {
            value *= unity.kb.powi(kb_power);
        }
        if hbar_power != 0 {
            value *= unity.hbar.powi(hbar_power);
        }
        if c_power != 0 {
            value *= unity.c.powi(c_power);
        }
        Ok(Projected {
            exps,
            value,
            kb_power,
            hbar_power,
            c_power,
        })
    }
}
