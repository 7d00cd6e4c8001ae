use crate::UcError;

/// Floating point type used throughout system
pub type Real = f64;

/// Relative agreement; SI magnitudes sit far below any sane absolute floor.
pub fn rel_close(a: Real, b: Real, rel: Real) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, UcError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(UcError::NonFinite { what, value: v })
    }
}

/// Correctly rounded powers of ten covering the SI prefix range and a margin.
const POW10_SMALL: [Real; 65] = [
    1e-32, 1e-31, 1e-30, 1e-29, 1e-28, 1e-27, 1e-26, 1e-25, 1e-24, 1e-23, 1e-22, 1e-21, 1e-20,
    1e-19, 1e-18, 1e-17, 1e-16, 1e-15, 1e-14, 1e-13, 1e-12, 1e-11, 1e-10, 1e-9, 1e-8, 1e-7, 1e-6,
    1e-5, 1e-4, 1e-3, 1e-2, 1e-1, 1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11,
    1e12, 1e13, 1e14, 1e15, 1e16, 1e17, 1e18, 1e19, 1e20, 1e21, 1e22, 1e23, 1e24, 1e25, 1e26,
    1e27, 1e28, 1e29, 1e30, 1e31, 1e32,
];

/// `10^n` as an `f64`.
///
/// Within `|n| <= 32` the result is bit-identical to the literal `1eN`.
pub fn pow10(n: i32) -> Real {
    if (-32..=32).contains(&n) {
        POW10_SMALL[(n + 32) as usize]
    } else {
        10f64.powi(n)
    }
}
