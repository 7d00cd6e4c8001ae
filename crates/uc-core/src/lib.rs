//! uc-core: stable foundation for unitconv.
//!
//! Contains:
//! - dims (seven-exponent dimension vectors with exact decimal scaling)
//! - natural (natural-units flags and the projection they induce)
//! - numeric (Real, relative closeness, power-of-ten helpers)
//! - error (shared error type and nothrow status codes)

pub mod dims;
pub mod error;
pub mod natural;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use dims::{BaseDim, DimVec};
pub use error::{Status, UcError, UcResult};
pub use natural::{NaturalUnits, Projected, UnityValues};
pub use numeric::*;
