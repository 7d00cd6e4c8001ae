//! uc-constants: named physical and mathematical constants for unitconv.
//!
//! Provides:
//! - Constant entries with aliases, unit strings and provenance
//! - A compiled-in catalog (CODATA 2018, exact SI 2019, IAU resolutions)
//! - `ConstantStore` with add/delete/find and unit-aware disambiguation
//! - `MatchSpec` for literal or regex name queries
//!
//! # Example
//!
//! ```
//! use uc_constants::{ConstantStore, MatchSpec};
//!
//! let store = ConstantStore::seeded();
//! let c = store.find_unique(&MatchSpec::literal("c"), "m/s").unwrap();
//! assert_eq!(c, 299_792_458.0);
//! ```

pub mod catalog;
pub mod entry;
pub mod matching;
pub mod store;

// Re-exports for ergonomics
pub use catalog::{catalog, CatalogConstant};
pub use entry::{ConstantEntry, UnitFlag};
pub use matching::{MatchSpec, NameMatch};
pub use store::{AddMode, ConstantStore};
