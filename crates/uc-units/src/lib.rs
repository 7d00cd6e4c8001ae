//! uc-units: unit registry and expression parser for unitconv.
//!
//! Provides:
//! - SI prefix table (resolved at lookup time, never stored)
//! - `UnitRegistry` seeded with SI base units, derived units and selected
//!   physical constants
//! - A recursive-descent parser turning unit expressions into `DimVec`s
//!
//! # Example
//!
//! ```
//! use uc_constants::ConstantStore;
//! use uc_units::{parse_expr, UnitRegistry};
//!
//! let registry = UnitRegistry::seeded(&ConstantStore::seeded());
//! let km = parse_expr("km", &registry).unwrap();
//! let m = parse_expr("m", &registry).unwrap();
//! assert_eq!(km.ratio(&m).unwrap(), 1000.0);
//!
//! let accel = parse_expr("m/s^2", &registry).unwrap();
//! assert_eq!(accel.exps(), [1, 0, -2, 0, 0, 0, 0]);
//! ```

pub mod catalog;
pub mod entry;
pub mod lexer;
pub mod parser;
pub mod prefix;
pub mod registry;

// Re-exports for ergonomics
pub use catalog::{derived_units, imported_constants, DerivedUnit, ImportedConstant};
pub use entry::UnitEntry;
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse_expr, Resolve};
pub use prefix::{prefixes, split_prefix, SiPrefix};
pub use registry::UnitRegistry;
