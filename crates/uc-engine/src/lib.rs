//! uc-engine: conversion engine for unitconv.
//!
//! Ties the registry, the constant store and the parser together:
//! - `Converter` (conversion, factor cache, natural units, pass-throughs)
//! - `UnitGraph` (breadth-first resolution of names the registry lacks)
//! - `Config` (YAML-loadable settings)
//!
//! # Example
//!
//! ```
//! use uc_engine::{Config, Converter};
//!
//! let mut conv = Converter::new(&Config::default());
//! assert_eq!(conv.convert("km", "m", 1.0).unwrap(), 1000.0);
//!
//! conv.set_natural_units(true, true, false);
//! let inv_fm = conv.convert("MeV", "fm^-1", 1.0).unwrap();
//! assert!((inv_fm * 197.326_980_4 - 1.0).abs() < 1e-9);
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod report;
pub mod search;

pub use cache::{CacheHit, ConversionCache};
pub use config::{Config, ConfigError};
pub use engine::{Converter, Sink};
pub use search::{GraphNode, NodeKind, UnitGraph};

// Types callers need alongside the converter
pub use uc_constants::{AddMode, ConstantEntry, MatchSpec};
pub use uc_core::{DimVec, NaturalUnits, Status, UcError, UcResult};
pub use uc_units::UnitEntry;
