//! The unit registry.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};
use uc_constants::{ConstantStore, MatchSpec};
use uc_core::{ensure_finite, BaseDim, DimVec, UcError, UcResult};

use crate::catalog::{derived_units, imported_constants};
use crate::parser::Resolve;
use crate::prefix::split_prefix;
use crate::UnitEntry;

/// Prefixes attach to the gram as well as to the seven base units.
const PREFIXABLE_GRAM: &str = "g";

/// Flat list of unit entries with a label index.
///
/// Prefixed forms (`km`, `MeV`) are not stored; [`UnitRegistry::lookup`]
/// synthesizes them on demand.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    entries: Vec<UnitEntry>,
    index: HashMap<String, usize>,
}

fn valid_label(label: &str) -> bool {
    let mut chars = label.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl UnitRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding SI base units, the derived-unit catalog and the
    /// constants from `store` that are exposed as units.
    pub fn seeded(store: &ConstantStore) -> Self {
        let mut registry = Self::new();
        registry.seed(store);
        registry
    }

    /// Add the built-in units to this registry. Entries whose label is
    /// already present are skipped.
    pub fn seed(&mut self, store: &ConstantStore) {
        let base = BaseDim::ALL
            .into_iter()
            .map(|d| UnitEntry::new(d.symbol(), d.unit_name(), DimVec::base(d)));
        let derived = derived_units().iter().map(|u| u.to_entry());
        for entry in base.chain(derived) {
            if let Err(err) = self.add_unit(entry) {
                warn!(%err, "skipped built-in unit");
            }
        }

        for imported in imported_constants() {
            let spec = MatchSpec::literal(imported.query);
            let dims = match store.find(&spec, imported.unit) {
                Ok(constant) => constant.si_dims(),
                Err(err) => {
                    warn!(label = imported.label, %err, "constant not available as a unit");
                    continue;
                }
            };
            if let Err(err) = self.add_unit(UnitEntry::new(imported.label, imported.name, dims)) {
                warn!(%err, "skipped constant unit");
            }
        }
        debug!(units = self.entries.len(), "seeded unit registry");
    }

    pub fn entries(&self) -> &[UnitEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `label` is stored verbatim (prefixed forms do not count).
    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    fn get(&self, label: &str) -> Option<&UnitEntry> {
        self.index.get(label).and_then(|&i| self.entries.get(i))
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.label.clone(), i))
            .collect();
    }

    pub fn add_unit(&mut self, entry: UnitEntry) -> UcResult<()> {
        if !valid_label(&entry.label) {
            return Err(UcError::InvalidArg {
                what: "unit label must start with a letter or '_' and contain no operators",
            });
        }
        let magnitude = ensure_finite(entry.dims.value(), "unit magnitude")?;
        if magnitude == 0.0 {
            return Err(UcError::InvalidArg {
                what: "unit magnitude must be nonzero",
            });
        }
        if self.contains(&entry.label) {
            return Err(UcError::DuplicateLabel {
                label: entry.label,
            });
        }
        // A label such as `cm` already names a prefixed base unit.
        if let Some(conflict) = self.shadow_conflict(&entry.label, &entry.dims) {
            warn!(%conflict, "unit shadows a prefixed base unit");
            return Err(UcError::DuplicateLabel {
                label: entry.label,
            });
        }
        self.index.insert(entry.label.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn del_unit(&mut self, label: &str) -> UcResult<UnitEntry> {
        let pos = self
            .index
            .get(label)
            .copied()
            .ok_or_else(|| UcError::UnknownUnit {
                label: label.to_string(),
            })?;
        let removed = self.entries.remove(pos);
        self.rebuild_index();
        Ok(removed)
    }

    /// Resolve a single label, stripping an SI prefix when the label itself
    /// is not registered.
    ///
    /// Exact labels win. Otherwise the longest prefix whose remainder is a
    /// registered label is applied, then shorter ones. A stored label that
    /// reads as a prefixed base unit (`fm`) is only admitted when it agrees
    /// with that prefixed form, so both readings give the same magnitude.
    ///
    /// The returned entry borrows the registry, so it cannot outlive a
    /// mutation:
    ///
    /// ```compile_fail
    /// use uc_constants::ConstantStore;
    /// use uc_units::UnitRegistry;
    ///
    /// let mut registry = UnitRegistry::seeded(&ConstantStore::seeded());
    /// let meter = registry.lookup("m").unwrap();
    /// registry.del_unit("m").unwrap();
    /// println!("{}", meter.label);
    /// ```
    pub fn lookup(&self, label: &str) -> UcResult<Cow<'_, UnitEntry>> {
        if let Some(entry) = self.get(label) {
            return Ok(Cow::Borrowed(entry));
        }
        for (prefix, rest) in split_prefix(label) {
            if let Some(entry) = self.get(rest) {
                return Ok(Cow::Owned(UnitEntry::new(
                    label,
                    format!("{}{}", prefix.name, entry.name),
                    entry.dims.with_pow10(prefix.exp10),
                )));
            }
        }
        Err(UcError::UnknownUnit {
            label: label.to_string(),
        })
    }

    /// Audit label uniqueness, index consistency and prefix shadowing.
    ///
    /// A stored label that reads as an SI prefix on a base unit (`fm`, `kg`)
    /// must carry the same dimension vector as that prefixed form.
    pub fn test_unique(&self) -> UcResult<()> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.label.as_str()) {
                return Err(UcError::InconsistentRegistry {
                    what: format!("duplicate label '{}'", entry.label),
                });
            }
        }

        if self.index.len() != self.entries.len()
            || self
                .index
                .iter()
                .any(|(label, &i)| self.entries.get(i).is_none_or(|e| &e.label != label))
        {
            return Err(UcError::InconsistentRegistry {
                what: "label index out of sync with entries".to_string(),
            });
        }

        for entry in &self.entries {
            if let Some(conflict) = self.shadow_conflict(&entry.label, &entry.dims) {
                return Err(UcError::InconsistentRegistry { what: conflict });
            }
        }
        Ok(())
    }

    /// When `label` reads as an SI prefix on a base unit or the gram, a
    /// description of the prefixed form it contradicts, if `dims` disagrees.
    fn shadow_conflict(&self, label: &str, dims: &DimVec) -> Option<String> {
        split_prefix(label).find_map(|(prefix, rest)| {
            let prefixable =
                rest == PREFIXABLE_GRAM || BaseDim::ALL.iter().any(|d| d.symbol() == rest);
            let base = self.get(rest).filter(|_| prefixable)?;
            let expected = base.dims.with_pow10(prefix.exp10);
            let agrees = dims.same_dims(&expected)
                && dims.ratio(&expected).is_ok_and(|r| (r - 1.0).abs() <= 1e-12);
            (!agrees).then(|| {
                format!(
                    "'{label}' is {dims} but {}{rest} is {expected}",
                    prefix.symbol
                )
            })
        })
    }
}

impl Resolve for UnitRegistry {
    fn resolve(&self, label: &str) -> UcResult<DimVec> {
        self.lookup(label).map(|entry| entry.dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> UnitRegistry {
        UnitRegistry::seeded(&ConstantStore::seeded())
    }

    #[test]
    fn seeded_registry_is_consistent() {
        let reg = registry();
        assert!(reg.len() > 40);
        reg.test_unique().unwrap();
        for label in ["m", "kg", "s", "K", "A", "mol", "cd", "g", "eV", "c", "hbar", "Msun"] {
            assert!(reg.contains(label), "missing {label}");
        }
    }

    #[test]
    fn exact_label_beats_prefix() {
        let reg = registry();
        let min = reg.lookup("min").unwrap();
        assert_eq!(min.dims.value(), 60.0);
        assert!(matches!(min, Cow::Borrowed(_)));
        // "pc" is the parsec, not pico-c.
        assert_eq!(reg.lookup("pc").unwrap().dims.exps(), [1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn prefix_is_synthesized() {
        let reg = registry();
        let km = reg.lookup("km").unwrap();
        assert!(matches!(km, Cow::Owned(_)));
        assert_eq!(km.name, "kilometer");
        assert_eq!(km.dims.exp10(), 3);
        assert_eq!(km.dims.ratio(&DimVec::base(BaseDim::Length)).unwrap(), 1000.0);

        let mg = reg.lookup("mg").unwrap();
        assert_eq!(mg.dims.exps(), [0, 1, 0, 0, 0, 0, 0]);
        assert_eq!(mg.dims.exp10(), -6);

        let mev = reg.lookup("MeV").unwrap();
        assert!(uc_core::rel_close(mev.dims.value(), 1.602_176_634e-13, 1e-15));
        assert_eq!(reg.lookup("kΩ").unwrap().dims.exp10(), 3);
    }

    #[test]
    fn deca_then_deci() {
        let reg = registry();
        assert_eq!(reg.lookup("dam").unwrap().dims.exp10(), 1);
        assert_eq!(reg.lookup("dm").unwrap().dims.exp10(), -1);
    }

    #[test]
    fn unknown_label() {
        let reg = registry();
        assert_eq!(
            reg.lookup("furlong").unwrap_err(),
            UcError::UnknownUnit {
                label: "furlong".into()
            }
        );
        // A bare prefix is not a unit.
        assert!(reg.lookup("k").is_err());
    }

    #[test]
    fn add_and_delete() {
        let mut reg = registry();
        let furlong = UnitEntry::new("furlong", "furlong", DimVec::new(1, 0, 0, 0, 0, 0, 0, 201.168));
        reg.add_unit(furlong.clone()).unwrap();
        assert_eq!(reg.lookup("furlong").unwrap().dims.value(), 201.168);
        assert_eq!(
            reg.add_unit(furlong),
            Err(UcError::DuplicateLabel {
                label: "furlong".into()
            })
        );
        reg.test_unique().unwrap();

        let removed = reg.del_unit("furlong").unwrap();
        assert_eq!(removed.label, "furlong");
        assert!(matches!(reg.del_unit("furlong"), Err(UcError::UnknownUnit { .. })));
        reg.test_unique().unwrap();
        // Index positions still line up after removal from the middle.
        reg.del_unit("eV").unwrap();
        reg.test_unique().unwrap();
        assert_eq!(reg.lookup("J").unwrap().label, "J");
    }

    #[test]
    fn rejects_bad_entries() {
        let mut reg = UnitRegistry::new();
        let dims = DimVec::base(BaseDim::Length);
        for label in ["", "2m", "m/s", "a b"] {
            assert!(matches!(
                reg.add_unit(UnitEntry::new(label, "", dims)),
                Err(UcError::InvalidArg { .. })
            ));
        }
        assert!(matches!(
            reg.add_unit(UnitEntry::new("zero", "", DimVec::dimensionless(0.0))),
            Err(UcError::InvalidArg { .. })
        ));
        assert!(matches!(
            reg.add_unit(UnitEntry::new("inf", "", DimVec::dimensionless(f64::INFINITY))),
            Err(UcError::NonFinite { .. })
        ));
        assert!(reg.is_empty());
    }

    #[test]
    fn inconsistent_shadow_of_a_prefix_is_rejected() {
        let mut reg = registry();
        let before = reg.len();
        assert_eq!(
            reg.add_unit(UnitEntry::new("cm", "not a centimeter", DimVec::base(BaseDim::Length))),
            Err(UcError::DuplicateLabel { label: "cm".into() })
        );
        assert!(matches!(
            reg.add_unit(UnitEntry::new("kg", "", DimVec::base(BaseDim::Mass))),
            Err(UcError::DuplicateLabel { .. })
        ));
        assert_eq!(reg.len(), before);
        let cm = reg.lookup("cm").unwrap();
        assert_eq!(cm.dims.ratio(&DimVec::base(BaseDim::Length)).unwrap(), 0.01);
        reg.test_unique().unwrap();
    }

    #[test]
    fn audit_catches_shadowing_after_the_base_changes() {
        let mut reg = registry();
        let cm = DimVec::base(BaseDim::Length).with_pow10(-2);
        reg.add_unit(UnitEntry::new("cm", "centimeter", cm)).unwrap();
        reg.del_unit("m").unwrap();
        reg.add_unit(UnitEntry::new("m", "double meter", DimVec::new(1, 0, 0, 0, 0, 0, 0, 2.0)))
            .unwrap();
        assert!(matches!(
            reg.test_unique(),
            Err(UcError::InconsistentRegistry { .. })
        ));
    }

    #[test]
    fn audit_accepts_consistent_shadowing() {
        let mut reg = registry();
        let cm = DimVec::base(BaseDim::Length).with_pow10(-2);
        reg.add_unit(UnitEntry::new("cm", "centimeter", cm)).unwrap();
        reg.test_unique().unwrap();
    }

    #[test]
    fn imported_constants_use_si_magnitudes() {
        let reg = registry();
        let c = reg.lookup("c").unwrap();
        assert_eq!(c.dims.exps(), [1, 0, -1, 0, 0, 0, 0]);
        assert_eq!(c.dims.value(), 299_792_458.0);
        let hbarc = reg.lookup("hbarc").unwrap();
        assert_eq!(hbarc.dims.exps(), [3, 1, -2, 0, 0, 0, 0]);
        assert!(uc_core::rel_close(
            hbarc.dims.value(),
            197.326_980_4 * 1.602_176_634e-28,
            1e-9
        ));
    }

    #[test]
    fn resolve_goes_through_lookup() {
        let reg = registry();
        assert_eq!(reg.resolve("ms").unwrap().exp10(), -3);
    }
}
