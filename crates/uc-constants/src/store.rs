//! The constant store.
//!
//! Entries live in a flat vector in insertion order. A secondary index maps
//! each lowercased name (canonical or alias) to the positions of the entries
//! carrying it; it is rebuilt after every mutation.

use std::collections::HashMap;

use tracing::debug;
use uc_core::{rel_close, Real, UcError, UcResult};

use crate::catalog::catalog;
use crate::entry::ConstantEntry;
use crate::matching::{MatchSpec, NameMatch, NameMatcher};

/// Relative spread within which a merged entry counts as the same value.
const MERGE_AGREEMENT: Real = 1e-12;

/// What `add_constant_with` does when the new entry collides with an old one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddMode {
    /// Any collision is a `DuplicateConstant` error.
    #[default]
    Reject,
    /// A collision with an entry of the same canonical name, unit and value
    /// merges the new names into the old entry as aliases. Other collisions
    /// still fail.
    MergeAliases,
}

#[derive(Debug, Clone, Default)]
pub struct ConstantStore {
    entries: Vec<ConstantEntry>,
    index: HashMap<String, Vec<usize>>,
}

/// Unit strings that select SI values rather than filter by unit.
fn is_si_request(unit: &str) -> bool {
    matches!(unit, "si" | "SI" | "mks" | "MKS")
}

impl ConstantStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the compiled-in catalog.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.entries = catalog().iter().map(|c| c.to_entry()).collect();
        store.rebuild_index();
        store
    }

    pub fn entries(&self) -> &[ConstantEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, entry) in self.entries.iter().enumerate() {
            for name in &entry.names {
                let slot = self.index.entry(name.to_lowercase()).or_default();
                if !slot.contains(&i) {
                    slot.push(i);
                }
            }
        }
    }

    pub fn add_constant(&mut self, entry: ConstantEntry) -> UcResult<()> {
        self.add_constant_with(entry, AddMode::Reject)
    }

    pub fn add_constant_with(&mut self, entry: ConstantEntry, mode: AddMode) -> UcResult<()> {
        entry.validate()?;

        let collision = self.entries.iter().position(|old| {
            old.canonical() == entry.canonical()
                || (old.unit == entry.unit && entry.names.iter().any(|n| old.has_name(n)))
        });

        if let Some(pos) = collision {
            let old = &mut self.entries[pos];
            let mergeable = mode == AddMode::MergeAliases
                && old.canonical() == entry.canonical()
                && old.unit == entry.unit
                && rel_close(old.value, entry.value, MERGE_AGREEMENT);
            if !mergeable {
                debug!(name = entry.canonical(), unit = %entry.unit, "rejected duplicate constant");
                return Err(UcError::DuplicateConstant {
                    name: entry.canonical().to_string(),
                    unit: entry.unit.clone(),
                });
            }
            for name in entry.names {
                if !old.has_name(&name) {
                    old.names.push(name);
                }
            }
            debug!(name = old.canonical(), "merged constant aliases");
        } else {
            debug!(name = entry.canonical(), unit = %entry.unit, "added constant");
            self.entries.push(entry);
        }
        self.rebuild_index();
        Ok(())
    }

    /// Remove the first entry (in storage order) carrying `name` as its
    /// canonical name or as an alias.
    pub fn del_constant(&mut self, name: &str) -> UcResult<ConstantEntry> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.has_name(name))
            .ok_or_else(|| UcError::UnknownConstant {
                name: name.to_string(),
                unit: String::new(),
            })?;
        let removed = self.entries.remove(pos);
        self.rebuild_index();
        debug!(name = removed.canonical(), "deleted constant");
        Ok(removed)
    }

    /// Entries whose names match `spec`, ignoring units.
    ///
    /// Literal queries return the exact-case matches when there are any and
    /// the case-insensitive ones otherwise.
    pub fn name_matches(&self, spec: &MatchSpec) -> UcResult<Vec<&ConstantEntry>> {
        let matcher = spec.compile()?;
        let candidates: Vec<usize> = match (&matcher, spec) {
            (NameMatcher::Literal(_), MatchSpec::Literal(q)) => self
                .index
                .get(&q.trim().to_lowercase())
                .cloned()
                .unwrap_or_default(),
            _ => (0..self.entries.len()).collect(),
        };

        let graded: Vec<(NameMatch, &ConstantEntry)> = candidates
            .into_iter()
            .map(|i| &self.entries[i])
            .map(|e| (matcher.best(&e.names), e))
            .filter(|(q, _)| *q != NameMatch::None)
            .collect();

        let best = graded
            .iter()
            .map(|(q, _)| *q)
            .max()
            .unwrap_or(NameMatch::None);
        Ok(graded
            .into_iter()
            .filter(|(q, _)| *q == best)
            .map(|(_, e)| e)
            .collect())
    }

    /// Entries whose names match `spec` and whose unit string equals `unit`.
    ///
    /// An empty `unit`, or one of `si`/`mks`, accepts every unit.
    pub fn matches(&self, spec: &MatchSpec, unit: &str) -> UcResult<Vec<&ConstantEntry>> {
        let unit = unit.trim();
        let by_name = self.name_matches(spec)?;
        if unit.is_empty() || is_si_request(unit) {
            return Ok(by_name);
        }
        Ok(by_name.into_iter().filter(|e| e.unit == unit).collect())
    }

    /// The single entry matching `spec` and `unit`.
    ///
    /// When several match, an entry whose canonical name is the literal query
    /// wins if it is the only such entry.
    pub fn find(&self, spec: &MatchSpec, unit: &str) -> UcResult<&ConstantEntry> {
        let found = self.matches(spec, unit)?;
        pick_unique(found, spec, unit)
    }

    /// Value of the single matching entry, in its own unit, or in SI base
    /// units when `unit` is `si`/`mks`.
    pub fn find_unique(&self, spec: &MatchSpec, unit: &str) -> UcResult<Real> {
        let entry = self.find(spec, unit)?;
        if is_si_request(unit.trim()) {
            Ok(entry.si_value())
        } else {
            Ok(entry.value)
        }
    }
}

pub(crate) fn pick_unique<'a>(
    found: Vec<&'a ConstantEntry>,
    spec: &MatchSpec,
    unit: &str,
) -> UcResult<&'a ConstantEntry> {
    match found.len() {
        0 => Err(UcError::UnknownConstant {
            name: spec.pattern().to_string(),
            unit: unit.to_string(),
        }),
        1 => Ok(found[0]),
        count => {
            if let MatchSpec::Literal(q) = spec {
                let q = q.trim();
                let canonical: Vec<&ConstantEntry> =
                    found.iter().copied().filter(|e| e.canonical() == q).collect();
                if canonical.len() == 1 {
                    return Ok(canonical[0]);
                }
            }
            Err(UcError::AmbiguousConstant {
                name: spec.pattern().to_string(),
                unit: unit.to_string(),
                count,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uc_core::DimVec;

    fn widget() -> ConstantEntry {
        ConstantEntry::new(
            ["widget", "wdg"],
            "m",
            DimVec::new(1, 0, 0, 0, 0, 0, 0, 1.0),
            2.5,
            "test",
        )
    }

    #[test]
    fn seeded_store_has_catalog() {
        let store = ConstantStore::seeded();
        assert_eq!(store.len(), catalog().len());
        assert!(!store.is_empty());
    }

    #[test]
    fn find_exact_name_and_unit() {
        let store = ConstantStore::seeded();
        let h = store.find_unique(&MatchSpec::literal("h"), "J.s").unwrap();
        assert_eq!(h, 6.626_070_15e-34);
    }

    #[test]
    fn find_hbar_in_mev_fm() {
        let store = ConstantStore::seeded();
        let v = store
            .find_unique(&MatchSpec::literal("hbar"), "MeV.fm")
            .unwrap();
        assert!(uc_core::rel_close(v, 197.326_980_4, 1e-9));
    }

    #[test]
    fn canonical_name_breaks_ties() {
        let store = ConstantStore::seeded();
        // "hbar" is canonical for J.s and an alias of hbarc.
        let entry = store.find(&MatchSpec::literal("hbar"), "").unwrap();
        assert_eq!(entry.unit, "J.s");
        // "e" is canonical for the elementary charge and an alias of euler.
        let entry = store.find(&MatchSpec::literal("e"), "").unwrap();
        assert_eq!(entry.unit, "C");
    }

    #[test]
    fn case_insensitive_fallback() {
        let store = ConstantStore::seeded();
        let entry = store.find(&MatchSpec::literal("kB"), "").unwrap();
        assert_eq!(entry.canonical(), "kb");
    }

    #[test]
    fn regex_ambiguity_is_reported() {
        let store = ConstantStore::seeded();
        let err = store.find(&MatchSpec::regex("^m[epn]$"), "kg").unwrap_err();
        assert!(matches!(err, UcError::AmbiguousConstant { count: 3, .. }));
        let mp = store.find(&MatchSpec::regex("^mp$"), "kg").unwrap();
        assert_eq!(mp.canonical(), "mp");
    }

    #[test]
    fn unknown_name_and_unit_mismatch() {
        let store = ConstantStore::seeded();
        assert!(matches!(
            store.find(&MatchSpec::literal("nonesuch"), ""),
            Err(UcError::UnknownConstant { .. })
        ));
        assert!(matches!(
            store.find(&MatchSpec::literal("c"), "km/s"),
            Err(UcError::UnknownConstant { .. })
        ));
    }

    #[test]
    fn si_request_returns_si_value() {
        let store = ConstantStore::seeded();
        let v = store
            .find_unique(&MatchSpec::literal("hbarc"), "si")
            .unwrap();
        assert!(uc_core::rel_close(v, 197.326_980_4 * 1.602_176_634e-28, 1e-9));
    }

    #[test]
    fn add_and_delete() {
        let mut store = ConstantStore::seeded();
        let before = store.len();
        store.add_constant(widget()).unwrap();
        assert_eq!(store.len(), before + 1);
        assert_eq!(
            store.find_unique(&MatchSpec::literal("wdg"), "m").unwrap(),
            2.5
        );
        let removed = store.del_constant("wdg").unwrap();
        assert_eq!(removed.canonical(), "widget");
        assert_eq!(store.len(), before);
        assert!(matches!(
            store.del_constant("widget"),
            Err(UcError::UnknownConstant { .. })
        ));
    }

    #[test]
    fn duplicate_canonical_name_with_other_unit_is_rejected() {
        let mut store = ConstantStore::seeded();
        let mut other = widget();
        other.names = vec!["c".into()];
        other.unit = "km/s".into();
        assert!(matches!(
            store.add_constant(other),
            Err(UcError::DuplicateConstant { .. })
        ));
    }

    #[test]
    fn merge_mode_extends_aliases() {
        let mut store = ConstantStore::new();
        store.add_constant(widget()).unwrap();
        let mut again = widget();
        again.names = vec!["widget".into(), "gizmo".into()];
        assert!(store.add_constant(again.clone()).is_err());
        store
            .add_constant_with(again, AddMode::MergeAliases)
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.find_unique(&MatchSpec::literal("gizmo"), "").unwrap(),
            2.5
        );
    }

    #[test]
    fn delete_by_shared_alias_removes_first_only() {
        let mut store = ConstantStore::seeded();
        // "hbar" names both the J.s entry and the hbarc alias; the J.s one comes first.
        let removed = store.del_constant("hbar").unwrap();
        assert_eq!(removed.unit, "J.s");
        let left = store.find(&MatchSpec::literal("hbar"), "").unwrap();
        assert_eq!(left.canonical(), "hbarc");
    }
}
