//! The conversion engine.
//!
//! A [`Converter`] owns the unit registry, the constant store, the
//! equivalence graph built from both, the natural-units flags and the
//! factor cache. Mutations go through `&mut self` and invalidate the cache
//! and the graph together; conversions and lookups take `&self`.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, trace, warn};
use uc_constants::{AddMode, ConstantEntry, ConstantStore, MatchSpec};
use uc_core::{
    ensure_finite, rel_close, DimVec, NaturalUnits, Real, Status, UcError, UcResult, UnityValues,
};
use uc_units::{parse_expr, Resolve, UnitEntry, UnitRegistry};

use crate::cache::ConversionCache;
use crate::config::Config;
use crate::report;
use crate::search::UnitGraph;

/// Relative spread within which several convertible constants count as one.
const AGREEMENT: Real = 1e-8;

/// Destination for verbose traces and printed tables.
pub type Sink = Box<dyn Write + Send>;

/// Registry lookup first; names the registry does not know (constant
/// names such as `h`, `NA`, `pi`) are resolved through the graph.
struct EngineResolver<'a> {
    registry: &'a UnitRegistry,
    graph: &'a UnitGraph,
}

impl Resolve for EngineResolver<'_> {
    fn resolve(&self, label: &str) -> UcResult<DimVec> {
        match self.registry.resolve(label) {
            Err(UcError::UnknownUnit { .. }) => self.graph.resolve(label),
            other => other,
        }
    }
}

pub struct Converter {
    config: Config,
    registry: UnitRegistry,
    constants: ConstantStore,
    graph: UnitGraph,
    cache: ConversionCache,
    sink: Mutex<Sink>,
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("config", &self.config)
            .field("units", &self.registry.len())
            .field("constants", &self.constants.len())
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Converter {
    /// Build a converter with the seeded registry and constant store,
    /// writing to standard output.
    pub fn new(config: &Config) -> Self {
        Self::with_sink(config, Box::new(io::stdout()))
    }

    pub fn with_sink(config: &Config, sink: Sink) -> Self {
        let constants = ConstantStore::seeded();
        let registry = UnitRegistry::seeded(&constants);
        let graph = UnitGraph::build(&registry, &constants);
        debug!(
            units = registry.len(),
            constants = constants.len(),
            natural = ?config.natural,
            "converter ready"
        );
        Self {
            config: config.clone(),
            registry,
            constants,
            graph,
            cache: ConversionCache::new(),
            sink: Mutex::new(sink),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_sink(&mut self, sink: Sink) {
        *self.sink.get_mut().unwrap_or_else(PoisonError::into_inner) = sink;
    }

    fn write_out(&self, text: &str) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = sink.write_all(text.as_bytes()).and_then(|()| sink.flush()) {
            warn!(%err, "diagnostic sink write failed");
        }
    }

    /// Verbose trace line; the message is only built when verbose is on.
    fn note(&self, msg: impl FnOnce() -> String) {
        if self.config.verbose > 0 {
            let mut line = msg();
            line.push('\n');
            self.write_out(&line);
        }
    }

    fn resolver(&self) -> EngineResolver<'_> {
        EngineResolver {
            registry: &self.registry,
            graph: &self.graph,
        }
    }

    /// Parse a unit expression with the same resolution rules `convert` uses.
    pub fn parse(&self, expr: &str) -> UcResult<DimVec> {
        parse_expr(expr.trim(), &self.resolver())
    }

    // ---------------------------------------------------------------------
    // Conversion
    // ---------------------------------------------------------------------

    /// `value` expressed in `from`, converted to `to`.
    pub fn convert(&self, from: &str, to: &str, value: Real) -> UcResult<Real> {
        let value = ensure_finite(value, "input value")?;
        Ok(value * self.factor(from, to)?)
    }

    /// Nothrow form of [`Converter::convert`].
    pub fn convert_ret(&self, from: &str, to: &str, value: Real) -> (Status, Option<Real>) {
        let result = self.convert(from, to, value);
        (Status::from(&result), result.ok())
    }

    /// The factor `f` such that one `from` equals `f` of `to`.
    pub fn factor(&self, from: &str, to: &str) -> UcResult<Real> {
        let (from, to) = (from.trim(), to.trim());

        if self.config.use_cache {
            if let Some((hit, factor)) = self.cache.lookup(from, to) {
                trace!(from, to, ?hit, factor, "cache hit");
                self.note(|| format!("cache {hit:?} hit: '{from}' -> '{to}' = {factor:e}"));
                return Ok(factor);
            }
        }

        match self.compute_factor(from, to) {
            Ok(factor) => {
                if self.config.use_cache {
                    self.cache.insert(from, to, factor);
                }
                debug!(from, to, factor, "converted");
                self.note(|| format!("factor '{from}' -> '{to}' = {factor:e}"));
                Ok(factor)
            }
            Err(err) => {
                debug!(from, to, %err, "conversion rejected");
                self.note(|| format!("rejected '{from}' -> '{to}': {err}"));
                Err(err)
            }
        }
    }

    fn compute_factor(&self, from: &str, to: &str) -> UcResult<Real> {
        let resolver = self.resolver();
        let dv_from = parse_expr(from, &resolver)?;
        let dv_to = parse_expr(to, &resolver)?;
        debug!(from, to, %dv_from, %dv_to, "parsed");
        self.note(|| format!("parsed '{from}' = {dv_from}; '{to}' = {dv_to}"));

        let factor = if dv_from.same_dims(&dv_to) {
            dv_from.ratio(&dv_to)?
        } else if dv_from.compatible(&dv_to, self.config.natural) {
            let unity = self.unity_values()?;
            let natural = self.config.natural;
            let pf = natural.project(&dv_from, &unity)?;
            let pt = natural.project(&dv_to, &unity)?;
            let (c, hbar, kb) = (
                pf.c_power - pt.c_power,
                pf.hbar_power - pt.hbar_power,
                pf.kb_power - pt.kb_power,
            );
            debug!(c, hbar, kb, "natural-units contraction");
            self.note(|| format!("projected: c^{c} hbar^{hbar} kB^{kb}"));
            if pt.value == 0.0 {
                return Err(UcError::DivisionByZero {
                    what: format!("target unit '{to}'"),
                });
            }
            pf.value / pt.value
        } else {
            return Err(UcError::IncompatibleUnits {
                from: from.to_string(),
                to: to.to_string(),
            });
        };
        ensure_finite(factor, "conversion factor")
    }

    /// SI values of the constants natural units set to one, read from the store.
    fn unity_values(&self) -> UcResult<UnityValues> {
        let si = |name: &str, unit: &str| {
            self.constants
                .find(&MatchSpec::literal(name), unit)
                .map(ConstantEntry::si_value)
        };
        Ok(UnityValues {
            c: si("c", "m/s")?,
            hbar: si("hbar", "J.s")?,
            kb: si("kb", "J/K")?,
        })
    }

    // ---------------------------------------------------------------------
    // Cache
    // ---------------------------------------------------------------------

    /// 0 on a miss, 1 on a forward hit, 2 on an inverse hit.
    pub fn is_in_cache(&self, from: &str, to: &str) -> u8 {
        self.cache.hit(from.trim(), to.trim()).code()
    }

    pub fn remove_cache(&self, from: &str, to: &str) -> UcResult<()> {
        let (from, to) = (from.trim(), to.trim());
        if !self.cache.remove(from, to) && self.config.err_on_fail {
            return Err(UcError::UnknownCacheEntry {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        trace!("cache cleared");
    }

    pub fn cache(&self) -> &ConversionCache {
        &self.cache
    }

    // ---------------------------------------------------------------------
    // Natural units
    // ---------------------------------------------------------------------

    pub fn set_natural_units(&mut self, c_is_one: bool, hbar_is_one: bool, kb_is_one: bool) {
        self.config.natural = NaturalUnits::new(c_is_one, hbar_is_one, kb_is_one);
        self.cache.clear();
        debug!(natural = ?self.config.natural, "natural units changed");
    }

    pub fn natural_units(&self) -> NaturalUnits {
        self.config.natural
    }

    // ---------------------------------------------------------------------
    // Registry
    // ---------------------------------------------------------------------

    fn invalidate(&mut self) {
        self.cache.clear();
        self.graph = UnitGraph::build(&self.registry, &self.constants);
    }

    pub fn add_unit(&mut self, entry: UnitEntry) -> UcResult<()> {
        let label = entry.label.clone();
        self.registry
            .add_unit(entry)
            .inspect_err(|err| warn!(%label, %err, "unit rejected"))?;
        self.invalidate();
        debug!(%label, "unit added");
        Ok(())
    }

    /// Register `label` as the unit expression `expr` (e.g. `"furlong"`,
    /// `"201.168*m"`).
    pub fn add_unit_expr(&mut self, label: &str, name: &str, expr: &str) -> UcResult<()> {
        let dims = self.parse(expr)?;
        self.add_unit(UnitEntry::new(label, name, dims))
    }

    pub fn del_unit(&mut self, label: &str) -> UcResult<UnitEntry> {
        let removed = self
            .registry
            .del_unit(label)
            .inspect_err(|err| warn!(label, %err, "unit not deleted"))?;
        self.invalidate();
        debug!(label, "unit deleted");
        Ok(removed)
    }

    pub fn test_unique(&self) -> UcResult<()> {
        self.registry.test_unique()
    }

    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    pub fn graph(&self) -> &UnitGraph {
        &self.graph
    }

    pub fn print_units(&self) {
        self.write_out(&report::units_table(self.registry.entries()));
    }

    pub fn print_cache(&self) {
        self.write_out(&report::cache_table(&self.cache.entries()));
    }

    // ---------------------------------------------------------------------
    // Constants
    // ---------------------------------------------------------------------

    /// Value of the single constant matching `name` and `unit`.
    ///
    /// When no entry is quoted in `unit` literally, entries whose unit
    /// converts to `unit` are converted; several of them agreeing to within
    /// a relative 1e-8 count as one.
    pub fn find_unique(&self, name: &str, unit: &str, use_regex: bool) -> UcResult<Real> {
        let spec = MatchSpec::new(name, use_regex);
        match self.constants.find_unique(&spec, unit) {
            Err(err @ UcError::UnknownConstant { .. }) if !unit.trim().is_empty() => {
                match self.find_converted(&spec, unit.trim())? {
                    Some(value) => Ok(value),
                    None => Err(err),
                }
            }
            other => other,
        }
    }

    pub fn find_unique_ret(&self, name: &str, unit: &str, use_regex: bool) -> (Status, Option<Real>) {
        let result = self.find_unique(name, unit, use_regex);
        (Status::from(&result), result.ok())
    }

    fn find_converted(&self, spec: &MatchSpec, unit: &str) -> UcResult<Option<Real>> {
        let mut hits: Vec<(&ConstantEntry, Real)> = Vec::new();
        for entry in self.constants.name_matches(spec)? {
            if entry.unit.trim().is_empty() {
                continue;
            }
            match self.factor(&entry.unit, unit) {
                Ok(factor) => hits.push((entry, entry.value * factor)),
                Err(err) => trace!(name = entry.canonical(), %err, "not convertible"),
            }
        }

        match hits.as_slice() {
            [] => Ok(None),
            [(_, value)] => Ok(Some(*value)),
            [(_, first), rest @ ..] if rest.iter().all(|(_, v)| rel_close(*v, *first, AGREEMENT)) => {
                Ok(Some(*first))
            }
            _ => {
                if let MatchSpec::Literal(query) = spec {
                    let canonical: Vec<Real> = hits
                        .iter()
                        .filter(|(e, _)| e.canonical() == query.trim())
                        .map(|&(_, v)| v)
                        .collect();
                    if let [value] = canonical.as_slice() {
                        return Ok(Some(*value));
                    }
                }
                Err(UcError::AmbiguousConstant {
                    name: spec.pattern().to_string(),
                    unit: unit.to_string(),
                    count: hits.len(),
                })
            }
        }
    }

    /// Write a table of the constants matching `name` and `unit` to the
    /// sink. Returns the number of rows written.
    pub fn find_print(
        &self,
        name: &str,
        unit: &str,
        precision: usize,
        use_regex: bool,
    ) -> UcResult<usize> {
        let spec = MatchSpec::new(name, use_regex);
        let found = self.constants.matches(&spec, unit)?;
        if found.is_empty() {
            self.write_out(&format!("no constants match '{name}' (unit '{unit}')\n"));
        } else {
            self.write_out(&report::constants_table(&found, precision));
        }
        Ok(found.len())
    }

    /// Build a constant entry whose unit string is parsed by this converter.
    pub fn constant_entry<I, S>(
        &self,
        names: I,
        unit: &str,
        value: Real,
        source: &str,
    ) -> UcResult<ConstantEntry>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dims = if unit.trim().is_empty() {
            DimVec::dimensionless(1.0)
        } else {
            self.parse(unit)?
        };
        Ok(ConstantEntry::new(names, unit.trim(), dims, value, source))
    }

    pub fn add_constant(&mut self, entry: ConstantEntry) -> UcResult<()> {
        self.add_constant_with(entry, AddMode::Reject)
    }

    pub fn add_constant_with(&mut self, entry: ConstantEntry, mode: AddMode) -> UcResult<()> {
        self.constants
            .add_constant_with(entry, mode)
            .inspect_err(|err| warn!(%err, "constant rejected"))?;
        self.invalidate();
        Ok(())
    }

    pub fn del_constant(&mut self, name: &str) -> UcResult<ConstantEntry> {
        let removed = self
            .constants
            .del_constant(name)
            .inspect_err(|err| warn!(name, %err, "constant not deleted"))?;
        self.invalidate();
        Ok(removed)
    }

    pub fn constants(&self) -> &ConstantStore {
        &self.constants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn captured(config: &Config) -> (Converter, Captured) {
        let out = Captured::default();
        (Converter::with_sink(config, Box::new(out.clone())), out)
    }

    #[test]
    fn converter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();
    }

    #[test]
    fn trims_inputs() {
        let conv = Converter::default();
        assert_eq!(conv.convert("  km ", " m", 2.0).unwrap(), 2000.0);
        assert_eq!(conv.is_in_cache("km", "m"), 1);
    }

    #[test]
    fn rejects_non_finite_input() {
        let conv = Converter::default();
        let (status, value) = conv.convert_ret("km", "m", f64::NAN);
        assert_eq!(status, Status::InvalidArg);
        assert_eq!(value, None);
    }

    #[test]
    fn failures_leave_cache_untouched() {
        let conv = Converter::default();
        conv.convert("km", "m", 1.0).unwrap();
        assert!(conv.convert("m", "s", 1.0).is_err());
        assert!(conv.convert("m", "furlong", 1.0).is_err());
        assert_eq!(conv.cache().len(), 1);
    }

    #[test]
    fn cache_can_be_disabled() {
        let config = Config {
            use_cache: false,
            ..Config::default()
        };
        let conv = Converter::new(&config);
        conv.convert("km", "m", 1.0).unwrap();
        assert_eq!(conv.is_in_cache("km", "m"), 0);
        assert!(conv.cache().is_empty());
    }

    #[test]
    fn config_tracks_natural_units() {
        let mut conv = Converter::default();
        conv.set_natural_units(true, false, true);
        let expected = NaturalUnits::new(true, false, true);
        assert_eq!(conv.natural_units(), expected);
        assert_eq!(conv.config().natural, expected);
        let reloaded = Config::from_yaml_str(&conv.config().to_yaml_string().unwrap()).unwrap();
        assert_eq!(reloaded.natural, expected);
    }

    #[test]
    fn remove_cache_respects_err_on_fail() {
        let conv = Converter::default();
        assert!(matches!(
            conv.remove_cache("km", "m"),
            Err(UcError::UnknownCacheEntry { .. })
        ));
        let lenient = Converter::new(&Config {
            err_on_fail: false,
            ..Config::default()
        });
        assert!(lenient.remove_cache("km", "m").is_ok());
    }

    #[test]
    fn constant_names_resolve_in_expressions() {
        let conv = Converter::default();
        let v = conv.convert("h", "J*s", 1.0).unwrap();
        assert_eq!(v, 6.626_070_15e-34);
        let r = conv.convert("kB*NA", "J/mol/K", 1.0).unwrap();
        assert!(rel_close(r, 8.314_462_618, 1e-9));
    }

    #[test]
    fn verbose_trace_goes_to_sink() {
        let (conv, out) = captured(&Config {
            verbose: 1,
            ..Config::default()
        });
        conv.convert("km", "m", 1.0).unwrap();
        conv.convert("km", "m", 1.0).unwrap();
        let _ = conv.convert("m", "s", 1.0);
        let text = out.text();
        assert!(text.contains("parsed 'km'"));
        assert!(text.contains("cache Forward hit"));
        assert!(text.contains("rejected 'm' -> 's'"));
    }

    #[test]
    fn quiet_by_default() {
        let (conv, out) = captured(&Config::default());
        conv.convert("km", "m", 1.0).unwrap();
        assert!(out.text().is_empty());
    }

    #[test]
    fn print_tables() {
        let (mut conv, out) = captured(&Config::default());
        conv.convert("hr", "s", 1.0).unwrap();
        conv.print_cache();
        assert!(out.text().contains("3.6e3"));

        let fresh = Captured::default();
        conv.set_sink(Box::new(fresh.clone()));
        conv.print_units();
        assert!(fresh.text().lines().any(|l| l.starts_with("eV ")));
    }

    #[test]
    fn find_print_writes_matches() {
        let (conv, out) = captured(&Config::default());
        assert_eq!(conv.find_print("hbar", "", 4, false).unwrap(), 2);
        let text = out.text();
        assert!(text.contains("MeV.fm"));
        assert!(text.contains("J.s"));
        assert_eq!(conv.find_print("nonesuch", "", 4, false).unwrap(), 0);
        assert!(out.text().contains("no constants match 'nonesuch'"));
        assert!(matches!(
            conv.find_print("(", "", 4, true),
            Err(UcError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn find_unique_converts_units() {
        let conv = Converter::default();
        let h = conv.find_unique("h", "eV.s", false).unwrap();
        assert!(rel_close(h, 4.135_667_696e-15, 1e-9));
        let c = conv.find_unique("c", "km/s", false).unwrap();
        assert!(rel_close(c, 299_792.458, 1e-12));
        assert!(matches!(
            conv.find_unique("c", "kg", false),
            Err(UcError::UnknownConstant { .. })
        ));
    }

    #[test]
    fn agreeing_conversions_count_as_one() {
        let mut conv = Converter::default();
        // With c = 1, J.s and MeV.fm are both convertible to eV.s.
        conv.set_natural_units(true, false, false);
        let hbar = conv.find_unique("hbar", "eV.s", false).unwrap();
        assert!(rel_close(hbar, 6.582_119_569e-16, 1e-8));
    }

    #[test]
    fn user_constants_join_the_graph() {
        let mut conv = Converter::default();
        let entry = conv
            .constant_entry(["rho_w"], "kg/m^3", 999.97, "test")
            .unwrap();
        conv.add_constant(entry).unwrap();
        assert!(conv.graph().contains("rho_w"));
        let v = conv.convert("rho_w", "g/L", 1.0).unwrap();
        assert!(rel_close(v, 999.97, 1e-12));
        conv.del_constant("rho_w").unwrap();
        assert!(matches!(
            conv.convert("rho_w", "g/L", 1.0),
            Err(UcError::UnknownUnit { .. })
        ));
    }
}
