//! Plain-text tables written to the diagnostic sink.

use std::fmt::Write as _;

use uc_constants::ConstantEntry;
use uc_units::UnitEntry;

fn width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(|c| c.chars().count()).fold(header.len(), usize::max)
}

fn pad(s: &str, w: usize) -> String {
    let fill = w.saturating_sub(s.chars().count());
    format!("{s}{}", " ".repeat(fill))
}

/// Matching constants, one row per entry, values in scientific notation
/// with `precision` fractional digits.
pub fn constants_table(entries: &[&ConstantEntry], precision: usize) -> String {
    let values: Vec<String> = entries
        .iter()
        .map(|e| format!("{:.*e}", precision, e.value))
        .collect();
    let aliases: Vec<String> = entries
        .iter()
        .map(|e| e.names.get(1..).unwrap_or_default().join(", "))
        .collect();

    let w_name = width("Name", entries.iter().map(|e| e.canonical()));
    let w_value = width("Value", values.iter().map(String::as_str));
    let w_unit = width("Unit", entries.iter().map(|e| e.unit.as_str()));
    let w_alias = width("Aliases", aliases.iter().map(String::as_str));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  {}  {}  {}  Source",
        pad("Name", w_name),
        pad("Value", w_value),
        pad("Unit", w_unit),
        pad("Aliases", w_alias)
    );
    for ((entry, value), alias) in entries.iter().zip(&values).zip(&aliases) {
        let _ = writeln!(
            out,
            "{}  {}  {}  {}  {}",
            pad(entry.canonical(), w_name),
            pad(value, w_value),
            pad(&entry.unit, w_unit),
            pad(alias, w_alias),
            entry.source
        );
    }
    out
}

pub fn units_table(entries: &[UnitEntry]) -> String {
    let si: Vec<String> = entries.iter().map(|e| e.dims.to_string()).collect();
    let w_label = width("Label", entries.iter().map(|e| e.label.as_str()));
    let w_name = width("Name", entries.iter().map(|e| e.name.as_str()));

    let mut out = String::new();
    let _ = writeln!(out, "{}  {}  SI", pad("Label", w_label), pad("Name", w_name));
    for (entry, si) in entries.iter().zip(&si) {
        let _ = writeln!(
            out,
            "{}  {}  {}",
            pad(&entry.label, w_label),
            pad(&entry.name, w_name),
            si
        );
    }
    out
}

pub fn cache_table(entries: &[(String, String, f64)]) -> String {
    let w_from = width("From", entries.iter().map(|e| e.0.as_str()));
    let w_to = width("To", entries.iter().map(|e| e.1.as_str()));

    let mut out = String::new();
    let _ = writeln!(out, "{}  {}  Factor", pad("From", w_from), pad("To", w_to));
    for (from, to, factor) in entries {
        let _ = writeln!(out, "{}  {}  {:e}", pad(from, w_from), pad(to, w_to), factor);
    }
    out
}
