//! Conversion invariants: identity, round trips, prefixes, exponents, cache.

use proptest::prelude::*;
use uc_core::{rel_close, BaseDim};
use uc_engine::{Config, Converter, Status, UcError};
use uc_units::prefixes;

const SAMPLE_UNITS: [&str; 12] = [
    "m", "km", "eV", "J", "atm", "Pa", "hr", "min", "N*m", "kg*m^2/s^2", "erg", "MeV",
];

fn converter() -> Converter {
    Converter::new(&Config::default())
}

/// Distance in representable doubles between two values of the same sign.
fn ulps_apart(a: f64, b: f64) -> u64 {
    if a == b {
        return 0;
    }
    (a.to_bits() as i64).abs_diff(b.to_bits() as i64)
}

#[test]
fn identity_is_exact() {
    let conv = converter();
    for unit in SAMPLE_UNITS {
        assert_eq!(conv.convert(unit, unit, 3.25).unwrap(), 3.25, "{unit}");
    }
}

#[test]
fn every_prefix_on_every_base_unit() {
    let conv = converter();
    for dim in BaseDim::ALL {
        // Mass prefixes attach to the gram.
        let (base, shift) = match dim {
            BaseDim::Mass => ("g", -3),
            other => (other.symbol(), 0),
        };
        for prefix in prefixes() {
            let label = format!("{}{}", prefix.symbol, base);
            let factor = conv.convert(&label, dim.symbol(), 1.0).unwrap();
            let expected = uc_core::pow10(prefix.exp10 + shift);
            assert_eq!(factor, expected, "{label}");
        }
    }
}

#[test]
fn exponents_scale_linearly() {
    let conv = converter();
    for n in 1..=4 {
        let factor = conv.convert(&format!("km^{n}"), &format!("m^{n}"), 1.0).unwrap();
        assert_eq!(factor, uc_core::pow10(3 * n));
        let factor = conv.convert(&format!("cm^{n}"), &format!("m^{n}"), 1.0).unwrap();
        assert_eq!(factor, uc_core::pow10(-2 * n));
    }
}

#[test]
fn incompatible_units_are_rejected() {
    let conv = converter();
    assert_eq!(
        conv.convert("m", "s", 1.0),
        Err(UcError::IncompatibleUnits {
            from: "m".into(),
            to: "s".into()
        })
    );
    assert!(matches!(
        conv.convert("J", "W", 1.0),
        Err(UcError::IncompatibleUnits { .. })
    ));
}

#[test]
fn oversized_exponents_are_errors() {
    let conv = converter();
    assert!(matches!(
        conv.convert("km^1000000000", "m^1000000000", 1.0),
        Err(UcError::InvalidArg { .. })
    ));
    assert!(matches!(
        conv.convert("(m^2)^2000000000", "m", 1.0),
        Err(UcError::InvalidArg { .. })
    ));
    assert_eq!(
        conv.convert_ret("(m^2)^2000000000", "m", 1.0),
        (Status::InvalidArg, None)
    );
    assert_eq!(conv.cache().len(), 0);
}

#[test]
fn prefixed_forms_cannot_be_redefined() {
    let mut conv = converter();
    assert!(matches!(
        conv.add_unit_expr("cm", "not a centimeter", "m"),
        Err(UcError::DuplicateLabel { .. })
    ));
    assert_eq!(conv.convert("cm", "m", 1.0).unwrap(), 0.01);
    // A consistent definition is accepted and changes nothing.
    conv.add_unit_expr("cm", "centimeter", "m/100").unwrap();
    assert_eq!(conv.convert("cm", "m", 1.0).unwrap(), 0.01);
    conv.test_unique().unwrap();
}

#[test]
fn natural_units_identify_length_and_inverse_energy() {
    let mut conv = converter();
    conv.set_natural_units(true, true, false);
    let forward = conv.convert("MeV", "fm^-1", 1.0).unwrap();
    let back = conv.convert("fm^-1", "MeV", forward).unwrap();
    assert!(rel_close(back, 1.0, 1e-12));
    assert!(rel_close(conv.convert("MeV", "1/fm", 1.0).unwrap(), forward, 1e-15));
    // Exact exponent matches keep the plain ratio.
    assert_eq!(conv.convert("km", "m", 1.0).unwrap(), 1000.0);
}

#[test]
fn cache_records_both_directions() {
    let conv = converter();
    assert_eq!(conv.is_in_cache("km", "m"), 0);
    conv.convert("km", "m", 1.0).unwrap();
    assert_eq!(conv.is_in_cache("km", "m"), 1);
    assert_eq!(conv.is_in_cache("m", "km"), 2);
    assert_eq!(conv.convert("m", "km", 1000.0).unwrap(), 1.0);

    conv.remove_cache("m", "km").unwrap();
    assert_eq!(conv.is_in_cache("km", "m"), 0);
    assert_eq!(conv.is_in_cache("m", "km"), 0);
}

#[test]
fn every_mutation_clears_the_cache() {
    let mut conv = converter();
    let fill = |conv: &Converter| {
        conv.convert("km", "m", 1.0).unwrap();
        assert_eq!(conv.is_in_cache("km", "m"), 1);
    };

    fill(&conv);
    conv.add_unit_expr("furlong", "furlong", "201.168*m").unwrap();
    assert_eq!(conv.is_in_cache("km", "m"), 0);

    fill(&conv);
    conv.del_unit("furlong").unwrap();
    assert_eq!(conv.is_in_cache("km", "m"), 0);

    fill(&conv);
    let entry = conv.constant_entry(["zeta"], "m", 2.0, "test").unwrap();
    conv.add_constant(entry).unwrap();
    assert_eq!(conv.is_in_cache("km", "m"), 0);

    fill(&conv);
    conv.del_constant("zeta").unwrap();
    assert_eq!(conv.is_in_cache("km", "m"), 0);

    fill(&conv);
    conv.set_natural_units(true, false, false);
    assert_eq!(conv.is_in_cache("km", "m"), 0);

    fill(&conv);
    conv.clear_cache();
    assert_eq!(conv.is_in_cache("km", "m"), 0);
}

#[test]
fn failed_mutations_keep_the_cache() {
    let mut conv = converter();
    conv.convert("km", "m", 1.0).unwrap();
    assert!(conv.del_unit("nonesuch").is_err());
    assert!(conv.del_constant("nonesuch").is_err());
    assert_eq!(conv.is_in_cache("km", "m"), 1);
}

#[test]
fn fresh_registry_passes_audit() {
    converter().test_unique().unwrap();
}

#[test]
fn concurrent_reads() {
    let conv = converter();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for unit in SAMPLE_UNITS {
                    conv.convert(unit, unit, 1.0).unwrap();
                }
                assert_eq!(conv.convert("hr", "s", 1.0).unwrap(), 3600.0);
            });
        }
    });
    assert!(conv.cache().len() >= SAMPLE_UNITS.len());
}

fn compatible_pair() -> impl Strategy<Value = (&'static str, &'static str)> {
    prop::sample::select(vec![
        ("km", "m"),
        ("eV", "J"),
        ("atm", "Pa"),
        ("hr", "min"),
        ("N*m", "erg"),
        ("MeV", "kg*m^2/s^2"),
        ("ly", "pc"),
        ("barn", "fm^2"),
        ("L", "cm^3"),
    ])
}

proptest! {
    #[test]
    fn round_trip((from, to) in compatible_pair(), v in -1e6f64..1e6) {
        let conv = converter();
        let there = conv.convert(from, to, v).unwrap();
        let back = conv.convert(to, from, there).unwrap();
        prop_assert!(ulps_apart(back, v) <= 10, "{} -> {} -> {}", v, there, back);
    }

    #[test]
    fn conversion_is_linear_in_value((from, to) in compatible_pair(), v in 1e-3f64..1e3) {
        let conv = converter();
        let one = conv.convert(from, to, 1.0).unwrap();
        let many = conv.convert(from, to, v).unwrap();
        prop_assert!(rel_close(many, one * v, 1e-12));
    }
}
