use uc_core::DimVec;

use crate::UnitEntry;

/// A compiled-in derived unit, expressed in SI base units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedUnit {
    pub label: &'static str,
    pub name: &'static str,
    /// Exponents over `(m, kg, s, K, A, mol, cd)`.
    pub exps: [i32; 7],
    pub mant: f64,
    pub exp10: i32,
}

impl DerivedUnit {
    pub fn dims(&self) -> DimVec {
        DimVec::from_exps(self.exps, self.mant).with_pow10(self.exp10)
    }

    pub fn to_entry(&self) -> UnitEntry {
        UnitEntry::new(self.label, self.name, self.dims())
    }
}

/// A physical constant exposed as a unit label, looked up in the constant
/// store by `query` and `unit` when the registry is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportedConstant {
    pub label: &'static str,
    pub name: &'static str,
    pub query: &'static str,
    pub unit: &'static str,
}

const fn unit(
    label: &'static str,
    name: &'static str,
    exps: [i32; 7],
    mant: f64,
    exp10: i32,
) -> DerivedUnit {
    DerivedUnit {
        label,
        name,
        exps,
        mant,
        exp10,
    }
}

const LENGTH: [i32; 7] = [1, 0, 0, 0, 0, 0, 0];
const AREA: [i32; 7] = [2, 0, 0, 0, 0, 0, 0];
const VOLUME: [i32; 7] = [3, 0, 0, 0, 0, 0, 0];
const MASS: [i32; 7] = [0, 1, 0, 0, 0, 0, 0];
const TIME: [i32; 7] = [0, 0, 1, 0, 0, 0, 0];
const FORCE: [i32; 7] = [1, 1, -2, 0, 0, 0, 0];
const PRESSURE: [i32; 7] = [-1, 1, -2, 0, 0, 0, 0];
const ENERGY: [i32; 7] = [2, 1, -2, 0, 0, 0, 0];
const RESISTANCE: [i32; 7] = [2, 1, -3, 0, -2, 0, 0];

const DERIVED: [DerivedUnit; 36] = [
    unit("g", "gram", MASS, 1.0, -3),
    unit("Hz", "hertz", [0, 0, -1, 0, 0, 0, 0], 1.0, 0),
    unit("N", "newton", FORCE, 1.0, 0),
    unit("Pa", "pascal", PRESSURE, 1.0, 0),
    unit("J", "joule", ENERGY, 1.0, 0),
    unit("W", "watt", [2, 1, -3, 0, 0, 0, 0], 1.0, 0),
    unit("C", "coulomb", [0, 0, 1, 0, 1, 0, 0], 1.0, 0),
    unit("V", "volt", [2, 1, -3, 0, -1, 0, 0], 1.0, 0),
    unit("Ω", "ohm", RESISTANCE, 1.0, 0),
    unit("ohm", "ohm", RESISTANCE, 1.0, 0),
    unit("S", "siemens", [-2, -1, 3, 0, 2, 0, 0], 1.0, 0),
    unit("F", "farad", [-2, -1, 4, 0, 2, 0, 0], 1.0, 0),
    unit("T", "tesla", [0, 1, -2, 0, -1, 0, 0], 1.0, 0),
    unit("Wb", "weber", [2, 1, -2, 0, -1, 0, 0], 1.0, 0),
    unit("H", "henry", [2, 1, -2, 0, -2, 0, 0], 1.0, 0),
    unit("rad", "radian", [0; 7], 1.0, 0),
    unit("eV", "electronvolt", ENERGY, 1.602_176_634e-19, 0),
    unit("erg", "erg", ENERGY, 1.0, -7),
    unit("cal", "calorie", ENERGY, 4.184, 0),
    unit("dyn", "dyne", FORCE, 1.0, -5),
    unit("bar", "bar", PRESSURE, 1.0, 5),
    unit("atm", "standard atmosphere", PRESSURE, 101_325.0, 0),
    unit("Torr", "torr", PRESSURE, 101_325.0 / 760.0, 0),
    unit("Å", "angstrom", LENGTH, 1.0, -10),
    unit("ang", "angstrom", LENGTH, 1.0, -10),
    unit("fm", "fermi", LENGTH, 1.0, -15),
    unit("barn", "barn", AREA, 1.0, -28),
    unit("L", "liter", VOLUME, 1.0, -3),
    unit("l", "liter", VOLUME, 1.0, -3),
    unit("min", "minute", TIME, 60.0, 0),
    unit("hr", "hour", TIME, 3600.0, 0),
    unit("d", "day", TIME, 86_400.0, 0),
    unit("yr", "julian year", TIME, 31_557_600.0, 0),
    unit("kph", "kilometer per hour", [1, 0, -1, 0, 0, 0, 0], 1.0 / 3.6, 0),
    unit("Ci", "curie", [0, 0, -1, 0, 0, 0, 0], 3.7, 10),
    unit("gauss", "gauss", [0, 1, -2, 0, -1, 0, 0], 1.0, -4),
];

const IMPORTED: [ImportedConstant; 12] = [
    ImportedConstant {
        label: "c",
        name: "speed of light",
        query: "c",
        unit: "m/s",
    },
    ImportedConstant {
        label: "hbar",
        name: "reduced Planck constant",
        query: "hbar",
        unit: "J.s",
    },
    ImportedConstant {
        label: "hbarc",
        name: "hbar times c",
        query: "hbarc",
        unit: "MeV.fm",
    },
    ImportedConstant {
        label: "G",
        name: "Newtonian constant of gravitation",
        query: "G",
        unit: "m^3/kg/s^2",
    },
    ImportedConstant {
        label: "kB",
        name: "Boltzmann constant",
        query: "kb",
        unit: "J/K",
    },
    ImportedConstant {
        label: "me",
        name: "electron mass",
        query: "me",
        unit: "kg",
    },
    ImportedConstant {
        label: "mp",
        name: "proton mass",
        query: "mp",
        unit: "kg",
    },
    ImportedConstant {
        label: "Msun",
        name: "solar mass",
        query: "Msun",
        unit: "kg",
    },
    ImportedConstant {
        label: "pc",
        name: "parsec",
        query: "parsec",
        unit: "m",
    },
    ImportedConstant {
        label: "ly",
        name: "light year",
        query: "light_year",
        unit: "m",
    },
    ImportedConstant {
        label: "AU",
        name: "astronomical unit",
        query: "au",
        unit: "m",
    },
    ImportedConstant {
        label: "au",
        name: "astronomical unit",
        query: "au",
        unit: "m",
    },
];

pub fn derived_units() -> &'static [DerivedUnit] {
    &DERIVED
}

pub fn imported_constants() -> &'static [ImportedConstant] {
    &IMPORTED
}
