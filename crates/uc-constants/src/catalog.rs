use uc_core::DimVec;

use crate::ConstantEntry;

const EXACT: &str = "SI 2019 (exact)";
const CODATA: &str = "CODATA 2018";
const IAU: &str = "IAU 2015 Resolution B3";
const MATH: &str = "mathematical";

const C: f64 = 299_792_458.0;
const HBAR: f64 = 1.054_571_817e-34;
const EV: f64 = 1.602_176_634e-19;

/// ħc in MeV·fm, computed from `HBAR` and `C` so it agrees with conversions
/// that contract with ħ and c separately.
const HBARC_MEV_FM: f64 = HBAR * C / (EV * 1e6) * 1e15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogConstant {
    pub names: &'static [&'static str],
    pub unit: &'static str,
    /// Exponents of `unit` over `(m, kg, s, K, A, mol, cd)`.
    pub exps: [i32; 7],
    /// Value of one `unit` in SI base units.
    pub unit_si: f64,
    pub value: f64,
    pub source: &'static str,
}

impl CatalogConstant {
    pub fn to_entry(&self) -> ConstantEntry {
        ConstantEntry::new(
            self.names.iter().copied(),
            self.unit,
            DimVec::from_exps(self.exps, self.unit_si),
            self.value,
            self.source,
        )
    }
}

const CATALOG: [CatalogConstant; 30] = [
    CatalogConstant {
        names: &["c", "speed_of_light"],
        unit: "m/s",
        exps: [1, 0, -1, 0, 0, 0, 0],
        unit_si: 1.0,
        value: C,
        source: EXACT,
    },
    CatalogConstant {
        names: &["h", "planck"],
        unit: "J.s",
        exps: [2, 1, -1, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 6.626_070_15e-34,
        source: EXACT,
    },
    CatalogConstant {
        names: &["hbar", "ħ", "reduced_planck"],
        unit: "J.s",
        exps: [2, 1, -1, 0, 0, 0, 0],
        unit_si: 1.0,
        value: HBAR,
        source: CODATA,
    },
    CatalogConstant {
        names: &["hbarc", "ħc", "hbar"],
        unit: "MeV.fm",
        exps: [3, 1, -2, 0, 0, 0, 0],
        unit_si: 1.602_176_634e-28,
        value: HBARC_MEV_FM,
        source: CODATA,
    },
    CatalogConstant {
        names: &["kb", "boltzmann", "k_B"],
        unit: "J/K",
        exps: [2, 1, -2, -1, 0, 0, 0],
        unit_si: 1.0,
        value: 1.380_649e-23,
        source: EXACT,
    },
    CatalogConstant {
        names: &["G", "gnewton", "gravitational_constant"],
        unit: "m^3/kg/s^2",
        exps: [3, -1, -2, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 6.674_30e-11,
        source: CODATA,
    },
    CatalogConstant {
        names: &["g0", "standard_gravity"],
        unit: "m/s^2",
        exps: [1, 0, -2, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 9.806_65,
        source: "CGPM 1901 (exact)",
    },
    CatalogConstant {
        names: &["e", "elementary_charge", "q_e"],
        unit: "C",
        exps: [0, 0, 1, 0, 1, 0, 0],
        unit_si: 1.0,
        value: 1.602_176_634e-19,
        source: EXACT,
    },
    CatalogConstant {
        names: &["me", "m_e", "electron_mass"],
        unit: "kg",
        exps: [0, 1, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 9.109_383_701_5e-31,
        source: CODATA,
    },
    CatalogConstant {
        names: &["mp", "m_p", "proton_mass"],
        unit: "kg",
        exps: [0, 1, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 1.672_621_923_69e-27,
        source: CODATA,
    },
    CatalogConstant {
        names: &["mn", "m_n", "neutron_mass"],
        unit: "kg",
        exps: [0, 1, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 1.674_927_498_04e-27,
        source: CODATA,
    },
    CatalogConstant {
        names: &["amu", "m_u", "atomic_mass_unit"],
        unit: "kg",
        exps: [0, 1, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 1.660_539_066_60e-27,
        source: CODATA,
    },
    CatalogConstant {
        names: &["NA", "avogadro", "N_A"],
        unit: "1/mol",
        exps: [0, 0, 0, 0, 0, -1, 0],
        unit_si: 1.0,
        value: 6.022_140_76e23,
        source: EXACT,
    },
    CatalogConstant {
        names: &["R", "gas_constant", "molar_gas_constant"],
        unit: "J/mol/K",
        exps: [2, 1, -2, -1, 0, -1, 0],
        unit_si: 1.0,
        value: 8.314_462_618,
        source: EXACT,
    },
    CatalogConstant {
        names: &["sigma", "stefan_boltzmann"],
        unit: "W/m^2/K^4",
        exps: [0, 1, -3, -4, 0, 0, 0],
        unit_si: 1.0,
        value: 5.670_374_419e-8,
        source: EXACT,
    },
    CatalogConstant {
        names: &["alpha", "alpha_em", "fine_structure"],
        unit: "",
        exps: [0, 0, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 7.297_352_569_3e-3,
        source: CODATA,
    },
    CatalogConstant {
        names: &["mu0", "vacuum_permeability"],
        unit: "N/A^2",
        exps: [1, 1, -2, 0, -2, 0, 0],
        unit_si: 1.0,
        value: 1.256_637_062_12e-6,
        source: CODATA,
    },
    CatalogConstant {
        names: &["eps0", "epsilon0", "vacuum_permittivity"],
        unit: "F/m",
        exps: [-3, -1, 4, 0, 2, 0, 0],
        unit_si: 1.0,
        value: 8.854_187_812_8e-12,
        source: CODATA,
    },
    CatalogConstant {
        names: &["rydberg", "R_inf"],
        unit: "1/m",
        exps: [-1, 0, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 10_973_731.568_160,
        source: CODATA,
    },
    CatalogConstant {
        names: &["a0", "bohr_radius"],
        unit: "m",
        exps: [1, 0, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 5.291_772_109_03e-11,
        source: CODATA,
    },
    CatalogConstant {
        names: &["mec2", "electron_mass_energy"],
        unit: "MeV",
        exps: [2, 1, -2, 0, 0, 0, 0],
        unit_si: 1.602_176_634e-13,
        value: 0.510_998_950_00,
        source: CODATA,
    },
    CatalogConstant {
        names: &["Msun", "solar_mass"],
        unit: "kg",
        exps: [0, 1, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 1.988_409_870_698_051e30,
        source: IAU,
    },
    CatalogConstant {
        names: &["Rsun", "solar_radius"],
        unit: "m",
        exps: [1, 0, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 6.957e8,
        source: IAU,
    },
    CatalogConstant {
        names: &["Mearth", "earth_mass"],
        unit: "kg",
        exps: [0, 1, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 5.972_167_867_791_379e24,
        source: IAU,
    },
    CatalogConstant {
        names: &["Rearth", "earth_radius"],
        unit: "m",
        exps: [1, 0, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 6.378_1e6,
        source: IAU,
    },
    CatalogConstant {
        names: &["au", "astronomical_unit"],
        unit: "m",
        exps: [1, 0, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 1.495_978_707e11,
        source: "IAU 2012 Resolution B2",
    },
    CatalogConstant {
        names: &["parsec", "pc"],
        unit: "m",
        exps: [1, 0, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 3.085_677_581_491_367_3e16,
        source: "IAU 2015 Resolution B2",
    },
    CatalogConstant {
        names: &["light_year", "ly"],
        unit: "m",
        exps: [1, 0, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: 9.460_730_472_580_8e15,
        source: "IAU (Julian year)",
    },
    CatalogConstant {
        names: &["pi", "π"],
        unit: "",
        exps: [0, 0, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: core::f64::consts::PI,
        source: MATH,
    },
    CatalogConstant {
        names: &["euler", "e"],
        unit: "",
        exps: [0, 0, 0, 0, 0, 0, 0],
        unit_si: 1.0,
        value: core::f64::consts::E,
        source: MATH,
    },
];

pub fn catalog() -> &'static [CatalogConstant] {
    &CATALOG
}
