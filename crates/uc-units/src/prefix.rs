//! SI prefixes.
//!
//! The table covers yocto (`y`, 1e-24) through yotta (`Y`, 1e24): the twenty
//! decimal magnitudes of that range. Micro has three spellings (`μ` U+03BC,
//! `µ` U+00B5 and ASCII `u`), so the table holds 22 symbols. The 2022
//! additions (ronna, quetta, ronto, quecto) are not included.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiPrefix {
    pub symbol: &'static str,
    pub name: &'static str,
    pub exp10: i32,
}

/// Ordered longest symbol first so a linear scan is greedy ("da" before "d").
const PREFIXES: [SiPrefix; 22] = [
    SiPrefix {
        symbol: "da",
        name: "deca",
        exp10: 1,
    },
    SiPrefix {
        symbol: "Y",
        name: "yotta",
        exp10: 24,
    },
    SiPrefix {
        symbol: "Z",
        name: "zetta",
        exp10: 21,
    },
    SiPrefix {
        symbol: "E",
        name: "exa",
        exp10: 18,
    },
    SiPrefix {
        symbol: "P",
        name: "peta",
        exp10: 15,
    },
    SiPrefix {
        symbol: "T",
        name: "tera",
        exp10: 12,
    },
    SiPrefix {
        symbol: "G",
        name: "giga",
        exp10: 9,
    },
    SiPrefix {
        symbol: "M",
        name: "mega",
        exp10: 6,
    },
    SiPrefix {
        symbol: "k",
        name: "kilo",
        exp10: 3,
    },
    SiPrefix {
        symbol: "h",
        name: "hecto",
        exp10: 2,
    },
    SiPrefix {
        symbol: "d",
        name: "deci",
        exp10: -1,
    },
    SiPrefix {
        symbol: "c",
        name: "centi",
        exp10: -2,
    },
    SiPrefix {
        symbol: "m",
        name: "milli",
        exp10: -3,
    },
    SiPrefix {
        symbol: "μ",
        name: "micro",
        exp10: -6,
    },
    SiPrefix {
        symbol: "µ",
        name: "micro",
        exp10: -6,
    },
    SiPrefix {
        symbol: "u",
        name: "micro",
        exp10: -6,
    },
    SiPrefix {
        symbol: "n",
        name: "nano",
        exp10: -9,
    },
    SiPrefix {
        symbol: "p",
        name: "pico",
        exp10: -12,
    },
    SiPrefix {
        symbol: "f",
        name: "femto",
        exp10: -15,
    },
    SiPrefix {
        symbol: "a",
        name: "atto",
        exp10: -18,
    },
    SiPrefix {
        symbol: "z",
        name: "zepto",
        exp10: -21,
    },
    SiPrefix {
        symbol: "y",
        name: "yocto",
        exp10: -24,
    },
];

pub fn prefixes() -> &'static [SiPrefix] {
    &PREFIXES
}

/// Every way to read `label` as prefix + non-empty remainder, longest prefix first.
pub fn split_prefix<'a>(
    label: &'a str,
) -> impl Iterator<Item = (&'static SiPrefix, &'a str)> + 'a {
    prefixes().iter().filter_map(move |p| {
        label
            .strip_prefix(p.symbol)
            .filter(|rest| !rest.is_empty())
            .map(|rest| (p, rest))
    })
}
