use thiserror::Error;

pub type UcResult<T> = Result<T, UcError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UcError {
    #[error("Parse error in '{expr}' at byte {pos}: {what}")]
    Parse {
        expr: String,
        pos: usize,
        what: String,
    },

    #[error("Unknown unit '{label}'")]
    UnknownUnit { label: String },

    #[error("Fractional exponent: {num}/{den} leaves a non-integer base exponent")]
    FractionalExponent { num: i32, den: i32 },

    #[error("Incompatible units: '{from}' cannot be converted to '{to}'")]
    IncompatibleUnits { from: String, to: String },

    #[error("Division by zero in {what}")]
    DivisionByZero { what: String },

    #[error("Duplicate unit label '{label}'")]
    DuplicateLabel { label: String },

    #[error("Duplicate constant '{name}' with unit '{unit}'")]
    DuplicateConstant { name: String, unit: String },

    #[error("No cache entry for '{from}' -> '{to}'")]
    UnknownCacheEntry { from: String, to: String },

    #[error("Unknown constant '{name}' (unit '{unit}')")]
    UnknownConstant { name: String, unit: String },

    #[error("Ambiguous constant '{name}' (unit '{unit}'): {count} matches")]
    AmbiguousConstant {
        name: String,
        unit: String,
        count: usize,
    },

    #[error("Inconsistent registry: {what}")]
    InconsistentRegistry { what: String },

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

/// Integer status reported by the nothrow (`*_ret`) entry points.
///
/// `Success` is zero; every error kind maps to a distinct positive code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    Success = 0,
    ParseError = 1,
    UnknownUnit = 2,
    FractionalExponent = 3,
    IncompatibleUnits = 4,
    DivisionByZero = 5,
    DuplicateLabel = 6,
    DuplicateConstant = 7,
    UnknownCacheEntry = 8,
    UnknownConstant = 9,
    AmbiguousConstant = 10,
    InconsistentRegistry = 11,
    InvalidPattern = 12,
    InvalidArg = 13,
}

impl Status {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

impl UcError {
    /// Status code for this error, as returned by the nothrow entry points.
    pub fn status(&self) -> Status {
        match self {
            UcError::Parse { .. } => Status::ParseError,
            UcError::UnknownUnit { .. } => Status::UnknownUnit,
            UcError::FractionalExponent { .. } => Status::FractionalExponent,
            UcError::IncompatibleUnits { .. } => Status::IncompatibleUnits,
            UcError::DivisionByZero { .. } => Status::DivisionByZero,
            UcError::DuplicateLabel { .. } => Status::DuplicateLabel,
            UcError::DuplicateConstant { .. } => Status::DuplicateConstant,
            UcError::UnknownCacheEntry { .. } => Status::UnknownCacheEntry,
            UcError::UnknownConstant { .. } => Status::UnknownConstant,
            UcError::AmbiguousConstant { .. } => Status::AmbiguousConstant,
            UcError::InconsistentRegistry { .. } => Status::InconsistentRegistry,
            UcError::InvalidPattern { .. } => Status::InvalidPattern,
            UcError::InvalidArg { .. } | UcError::NonFinite { .. } => Status::InvalidArg,
        }
    }
}

impl<T> From<&UcResult<T>> for Status {
    fn from(result: &UcResult<T>) -> Self {
        match result {
            Ok(_) => Status::Success,
            Err(err) => err.status(),
        }
    }
}
