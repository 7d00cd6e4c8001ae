use serde::{Deserialize, Serialize};
use uc_core::NaturalUnits;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Converter settings. Every field has a default, so a partial YAML
/// document (or an empty one) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 0 is silent; 1 and above write a step trace to the sink.
    pub verbose: u8,
    /// Whether `remove_cache` on a missing pair is an error.
    pub err_on_fail: bool,
    pub use_cache: bool,
    /// Natural-units flags applied at construction.
    pub natural: NaturalUnits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: 0,
            err_on_fail: true,
            use_cache: true,
            natural: NaturalUnits::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.verbose, 0);
        assert!(cfg.err_on_fail);
        assert!(cfg.use_cache);
        assert!(!cfg.natural.any());
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Config::from_yaml_str("").unwrap(), Config::default());
    }

    #[test]
    fn partial_document() {
        let cfg = Config::from_yaml_str("verbose: 2\nnatural:\n  c_is_one: true\n").unwrap();
        assert_eq!(cfg.verbose, 2);
        assert!(cfg.err_on_fail);
        assert_eq!(cfg.natural, NaturalUnits::new(true, false, false));
    }

    #[test]
    fn yaml_roundtrip() {
        let cfg = Config {
            verbose: 1,
            err_on_fail: false,
            use_cache: false,
            natural: NaturalUnits::new(true, true, false),
        };
        let text = cfg.to_yaml_string().unwrap();
        assert_eq!(Config::from_yaml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn bad_yaml_is_reported() {
        let err = Config::from_yaml_str("verbose: [1, 2").unwrap_err();
        assert!(err.to_string().starts_with("YAML error"));
    }
}
