//! Console-script entry points (`name = module.path:function`)

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{SfpError, Result};

/// Mapping from a command name to the callable a launcher invokes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryPoint {
    /// Command name installed on `PATH`
    pub name: String,
    /// Dotted module path
    pub module: String,
    /// Function inside the module
    pub function: String,
}

impl EntryPoint {
    /// Parse `name = module.path:function`
    pub fn parse(spec: &str) -> Result<Self> {
        lazy_static::lazy_static! {
            static ref DOTTED: Regex = Regex::new(
                r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$"
            ).unwrap();
        }

        let (name, target) = spec
            .split_once('=')
            .ok_or_else(|| SfpError::entry_point(spec, "expected `name = module:function`"))?;
        let (module, function) = target
            .split_once(':')
            .ok_or_else(|| SfpError::entry_point(spec, "missing `:` between module and function"))?;

        let name = name.trim();
        let module = module.trim();
        let function = function.trim();

        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(SfpError::entry_point(spec, "invalid command name"));
        }
        if !DOTTED.is_match(module) {
            return Err(SfpError::entry_point(spec, "invalid module path"));
        }
        if !DOTTED.is_match(function) {
            return Err(SfpError::entry_point(spec, "invalid function name"));
        }

        Ok(Self {
            name: name.to_string(),
            module: module.to_string(),
            function: function.to_string(),
        })
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}:{}", self.name, self.module, self.function)
    }
}

impl FromStr for EntryPoint {
    type Err = SfpError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for EntryPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntryPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sfp_entry_point() {
        let ep = EntryPoint::parse("sfp = simple_fast_project.main:run").unwrap();
        assert_eq!(ep.name, "sfp");
        assert_eq!(ep.module, "simple_fast_project.main");
        assert_eq!(ep.function, "run");
        assert_eq!(ep.to_string(), "sfp = simple_fast_project.main:run");
    }

    #[test]
    fn test_parse_ignores_spacing() {
        let ep: EntryPoint = "tool=pkg.cli:main".parse().unwrap();
        assert_eq!(ep.name, "tool");
        assert_eq!(ep.module, "pkg.cli");
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "sfp",
            "sfp = simple_fast_project.main",
            " = mod:run",
            "my tool = mod:run",
            "sfp = 1mod:run",
            "sfp = mod:",
            "sfp = mod..x:run",
        ] {
            assert!(
                matches!(EntryPoint::parse(bad), Err(SfpError::InvalidEntryPoint { .. })),
                "{} should not parse",
                bad
            );
        }
    }
}
