//! Analyzer configuration
//!
//! A single boolean, defaulting to `true`, controlling whether scope pops
//! print their symbol table. Loaded from an optional TOML file so the CLI
//! and embedders can share one config format.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// When false, scope pops are silent (no symbol-table dump).
    pub dump_symbol_tables: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            dump_symbol_tables: true,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Failed to parse analyzer config: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dumps_symbol_tables() {
        assert!(AnalyzerConfig::default().dump_symbol_tables);
    }

    #[test]
    fn toml_overrides_default() {
        let cfg = AnalyzerConfig::from_toml("dump_symbol_tables = false").unwrap();
        assert!(!cfg.dump_symbol_tables);
    }

    #[test]
    fn empty_toml_keeps_default() {
        let cfg = AnalyzerConfig::from_toml("").unwrap();
        assert!(cfg.dump_symbol_tables);
    }

    #[test]
    fn invalid_toml_is_reported_as_error() {
        let err = AnalyzerConfig::from_toml("not valid = = toml").unwrap_err();
        assert!(err.contains("Failed to parse analyzer config"));
    }
}
