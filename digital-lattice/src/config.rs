//! TOML configuration for the `crr-digital` tool.
//!
//! ```toml
//! monitoring = "discrete"
//!
//! [lattice]
//! max_steps = 10000
//! parallel_threshold = 1024
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use dl_core::{Error, LatticeSettings, Result};
use dl_pricingengines::BarrierMonitoring;
use serde::Deserialize;
use std::path::Path;

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Step budget and parallel policy.
    pub lattice: LatticeSettings,
    /// Barrier monitoring convention (`"node-reach"` or `"discrete"`).
    pub monitoring: Option<String>,
}

impl CliConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        config.lattice.validate()?;
        config.monitoring()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// The configured monitoring convention, if any.
    pub fn monitoring(&self) -> Result<Option<BarrierMonitoring>> {
        self.monitoring.as_deref().map(str::parse).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_keeps_defaults() {
        let config = CliConfig::from_toml_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.monitoring().unwrap(), None);
    }

    #[test]
    fn full_document() {
        let config = CliConfig::from_toml_str(
            r#"
            monitoring = "discrete"

            [lattice]
            max_steps = 10000
            parallel_threshold = 1024
            "#,
        )
        .unwrap();
        assert_eq!(config.lattice.max_steps, 10_000);
        assert_eq!(config.lattice.parallel_threshold, 1_024);
        assert_eq!(config.monitoring().unwrap(), Some(BarrierMonitoring::Discrete));
    }

    #[test]
    fn partial_lattice_table() {
        let config = CliConfig::from_toml_str("[lattice]\nmax_steps = 750\n").unwrap();
        assert_eq!(config.lattice.max_steps, 750);
        assert_eq!(
            config.lattice.parallel_threshold,
            LatticeSettings::default().parallel_threshold
        );
    }

    #[test]
    fn invalid_documents_are_config_errors() {
        for source in [
            "[lattice]\nmax_steps = 0\n",
            "[lattice]\nthreads = 4\n",
            "monitoring = \"continuous\"\n",
            "max_steps = \"many\"\n",
        ] {
            assert!(
                CliConfig::from_toml_str(source).is_err(),
                "accepted invalid config {source:?}"
            );
        }
        assert!(matches!(
            CliConfig::from_toml_str("[lattice]\nthreads = 4\n"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            CliConfig::load("/definitely/not/here.toml"),
            Err(Error::Config(_))
        ));
    }
}
