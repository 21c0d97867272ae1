//! Optional TOML configuration.
//!
//! ```toml
//! package = "com.craftinginterpreters.lox"
//! imports = ["java.util.List"]
//! indent = "    "
//! schemas = ["schema/lox.ast"]
//! ```
//!
//! Every key is optional. Relative schema paths are resolved against the
//! directory containing the config file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{emit::EmitOptions, error::ConfigError};


#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub package: Option<String>,
    pub imports: Option<Vec<String>>,
    pub indent: Option<String>,
    pub schemas: Vec<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let mut config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;

        if let Some(base) = path.parent() {
            for schema in &mut config.schemas {
                if schema.is_relative() {
                    *schema = base.join(&*schema);
                }
            }
        }

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn emit_options(&self) -> EmitOptions {
        let defaults = EmitOptions::default();
        EmitOptions {
            package: self.package.clone(),
            imports: self.imports.clone().unwrap_or(defaults.imports),
            indent: self.indent.clone().unwrap_or(defaults.indent),
        }
    }
}
