//! Assembly policy configuration, read from a TOML file.
//!
//! ```toml
//! [assembly]
//! object = "body"
//! dedup = "group"
//! on_error = "skip"
//! normals = "flat"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::mesh::{AssembleOptions, DedupScope, ErrorPolicy, NormalPolicy, Selection};

pub const DEFAULT_CONFIG_FILE: &str = "scop.toml";

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub assembly: Option<AssemblyConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct AssemblyConfig {
    pub object: Option<String>,
    pub group: Option<String>,
    pub dedup: Option<DedupScope>,
    pub on_error: Option<ErrorPolicy>,
    pub normals: Option<NormalPolicy>,
}

impl Config {
    /// A missing file is not an error: it yields the defaults.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        return Config::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()));
    }

    pub fn from_toml(contents: &str) -> Result<Config> {
        let config: Config = toml::from_str(contents).context("Invalid TOML configuration")?;
        return Ok(config);
    }

    pub fn assemble_options(&self) -> AssembleOptions {
        let Some(assembly) = &self.assembly else {
            return AssembleOptions::default();
        };

        return AssembleOptions {
            selection: Selection {
                object: assembly.object.clone(),
                group: assembly.group.clone(),
            },
            dedup: assembly.dedup.unwrap_or_default(),
            on_error: assembly.on_error.unwrap_or_default(),
            normals: assembly.normals.unwrap_or_default(),
        };
    }
}
