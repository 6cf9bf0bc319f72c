//! JSON run configuration: the file-based twin of the `check` flags.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

use preflight_model::Dialect;

/// Run configuration loaded from `--config`.
///
/// Explicit command-line flags take precedence over values given here.
#[derive(Debug, Default, Deserialize)]
pub struct RunConfig {
    /// Ordered field names the rows are expected to expose.
    pub fields: Option<Vec<String>>,

    /// Fields checked by the mandatory validator.
    #[serde(default)]
    pub mandatory: Vec<String>,

    /// Fields checked against a strftime date pattern.
    #[serde(default)]
    pub date_formats: BTreeMap<String, String>,

    /// Abort threshold. Absent keeps the default; JSON `null` disables the
    /// cap, hence the double Option.
    #[serde(default, deserialize_with = "errors_limit")]
    pub errors_limit: Option<Option<u64>>,

    /// Reader dialect overrides.
    pub dialect: Option<Dialect>,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parse config: {}", path.display()))?;
        Ok(config)
    }
}

fn errors_limit<'de, D>(deserializer: D) -> Result<Option<Option<u64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u64>::deserialize(deserializer).map(Some)
}
