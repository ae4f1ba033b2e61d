use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::metrics::pagerank::PageRankConfig;

/// File name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "collabnet.toml";

/// Storage backend used to hold the interaction graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Adjacency lists; memory proportional to edges.
    #[default]
    Sparse,
    /// Adjacency matrix; memory proportional to vertices squared.
    Dense,
}

impl Backend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sparse => "sparse",
            Self::Dense => "dense",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sparse" | "list" => Ok(Self::Sparse),
            "dense" | "matrix" => Ok(Self::Dense),
            other => Err(format!("unknown backend '{other}' (expected sparse or dense)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub pagerank: PageRankConfig,
    #[serde(default)]
    pub community: CommunityConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityConfig {
    /// Upper bound on Girvan–Newman edge removals.
    #[serde(default = "default_max_splits")]
    pub max_splits: usize,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            max_splits: default_max_splits(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// How many identities each ranking lists.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a TOML document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML for this shape.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse analysis config")
    }

    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Resolve the effective config.
    ///
    /// Order: `explicit` path (must exist), `collabnet.toml` under
    /// `working_dir`, `<config dir>/collabnet/config.toml`, defaults.
    /// Returns the config and the file it came from, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` does not exist, or if the chosen file
    /// cannot be read or parsed.
    pub fn resolve(explicit: Option<&Path>, working_dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        let user_path = dirs::config_dir().map(|dir| dir.join("collabnet/config.toml"));
        resolve_from(explicit, working_dir, user_path.as_deref())
    }

    /// Validate numeric ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first out-of-range field.
    pub fn validate(&self) -> Result<()> {
        let damping = self.pagerank.damping;
        if !(0.0..=1.0).contains(&damping) {
            bail!("pagerank.damping must be within [0, 1], got {damping}");
        }
        let tolerance = self.pagerank.tolerance;
        if tolerance.is_nan() || tolerance < 0.0 {
            bail!("pagerank.tolerance must be non-negative, got {tolerance}");
        }
        Ok(())
    }
}

fn resolve_from(
    explicit: Option<&Path>,
    working_dir: &Path,
    user_path: Option<&Path>,
) -> Result<(AnalysisConfig, Option<PathBuf>)> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("Config file {} does not exist", path.display());
        }
        return Ok((AnalysisConfig::load(path)?, Some(path.to_path_buf())));
    }

    let project_path = working_dir.join(PROJECT_CONFIG_FILE);
    let candidates = std::iter::once(project_path.as_path()).chain(user_path);
    for path in candidates {
        if path.exists() {
            debug!(path = %path.display(), "loading analysis config");
            return Ok((AnalysisConfig::load(path)?, Some(path.to_path_buf())));
        }
    }

    Ok((AnalysisConfig::default(), None))
}

const fn default_max_splits() -> usize {
    10
}

const fn default_top_k() -> usize {
    5
}
