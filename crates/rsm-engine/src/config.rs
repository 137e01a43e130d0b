use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rsm_codec::DecodePolicy;
use rsm_fetch::HttpOptions;
use rsm_types::{Format, TargetId};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration, normally read from `rsm.toml`.
///
/// Relative paths are resolved against the directory of the config file by
/// [`RsmConfig::load`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RsmConfig {
    /// Output directory for JSON (sing-box) targets.
    pub json_dir: PathBuf,
    /// Output directory for YAML (mihomo) targets.
    pub yaml_dir: PathBuf,
    /// Per-fetch timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` sent with every fetch. Defaults to the fetcher's own.
    pub user_agent: Option<String>,
    /// Number of targets processed concurrently.
    pub workers: usize,
    /// Decode non-UTF-8 payloads as Latin-1 instead of rejecting them.
    pub allow_latin1_fallback: bool,
    pub targets: Vec<TargetConfig>,
    pub compiler: CompilerTable,
}

impl Default for RsmConfig {
    fn default() -> Self {
        Self {
            json_dir: PathBuf::from("singbox"),
            yaml_dir: PathBuf::from("mihomo"),
            timeout_secs: 30,
            user_agent: None,
            workers: 1,
            allow_latin1_fallback: true,
            targets: Vec::new(),
            compiler: CompilerTable::default(),
        }
    }
}

/// One configured target.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub name: String,
    pub format: Format,
    /// URLs given inline. Processed before those from `sources_file`.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Line-oriented URL list file.
    #[serde(default)]
    pub sources_file: Option<PathBuf>,
}

/// Compiler executables per format.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerTable {
    pub json: Option<CompilerSettings>,
    pub yaml: Option<CompilerSettings>,
}

impl CompilerTable {
    pub fn for_format(&self, format: Format) -> Option<&CompilerSettings> {
        match format {
            Format::Json => self.json.as_ref(),
            Format::Yaml => self.yaml.as_ref(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerSettings {
    pub executable: PathBuf,
    /// Rule behavior passed to mihomo (`domain`, `ipcidr`, `classical`).
    #[serde(default = "default_rule_type")]
    pub rule_type: String,
}

fn default_rule_type() -> String {
    "domain".to_string()
}

/// A validated target together with where its URLs come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetPlan {
    pub target: TargetId,
    pub sources: Vec<String>,
    pub sources_file: Option<PathBuf>,
}

impl TargetPlan {
    /// A plan with inline URLs only.
    pub fn new(target: TargetId, sources: Vec<String>) -> Self {
        Self {
            target,
            sources,
            sources_file: None,
        }
    }
}

impl RsmConfig {
    /// Read, parse, resolve, and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Make every relative path absolute with respect to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.json_dir);
        resolve(&mut self.yaml_dir);
        for target in &mut self.targets {
            if let Some(file) = target.sources_file.as_mut() {
                resolve(file);
            }
        }
    }

    /// Check limits, target names, and output uniqueness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Validation("workers must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation("timeout_secs must be at least 1".into()));
        }
        let mut seen = HashSet::new();
        for target in &self.targets {
            let id = TargetId::new(target.name.clone(), target.format)?;
            if !seen.insert(id.clone()) {
                return Err(ConfigError::Validation(format!("duplicate target {id}")));
            }
        }
        Ok(())
    }

    /// Plans for every configured target, in configuration order.
    pub fn plans(&self) -> Result<Vec<TargetPlan>, ConfigError> {
        self.targets
            .iter()
            .map(|t| {
                Ok(TargetPlan {
                    target: TargetId::new(t.name.clone(), t.format)?,
                    sources: t.sources.clone(),
                    sources_file: t.sources_file.clone(),
                })
            })
            .collect()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        DecodePolicy::from_fallback_flag(self.allow_latin1_fallback)
    }

    pub fn http_options(&self) -> HttpOptions {
        let mut options = HttpOptions {
            timeout: self.timeout(),
            ..HttpOptions::default()
        };
        if let Some(ua) = &self.user_agent {
            options.user_agent = ua.clone();
        }
        options
    }
}
