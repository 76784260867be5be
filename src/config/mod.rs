use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub mod defaults;
pub mod duration_serde;

use crate::errors::AppError;
use crate::pipeline::stages::reconciliation::MergePolicy;
use crate::pipeline::stages::sequencing::SequencePolicy;
use crate::taxonomy::Category;
use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub reconcile: MergePolicy,
    #[serde(default)]
    pub sequence: SequencePolicy,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    /// Advertised XMLTV guide, written into the `#EXTM3U` header
    #[serde(default)]
    pub epg_url: Option<String>,
    /// Create a `.nojekyll` marker in the working directory
    #[serde(default = "default_create_nojekyll")]
    pub create_nojekyll: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout", with = "duration_serde::duration")]
    pub timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_enabled")]
    pub enabled: bool,
    /// Entries whose host has no IPv4 address are unreachable
    #[serde(default = "default_require_ipv4")]
    pub require_ipv4: bool,
    /// Timeout of a single HEAD or ranged GET
    #[serde(
        default = "default_probe_request_timeout",
        with = "duration_serde::duration"
    )]
    pub request_timeout: Duration,
    /// Upper bound for one probe including DNS and the fallback request
    #[serde(default = "default_probe_deadline", with = "duration_serde::duration")]
    pub deadline: Duration,
    #[serde(default = "default_probe_concurrency")]
    pub concurrency: usize,
    /// Last byte requested by the fallback `Range` GET
    #[serde(default = "default_probe_range_bytes")]
    pub range_bytes: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub extra_allowed: Vec<String>,
    #[serde(default)]
    pub extra_denied: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Query parameters dropped in addition to the built-in volatile set
    #[serde(default)]
    pub extra_volatile_params: Vec<String>,
}

/// Payload format of an upstream source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// `name,address` per line
    Plain,
    /// `#EXTINF` playlists
    M3u,
    /// JSON document carrying a single stream address
    JsonApi,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Plain => write!(f, "plain"),
            SourceFormat::M3u => write!(f, "m3u"),
            SourceFormat::JsonApi => write!(f, "json_api"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    pub format: SourceFormat,
    #[serde(default = "default_source_priority")]
    pub priority: u8,
    #[serde(default)]
    pub trusted: bool,
    /// Pin every entry of this source to one category
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    /// Lines starting with one of these are headings, not channels (plain lists)
    #[serde(default = "default_skip_prefixes")]
    pub skip_prefixes: Vec<String>,
    /// JSON pointer to the stream address (json_api)
    #[serde(default)]
    pub json_pointer: Option<String>,
    /// Channel name for the single json_api entry
    #[serde(default)]
    pub channel_name: Option<String>,
}

impl SourceConfig {
    pub fn new<N: Into<String>, U: Into<String>>(name: N, url: U, format: SourceFormat) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            format,
            priority: DEFAULT_SOURCE_PRIORITY,
            trusted: false,
            category: None,
            enabled: true,
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            skip_prefixes: default_skip_prefixes(),
            json_pointer: None,
            channel_name: None,
        }
    }

    pub fn json_pointer(&self) -> &str {
        self.json_pointer.as_deref().unwrap_or(DEFAULT_JSON_POINTER)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::configuration("source name must not be empty"));
        }
        if self.url.trim().is_empty() {
            return Err(AppError::configuration(format!(
                "source '{}' has no url",
                self.name
            )));
        }
        if self.format == SourceFormat::JsonApi && self.channel_name.is_none() {
            return Err(AppError::configuration(format!(
                "json_api source '{}' requires channel_name",
                self.name
            )));
        }
        Ok(())
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_create_nojekyll() -> bool {
    DEFAULT_CREATE_NOJEKYLL
}

fn default_fetch_timeout() -> Duration {
    DEFAULT_FETCH_TIMEOUT
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_probe_enabled() -> bool {
    DEFAULT_PROBE_ENABLED
}

fn default_require_ipv4() -> bool {
    DEFAULT_REQUIRE_IPV4
}

fn default_probe_request_timeout() -> Duration {
    DEFAULT_PROBE_REQUEST_TIMEOUT
}

fn default_probe_deadline() -> Duration {
    DEFAULT_PROBE_DEADLINE
}

fn default_probe_concurrency() -> usize {
    DEFAULT_PROBE_CONCURRENCY
}

fn default_probe_range_bytes() -> u64 {
    DEFAULT_PROBE_RANGE_BYTES
}

fn default_source_priority() -> u8 {
    DEFAULT_SOURCE_PRIORITY
}

fn default_enabled() -> bool {
    true
}

fn default_skip_prefixes() -> Vec<String> {
    DEFAULT_SKIP_PREFIXES.iter().map(|p| p.to_string()).collect()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            epg_url: None,
            create_nojekyll: default_create_nojekyll(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: default_probe_enabled(),
            require_ipv4: default_require_ipv4(),
            request_timeout: default_probe_request_timeout(),
            deadline: default_probe_deadline(),
            concurrency: default_probe_concurrency(),
            range_bytes: default_probe_range_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Layer built-in defaults, the TOML file and `CHANNEL_RECONCILER_*`
    /// environment variables. A missing file is created with the defaults.
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if !Path::new(config_file).exists() {
            let contents = toml::to_string_pretty(&Self::default())?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
        }

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.probe.concurrency == 0 {
            return Err(AppError::configuration("probe.concurrency must be at least 1"));
        }
        if self.probe.deadline < self.probe.request_timeout {
            return Err(AppError::configuration(
                "probe.deadline must not be shorter than probe.request_timeout",
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for source in &self.sources {
            source.validate()?;
            if !seen.insert(source.name.as_str()) {
                return Err(AppError::configuration(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
        }

        if self.sources.iter().all(|s| !s.enabled) {
            warn!("No enabled sources configured; the playlist will be empty");
        }
        Ok(())
    }

    /// Enabled sources in declaration order
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.enabled)
    }
}
