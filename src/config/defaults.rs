/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
use std::time::Duration;

// Output defaults
pub const DEFAULT_OUTPUT_PATH: &str = "live/current.m3u8";
pub const DEFAULT_CREATE_NOJEKYLL: bool = true;

// Source fetch defaults
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_SOURCE_PRIORITY: u8 = 1;
pub const DEFAULT_JSON_POINTER: &str = "/data/m3u8Url";
pub const DEFAULT_SKIP_PREFIXES: &[&str] = &["更新时间", "TV"];

// Liveness probe defaults
pub const DEFAULT_PROBE_ENABLED: bool = true;
pub const DEFAULT_REQUIRE_IPV4: bool = true;
pub const DEFAULT_PROBE_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_PROBE_DEADLINE: Duration = Duration::from_secs(12);
pub const DEFAULT_PROBE_CONCURRENCY: usize = 15;
pub const DEFAULT_PROBE_RANGE_BYTES: u64 = 1023;

// Sequencing defaults
pub const DEFAULT_TIERED_SEQUENCING: bool = true;

// Environment overrides, e.g. CHANNEL_RECONCILER_PROBE__ENABLED=false
pub const ENV_PREFIX: &str = "CHANNEL_RECONCILER_";
