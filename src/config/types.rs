use serde::Deserialize;

/// Catalog listing page crawled when no config file is given
pub const DEFAULT_CATALOG_ROOT: &str = "https://www.shl.com/solutions/products/product-catalog/";

/// Browser-like user agent sent on plain HTTP fetches
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36";

/// Main configuration structure for Sumi-Catalog
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub render: Option<RenderConfig>,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            retry: RetryConfig::default(),
            render: Some(RenderConfig::default()),
            user_agent: UserAgentConfig::default(),
            cache: CacheConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// How pages are retrieved for the whole crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// Plain request/response exchange
    Http,
    /// Page rendered by a headless browser service
    #[default]
    Rendered,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Top-level listing page where every crawl starts
    #[serde(rename = "catalog-root")]
    pub catalog_root: String,

    /// Maximum pagination hops from the catalog root
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of concurrent page fetches
    #[serde(
        rename = "max-concurrent-pages-open",
        default = "default_max_concurrent_pages_open"
    )]
    pub max_concurrent_pages_open: u32,

    #[serde(rename = "fetch-strategy", default)]
    pub fetch_strategy: FetchStrategy,

    /// Overall crawl deadline in seconds; unbounded when absent
    #[serde(rename = "deadline-secs", default)]
    pub deadline_secs: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            catalog_root: DEFAULT_CATALOG_ROOT.to_string(),
            max_depth: default_max_depth(),
            max_concurrent_pages_open: default_max_concurrent_pages_open(),
            fetch_strategy: FetchStrategy::default(),
            deadline_secs: None,
        }
    }
}

fn default_max_depth() -> u32 {
    5
}

fn default_max_concurrent_pages_open() -> u32 {
    4
}

/// Retry and backoff configuration for page fetches
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(rename = "base-delay-ms", default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Ceiling on any single backoff delay (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    2_000
}

fn default_max_delay_ms() -> u64 {
    10_000
}

/// Headless rendering service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Endpoint accepting `{"url": ...}` and returning the rendered markup
    pub endpoint: String,

    /// Lower bound of the randomized pause after each render (milliseconds)
    #[serde(rename = "settle-min-ms", default = "default_settle_min_ms")]
    pub settle_min_ms: u64,

    /// Upper bound of the randomized pause after each render (milliseconds)
    #[serde(rename = "settle-max-ms", default = "default_settle_max_ms")]
    pub settle_max_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/content".to_string(),
            settle_min_ms: default_settle_min_ms(),
            settle_max_ms: default_settle_max_ms(),
        }
    }
}

fn default_settle_min_ms() -> u64 {
    1_000
}

fn default_settle_max_ms() -> u64 {
    3_000
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Cached snapshot location and freshness policy
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Path to the JSON snapshot of records
    #[serde(default = "default_cache_path")]
    pub path: String,

    /// Snapshots at least this old are recrawled
    #[serde(rename = "max-age-days", default = "default_max_age_days")]
    pub max_age_days: u32,

    /// Snapshots must hold more than this many records to be reused
    #[serde(rename = "min-records", default = "default_min_records")]
    pub min_records: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            max_age_days: default_max_age_days(),
            min_records: default_min_records(),
        }
    }
}

fn default_cache_path() -> String {
    "./catalog_records.json".to_string()
}

fn default_max_age_days() -> u32 {
    7
}

fn default_min_records() -> usize {
    5
}

/// Export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV export
    #[serde(rename = "csv-path", default = "default_csv_path")]
    pub csv_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            summary_path: default_summary_path(),
        }
    }
}

fn default_csv_path() -> String {
    "./catalog_records.csv".to_string()
}

fn default_summary_path() -> String {
    "./catalog_summary.md".to_string()
}
