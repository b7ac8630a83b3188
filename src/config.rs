use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for the orientation client
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Where state and pending submissions live
    pub storage: StorageConfig,
    /// Submission endpoint and delivery behaviour
    pub submission: SubmissionConfig,
    /// Safety video settings
    pub video: VideoConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for everything the client writes
    pub data_dir: PathBuf,
    /// State file name, relative to `data_dir`
    pub state_file: String,
    /// Pending submission directory, relative to `data_dir`
    pub queue_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Endpoint that receives orientation and quiz submissions
    pub endpoint: String,
    /// Endpoint serving completion records for the dashboard
    pub dashboard_endpoint: Option<String>,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// Retries after the first attempt for transient failures
    pub max_retries: u32,
    /// First retry delay; doubles on each retry
    pub base_delay_ms: u64,
    /// Outgoing request rate limit
    pub requests_per_second: u32,
    /// Concurrent deliveries while syncing
    pub max_concurrent_deliveries: usize,
    /// Connectivity probe interval for `sync --watch`
    pub sync_interval_seconds: u64,
    /// How long fetched dashboard records may be served while offline
    pub dashboard_cache_ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Length of the safety video
    pub duration_seconds: f64,
    /// How far past the furthest watched point a seek may land
    pub seek_tolerance_seconds: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (overridden by RUST_LOG)
    pub log_level: String,
    /// Emit JSON log lines instead of compact text
    pub json_logs: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".safety-orientation"),
            state_file: "orientation-state.json".to_string(),
            queue_dir: "pending-submissions".to_string(),
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/orientation".to_string(),
            dashboard_endpoint: None,
            timeout_seconds: 10,
            max_retries: 3,
            base_delay_ms: 500,
            requests_per_second: 5,
            max_concurrent_deliveries: 4,
            sync_interval_seconds: 30,
            dashboard_cache_ttl_seconds: 300, // 5 minutes
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 600.0,
            seek_tolerance_seconds: crate::video::DEFAULT_SEEK_TOLERANCE_SECONDS,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl StorageConfig {
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(&self.state_file)
    }

    pub fn queue_path(&self) -> PathBuf {
        self.data_dir.join(&self.queue_dir)
    }
}

impl SubmissionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_seconds.max(1))
    }

    pub fn dashboard_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.dashboard_cache_ttl_seconds)
    }
}

impl OrientationConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (orientation.toml, .orientation-rc)
    /// 3. Environment variables (prefixed with ORIENTATION_, nested with __)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new("orientation.toml").exists() {
            builder = builder.add_source(File::with_name("orientation"));
        }

        if Path::new(".orientation-rc").exists() {
            builder = builder.add_source(
                File::with_name(".orientation-rc").format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("ORIENTATION")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<OrientationConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = OrientationConfig::load_env_file();
        OrientationConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static OrientationConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}
