use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Course Studio
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CourseStudioConfig {
    /// Remote course service settings
    pub backend: BackendConfig,
    /// Course listing and lookup settings
    pub catalog: CatalogConfig,
    /// Preview/publish policy
    pub publish: PublishConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the REST API, e.g. `https://host/api`
    pub base_url: String,
    /// Prefix for uploaded asset paths (cover images, videos)
    pub files_url: String,
    /// Authorization token (can be set via env var)
    pub token: Option<String>,
    /// Per-request timeout
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Rows per page in the course table
    pub page_size: usize,
    /// How long lookup lists (categories, levels, ...) stay cached
    pub lookup_cache_ttl_seconds: u64,
    /// Maximum cached lookup responses
    pub lookup_cache_capacity: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublishConfig {
    /// Refuse to publish a course that has no chapters
    pub require_curriculum: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON lines instead of human-readable logs
    pub json_logs: bool,
}

impl Default for CourseStudioConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "https://qulms.runasp.net/api".to_string(),
                files_url: "https://qulms.runasp.net/".to_string(),
                token: None, // Will be read from env var or .course-studio-rc
                request_timeout_seconds: 30,
            },
            catalog: CatalogConfig {
                page_size: 6,
                lookup_cache_ttl_seconds: 300, // 5 minutes
                lookup_cache_capacity: 256,
            },
            publish: PublishConfig {
                require_curriculum: false,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: true,
            },
        }
    }
}

impl CourseStudioConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (course-studio.toml, .course-studio-rc)
    /// 3. Environment variables (prefixed with COURSE_STUDIO__)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if Path::new("course-studio.toml").exists() {
            builder = builder.add_source(File::with_name("course-studio"));
        }

        if Path::new(".course-studio-rc").exists() {
            builder = builder.add_source(
                File::with_name(".course-studio-rc").format(config::FileFormat::Toml),
            );
        }

        // Field names contain underscores, so nesting uses a double underscore
        builder = builder.add_source(
            Environment::with_prefix("COURSE_STUDIO")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut studio_config: CourseStudioConfig = builder.build()?.try_deserialize()?;
        studio_config.apply_token_fallback();
        Ok(studio_config)
    }

    /// Load configuration from an explicit TOML file layered over the defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path.as_ref()).format(config::FileFormat::Toml))
            .build()?;

        let mut studio_config: CourseStudioConfig = config.try_deserialize()?;
        studio_config.apply_token_fallback();
        Ok(studio_config)
    }

    fn apply_token_fallback(&mut self) {
        if self.backend.token.is_none() {
            if let Ok(token) = std::env::var("COURSE_STUDIO_TOKEN") {
                self.backend.token = Some(token);
            }
        }
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
static CONFIG: std::sync::LazyLock<Result<CourseStudioConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = CourseStudioConfig::load_env_file();
        CourseStudioConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static CourseStudioConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Force configuration loading at startup so errors surface before any command runs
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
