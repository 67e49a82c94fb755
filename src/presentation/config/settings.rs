use std::path::PathBuf;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub ocr: OcrSettings,
    pub rasterizer: RasterizerSettings,
    pub worker: WorkerSettings,
    pub languages: LanguagesSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrSettings {
    pub tesseract_cmd: PathBuf,
    pub tessdata_dir: PathBuf,
    /// Tesseract `--oem` value.
    pub engine_mode: u8,
    pub default_language: String,
    pub page_concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RasterizerSettings {
    pub pdfium_library_dir: Option<PathBuf>,
    pub render_dpi: f32,
    pub max_pages: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    pub count: usize,
    pub queue_capacity: usize,
    pub job_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguagesSettings {
    pub file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub provider: DatabaseProvider,
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProvider {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Defaults, then `appsettings.<env>` (optional), then `APP_*` variables
    /// using `__` between nested keys, e.g. `APP_SERVER__PORT=8080`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::builder(environment)?.build()?.try_deserialize()
    }

    fn builder(
        environment: Environment,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Self::with_defaults(Config::builder())?
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ))
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.max_upload_mb", 50)?
            .set_default("storage.upload_dir", "/mnt/data/uploads")?
            .set_default("storage.output_dir", "/mnt/data/outputs")?
            .set_default("ocr.tesseract_cmd", "/usr/bin/tesseract")?
            .set_default("ocr.tessdata_dir", "/usr/share/tesseract-ocr/4.00/tessdata")?
            .set_default("ocr.engine_mode", 1)?
            .set_default("ocr.default_language", "eng")?
            .set_default("ocr.page_concurrency", 1)?
            .set_default("rasterizer.render_dpi", 200.0)?
            .set_default("rasterizer.max_pages", 500)?
            .set_default("worker.count", 2)?
            .set_default("worker.queue_capacity", 256)?
            .set_default("worker.job_timeout_secs", 600)?
            .set_default("languages.file", "languages.json")?
            .set_default("database.provider", "memory")?
            .set_default("database.max_connections", 10)?
            .set_default("logging.level", "info")?
            .set_default("logging.enable_json", false)
    }
}

impl Default for Settings {
    /// Built-in defaults only, no files or environment.
    fn default() -> Self {
        Self::with_defaults(Config::builder())
            .and_then(|builder| builder.build())
            .and_then(|config| config.try_deserialize())
            .expect("built-in defaults deserialize")
    }
}
