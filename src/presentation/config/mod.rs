mod environment;
mod settings;

pub use environment::{Environment, UnknownEnvironment};
pub use settings::{
    DatabaseProvider, DatabaseSettings, LanguagesSettings, LoggingSettings, OcrSettings,
    RasterizerSettings, ServerSettings, Settings, StorageSettings, WorkerSettings,
};
