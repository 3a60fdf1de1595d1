//! Configuration file loading for agora
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables prefixed `AGORA_` (nested with `__`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./agora.toml` or `./.agora.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/agora/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAnthropicConfig, FileBackendConfig, FileConfig, FileDebateConfig, FileExecutionConfig,
    FileJudgeConfig, FileLocalConfig, FileLoggingConfig, FileOpenAiConfig, FileOutputConfig,
    FileOutputFormat, FileParticipantConfig, FileProvidersConfig, FileScoringSystem,
    ProviderKind,
};
pub use loader::ConfigLoader;
