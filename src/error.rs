use thiserror::Error;

/// Failures that stop the whole run rather than a single address.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("Input error: {0}")]
    Input(#[from] crate::addresses::InputError),
    #[error("Export error: {0}")]
    Export(#[from] crate::export::ExportError),
}
