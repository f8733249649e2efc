use cashly_client::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] figment::Error),
    #[error("Unknown log level: {0}")]
    LogLevel(String),
    #[error("Could not set up logging: {0}")]
    Logging(#[from] log::SetLoggerError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0}")]
    Usage(String),
}
