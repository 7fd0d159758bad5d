use uuid::Uuid;

/// Failures while turning raw tabular input into signals.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("malformed CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV header has none of the expected columns (found: {0})")]
    UnrecognizedHeader(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("no input provided: supply a CSV file, text, or the demo set")]
    NoInput,

    #[error("report not found: {0}")]
    ReportNotFound(Uuid),

    #[error("tone rewrite failed: {0}")]
    Rewrite(String),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, Error>;
