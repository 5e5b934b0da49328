use thiserror::Error;

/// Load-time failures. These are fatal: the process aborts start-up
/// rather than serving queries against a partial catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("data source {path}: {source}")]
    DataSource {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("table {table} is missing required column {column}")]
    Schema { table: String, column: String },
}

/// Per-query failures. Recovered at the HTTP boundary with a neutral
/// empty result so one bad selection never takes down the session.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}

pub type QueryResult<T> = Result<T, QueryError>;
