use thiserror::Error;

#[derive(Error, Debug)]
pub enum TuningError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown operator '{operator}' (expected one of >=, >, <=, <)")]
    UnknownOperator { operator: String },

    #[error("Invalid threshold '{value}' for rule '{rule_id}' / population group '{population_group}'")]
    InvalidThreshold {
        rule_id: String,
        population_group: String,
        value: String,
    },

    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Parameter field '{field}' not present in alert data")]
    MissingField { field: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type TuningResult<T> = Result<T, TuningError>;
