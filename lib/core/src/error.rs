use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Product cache is empty")]
    Unavailable,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Product not found in filtered set: {0}")]
    NotInScope(String),

    #[error("Invalid limit: {value} (expected {min}..={max})")]
    InvalidLimit { value: usize, min: usize, max: usize },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True for the errors a caller would report as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ProductNotFound(_) | Error::NotInScope(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
