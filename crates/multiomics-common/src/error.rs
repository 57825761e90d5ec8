use thiserror::Error;

#[derive(Debug, Error)]
pub enum CensusError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("E-utilities error: {0}")]
    Eutils(String),

    /// The server reported more hits than it was willing to return.
    #[error("Query returned more results than expected ({count} > {retmax})")]
    ResultCapExceeded { count: u64, retmax: u64 },

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Security error: {0}")]
    Security(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CensusError {
    /// Errors that abort a run outright instead of being retried.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CensusError::RetriesExhausted { .. }
                | CensusError::Security(_)
                | CensusError::Config(_)
                | CensusError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CensusError>;
