use thiserror::Error;

/// Failures raised by a snapshot provider. The analysis engine itself never fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Invalid ticker provided: {0}")]
    InvalidTicker(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Malformed data: {0}")]
    MalformedData(String),
}

/// User-facing grouping of fetch failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    TickerNotFound,
    Connectivity,
    DataIntegrity,
}

impl FetchError {
    pub fn category(&self) -> FailureCategory {
        match self {
            FetchError::InvalidTicker(_) => FailureCategory::TickerNotFound,
            FetchError::Transport(_) => FailureCategory::Connectivity,
            FetchError::MalformedData(_) => FailureCategory::DataIntegrity,
        }
    }

    /// Only connectivity problems are worth retrying without user correction.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }

    /// Message shown to the end user for this failure
    pub fn user_message(&self) -> String {
        match self {
            FetchError::InvalidTicker(ticker) => format!(
                "Ticker \"{}\" not found. Please enter a valid stock ticker for NYSE or NASDAQ.",
                ticker
            ),
            FetchError::Transport(_) => "Could not connect to the financial data service. \
                 Please check your network connection and try again later."
                .to_string(),
            FetchError::MalformedData(_) => "Received unexpected data from the financial service. \
                 The data could not be processed."
                .to_string(),
        }
    }
}
