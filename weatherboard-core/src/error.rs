/// Why an upstream request produced no payload.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("upstream returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to parse upstream JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Classify a transport error, keeping timeouts distinct.
    ///
    /// The request URL is stripped first; its query string carries the API key.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Network(err)
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::from_transport(err)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(
        "no valid locations configured.\n\
         Hint: set LOCATIONS (e.g. `Home:47.0,10.0;Office:47.1,10.2`) or LATITUDE and LONGITUDE."
    )]
    NoLocations,
}
