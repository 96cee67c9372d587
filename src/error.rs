use reqwest::StatusCode;

/// Everything that can abandon a single poll tick.
///
/// None of these escape the poller: the tick is logged and skipped, and the
/// next tick starts from scratch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("missing basic auth credentials")]
    MissingCredentials,

    #[error("missing config id")]
    MissingConfigId,

    #[error("invalid config id {0:?}: expected a number")]
    InvalidConfigId(String),

    #[error("error building request url: {0}")]
    Url(#[from] url::ParseError),

    #[error("error executing request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status code: {0}")]
    Status(StatusCode),

    #[error("error decoding response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("incomplete data received: {0}")]
    Incomplete(&'static str),
}

impl FetchError {
    /// Short, stable tag used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredentials | Self::MissingConfigId | Self::InvalidConfigId(_) => "config",
            Self::Url(_) => "url",
            Self::Transport(_) => "transport",
            Self::Status(_) => "status",
            Self::Decode(_) => "decode",
            Self::Incomplete(_) => "incomplete",
        }
    }
}
