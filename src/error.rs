// Error types for the forge client.
// Covers transport failures, non-success statuses, decoding and configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("GitHub API returned {status} for {url}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response from {url}: {reason}")]
    UnexpectedResponse { url: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing GitHub token (set GITHUB_FORGE_TOKEN or GITHUB_TOKEN, or `token` in the config file)")]
    MissingToken,

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForgeError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ForgeError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<toml::de::Error> for ForgeError {
    fn from(err: toml::de::Error) -> Self {
        ForgeError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_helpers() {
        let err = ForgeError::Status {
            status: 404,
            url: "https://api.github.com/users/ghost".to_string(),
            body: String::new(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());

        let err = ForgeError::Transport("connection reset".to_string());
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());
    }
}
