//! Error types for the inspection tool.
//!
//! [`InspectError`] wraps every failure `main` can propagate with `?`.

/// Top-level error for the `jade-inspect` binary.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: jade_content::ConfigError,
    },

    /// Reading the input or writing the output failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Decoding or validating the content failed.
    #[error("content error: {source}")]
    Content {
        /// The underlying content error.
        #[from]
        source: jade_content::ContentError,
    },

    /// Rendering the decoded tree failed.
    #[error("render error: {source}")]
    Render {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The command line could not be understood.
    #[error("usage: {message}")]
    Usage {
        /// What was wrong with the arguments.
        message: String,
    },
}
