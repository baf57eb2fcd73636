use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Node.js subprocess failed to spawn (browser_server.js, detector, OCR)
    #[error("Failed to spawn {program}: {source}")]
    SubprocessSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// External command exited with non-zero status
    #[error("{program} exited with {status}: {stderr}")]
    SubprocessFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// Reading or writing the session pipes failed
    #[error("Browser session I/O: {0}")]
    SessionIO(String),

    /// browser_server.js answered `ok: false` or with a malformed payload
    #[error("Browser session command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The page never loaded
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    #[error("Visual detector failed: {0}")]
    Detector(String),

    #[error("Result delivery failed: {0}")]
    Sink(String),

    /// A run was requested that the resolved configuration cannot serve
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}
