use thiserror::Error;

/// SDK-specific error types for critter client operations
#[derive(Debug, Error)]
pub enum CritterSdkError {
    /// Node unreachable or transport failure
    #[error("connection error: {0}")]
    Connection(String),

    /// Malformed contract interface description (startup-fatal)
    #[error("invalid contract interface: {0}")]
    Interface(String),

    /// The signing agent refused to grant wallet access
    #[error("wallet authorization denied: {0}")]
    AuthorizationDenied(String),

    /// A transaction was attempted without a ready session
    #[error("no active session: {0}")]
    Precondition(String),

    /// Signing declined or the node refused the submission
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    /// Read-only contract call failed; never corrupts session state
    #[error("contract query failed: {0}")]
    Query(String),

    /// Typed error returned by the node's RPC layer
    #[error("node rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Keystore file missing, unreadable, or malformed
    #[error("keystore error: {0}")]
    Keystore(String),

    /// JSON serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CritterSdkError {
    fn from(err: reqwest::Error) -> Self {
        CritterSdkError::Connection(err.to_string())
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, CritterSdkError>;
