use std::fmt;
use std::process::ExitStatus;

#[derive(Debug)]
pub enum OracleError {
    /// Oracle subprocess failed to spawn
    Spawn { program: String, source: std::io::Error },

    /// I/O on the oracle pipes failed
    Io(String),

    /// Oracle subprocess exited with non-zero status
    NonZeroExit { status: ExitStatus, stderr: String },

    /// Oracle did not answer within the hard per-call bound
    Timeout { secs: u64 },

    /// HTTP backend request failed
    Http(reqwest::Error),

    /// Open-question response carried no numeric token
    NoNumericToken { response: String },
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleError::Spawn { program, source } => {
                write!(f, "Failed to spawn oracle '{}': {}", program, source)
            }
            OracleError::Io(msg) => {
                write!(f, "Oracle I/O failed: {}", msg)
            }
            OracleError::NonZeroExit { status, stderr } => {
                write!(f, "Oracle exited with {}: {}", status, stderr)
            }
            OracleError::Timeout { secs } => {
                write!(f, "Oracle call timed out after {}s", secs)
            }
            OracleError::Http(source) => {
                write!(f, "Oracle HTTP request failed: {}", source)
            }
            OracleError::NoNumericToken { response } => {
                write!(f, "No numeric token in oracle response: '{}'", response)
            }
        }
    }
}

impl std::error::Error for OracleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OracleError::Spawn { source, .. } => Some(source),
            OracleError::Http(source) => Some(source),
            _ => None,
        }
    }
}
