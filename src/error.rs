use std::fmt;

#[derive(Debug)]
pub enum DriveError {
    /// Driver subprocess failed to spawn
    SubprocessSpawn { script: String, source: std::io::Error },

    /// I/O on the driver pipes failed
    SessionIo(String),

    /// JSON parsing failed (driver response)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (request to the driver)
    JsonSerialize { context: String, source: serde_json::Error },

    /// Driver reported a failed command
    Protocol { command: String, error: String },

    /// A bounded wait elapsed without the expected condition
    WaitTimeout { what: String, timeout_ms: u64 },

    /// Record file could not be opened
    RecordOpen { path: String, source: std::io::Error },

    /// Appending to the record file failed
    RecordWrite { path: String, detail: String },
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveError::SubprocessSpawn { script, source } => {
                write!(f, "Failed to spawn {} (is Node.js installed?): {}", script, source)
            }
            DriveError::SessionIo(msg) => {
                write!(f, "Driver session I/O failed: {}", msg)
            }
            DriveError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            DriveError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            DriveError::Protocol { command, error } => {
                write!(f, "Driver command '{}' failed: {}", command, error)
            }
            DriveError::WaitTimeout { what, timeout_ms } => {
                write!(f, "Timed out after {}ms waiting for {}", timeout_ms, what)
            }
            DriveError::RecordOpen { path, source } => {
                write!(f, "Could not open record file '{}': {}", path, source)
            }
            DriveError::RecordWrite { path, detail } => {
                write!(f, "Could not append to record file '{}': {}", path, detail)
            }
        }
    }
}

impl std::error::Error for DriveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriveError::SubprocessSpawn { source, .. } => Some(source),
            DriveError::JsonParse { source, .. } => Some(source),
            DriveError::JsonSerialize { source, .. } => Some(source),
            DriveError::RecordOpen { source, .. } => Some(source),
            _ => None,
        }
    }
}
