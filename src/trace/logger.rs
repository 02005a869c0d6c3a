use std::{fs::OpenOptions, io::Write, sync::Mutex};

use crate::trace::trace::SessionEvent;

/// Append-only JSONL log of session events.
///
/// A missing or unwritable trace file disables tracing with a warning; it
/// never fails the run.
pub struct TraceLog {
    file: Option<Mutex<std::fs::File>>,
}

impl TraceLog {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new().create(true).append(true).open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                eprintln!("Warning: could not open trace file '{}': {}", path, e);
                Self { file: None }
            }
        }
    }

    /// Logger that drops every event (tracing not configured).
    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn open(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::new(p),
            None => Self::disabled(),
        }
    }

    pub fn record(&self, event: &SessionEvent) {
        let file_mutex = match &self.file {
            Some(f) => f,
            None => return,
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Warning: failed to serialize trace event: {}", e);
                return;
            }
        };

        let mut file = match file_mutex.lock() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Warning: trace log lock poisoned: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(file, "{}", json) {
            eprintln!("Warning: failed to write trace event: {}", e);
        }
    }
}
