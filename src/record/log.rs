use std::fs::OpenOptions;

use crate::error::DriveError;

/// Lines of a card's display text captured per record.
pub const RECORD_LINES: usize = 4;

/// One successful submission: the first lines of the item's display text,
/// captured at the moment the item was opened. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRecord {
    pub fields: Vec<String>,
}

impl ApplicationRecord {
    pub fn from_item_text(text: &str) -> Self {
        let fields = text
            .lines()
            .take(RECORD_LINES)
            .map(|line| line.to_string())
            .collect();
        Self { fields }
    }
}

/// Append-only CSV log of submissions.
///
/// Opened in append mode so partial runs are never overwritten; created if
/// absent, never truncated, and flushed after every row so each submission's
/// record stands on its own.
pub struct ApplicationLog {
    path: String,
    writer: csv::Writer<std::fs::File>,
}

impl ApplicationLog {
    pub fn open(path: &str) -> Result<Self, DriveError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| DriveError::RecordOpen {
                path: path.to_string(),
                source: e,
            })?;

        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);

        Ok(Self {
            path: path.to_string(),
            writer,
        })
    }

    pub fn append(&mut self, record: &ApplicationRecord) -> Result<(), DriveError> {
        self.writer
            .write_record(&record.fields)
            .map_err(|e| DriveError::RecordWrite {
                path: self.path.clone(),
                detail: e.to_string(),
            })?;
        self.writer.flush().map_err(|e| DriveError::RecordWrite {
            path: self.path.clone(),
            detail: e.to_string(),
        })?;
        Ok(())
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
