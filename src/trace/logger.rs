use std::{
    fs::OpenOptions,
    io::{self, BufRead, BufReader, Write},
    sync::Mutex,
};

use tracing::warn;

use crate::error::{DomError, Result};
use crate::history::record::StepRecord;

/// Append-only JSONL log of step records.
///
/// Failing to open the file only disables the logger; once open, every failed
/// write is reported to the caller.
pub struct HistoryLogger {
    path: String,
    file: Option<Mutex<std::fs::File>>,
}

impl HistoryLogger {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new().create(true).append(true).open(path);

        let file = match file {
            Ok(f) => Some(Mutex::new(f)),
            Err(e) => {
                warn!(path, error = %e, "could not open history log, logging disabled");
                None
            }
        };
        Self {
            path: path.to_string(),
            file,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    /// Append one record. `Ok(false)` means the logger is disabled and nothing
    /// was written.
    pub fn log(&self, record: &StepRecord) -> Result<bool> {
        let Some(file_mutex) = &self.file else {
            return Ok(false);
        };

        let json = serde_json::to_string(record).map_err(|e| DomError::json("step record", e))?;

        let mut file = file_mutex
            .lock()
            .map_err(|e| DomError::io(&self.path, io::Error::other(e.to_string())))?;
        writeln!(file, "{}", json).map_err(|e| DomError::io(&self.path, e))?;
        Ok(true)
    }
}

/// Read every step record from a JSONL history log. Blank lines are skipped.
pub fn load_history(path: &str) -> Result<Vec<StepRecord>> {
    let file = std::fs::File::open(path).map_err(|e| DomError::io(path, e))?;

    let mut records = Vec::new();
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| DomError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .map_err(|e| DomError::json(format!("{}:{}", path, line_no + 1), e))?;
        records.push(record);
    }
    Ok(records)
}
