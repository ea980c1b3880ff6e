use crate::core::message::Message;
use std::error::Error;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Plain-text transcript written as messages are committed.
pub struct TranscriptLog {
    file_path: Option<PathBuf>,
}

impl TranscriptLog {
    pub fn disabled() -> Self {
        Self { file_path: None }
    }

    pub fn new(log_file: Option<PathBuf>) -> Result<Self, Box<dyn Error>> {
        if let Some(path) = &log_file {
            test_file_access(path)?;
        }
        Ok(Self {
            file_path: log_file,
        })
    }

    pub fn is_active(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn log_message(&self, message: &Message) -> Result<(), Box<dyn Error>> {
        let Some(file_path) = &self.file_path else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        let prefixed = format!("{}: {}", message.role.display_name(), message.content);
        for line in prefixed.lines() {
            writeln!(writer, "{line}")?;
        }
        // Blank line between messages, matching the on-screen spacing
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }

    pub fn get_status_string(&self) -> String {
        match &self.file_path {
            None => "off".to_string(),
            Some(path) => path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned(),
        }
    }
}

fn test_file_access(path: &Path) -> Result<(), Box<dyn Error>> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()?;
    Ok(())
}
