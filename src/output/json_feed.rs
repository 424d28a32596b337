//! JSON feed output
//!
//! Writes a run's product records as a single UTF-8 JSON array.

use crate::output::traits::{OutputHandler, OutputResult, ProductRecord};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Writes product records to a JSON array file, overwriting it each time
#[derive(Debug, Clone)]
pub struct JsonFeedWriter {
    path: PathBuf,
    pretty: bool,
}

impl JsonFeedWriter {
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }
}

impl OutputHandler for JsonFeedWriter {
    fn write_records(&mut self, records: &[ProductRecord]) -> OutputResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, records)?;
        } else {
            serde_json::to_writer(&mut writer, records)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!(
            "Wrote {} product records to {}",
            records.len(),
            self.path.display()
        );

        Ok(())
    }
}
