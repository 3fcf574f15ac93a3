use crate::domain::merchant::ExtractionReport;
use crate::domain::ports::ReportSink;
use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes extraction reports as pretty-printed UTF-8 JSON.
pub struct JsonReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonReportWriter<W> {
    /// Creates a new `JsonReportWriter` over any `Write` sink (e.g., File, Stdout).
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonReportWriter<BufWriter<File>> {
    /// Opens `path` for writing, replacing any previous report there.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            info!("Replacing previous output file: {}", path.display());
        }
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ReportSink for JsonReportWriter<W> {
    fn write_report(&mut self, report: &ExtractionReport) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
