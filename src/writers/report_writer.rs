use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analyzers::AnalysisReport;
use crate::error::Result;

/// Serializes the analysis report as JSON for chart-rendering consumers.
pub struct ReportWriter {
    pretty: bool,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn write<W: Write>(&self, report: &AnalysisReport, writer: W) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(writer, report)?;
        } else {
            serde_json::to_writer(writer, report)?;
        }
        Ok(())
    }

    pub fn write_to_path(&self, report: &AnalysisReport, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(report, &mut writer)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn to_json(&self, report: &AnalysisReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
