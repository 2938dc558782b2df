//! Export strategies.
//!
//! An [`Exporter`] pairs one output strategy ([`ExportSink`]) with a target
//! directory. Both strategies read the same frozen [`ReportSnapshot`].

use super::generator::{generate_html_report, generate_json_report};
use crate::error::ExportError;
use crate::models::ReportSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Output mode for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Structured JSON download (default)
    #[default]
    Json,
    /// Printable HTML document
    Html,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Html => write!(f, "html"),
        }
    }
}

/// One way of turning a snapshot into a document.
pub trait ExportSink {
    fn format(&self) -> ExportFormat;

    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, snapshot: &ReportSnapshot) -> Result<String, ExportError>;
}

/// Structured-data sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSink;

impl ExportSink for JsonSink {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, snapshot: &ReportSnapshot) -> Result<String, ExportError> {
        Ok(generate_json_report(snapshot)?)
    }
}

/// Document-rendering sink for print-to-PDF.
#[derive(Debug, Clone, Copy)]
pub struct HtmlSink {
    /// Print on open, then close the window.
    pub auto_print: bool,
}

impl Default for HtmlSink {
    fn default() -> Self {
        Self { auto_print: true }
    }
}

impl ExportSink for HtmlSink {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    fn extension(&self) -> &'static str {
        "html"
    }

    fn render(&self, snapshot: &ReportSnapshot) -> Result<String, ExportError> {
        Ok(generate_html_report(snapshot, self.auto_print))
    }
}

/// A written report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub bytes: usize,
}

/// Writes snapshots through a chosen sink.
pub struct Exporter {
    sink: Box<dyn ExportSink>,
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(sink: Box<dyn ExportSink>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            sink,
            output_dir: output_dir.into(),
        }
    }

    /// Build the exporter for a format.
    pub fn for_format(format: ExportFormat, output_dir: &Path, auto_print: bool) -> Self {
        let sink: Box<dyn ExportSink> = match format {
            ExportFormat::Json => Box::new(JsonSink),
            ExportFormat::Html => Box::new(HtmlSink { auto_print }),
        };
        Self::new(sink, output_dir)
    }

    pub fn format(&self) -> ExportFormat {
        self.sink.format()
    }

    /// File name for a snapshot: `stakeholder-analysis-<YYYY-MM-DD>.<ext>`.
    pub fn file_name(&self, snapshot: &ReportSnapshot) -> String {
        format!(
            "stakeholder-analysis-{}.{}",
            snapshot.date.format("%Y-%m-%d"),
            self.sink.extension()
        )
    }

    /// Render the snapshot and write it to the output directory.
    pub fn export(&self, snapshot: &ReportSnapshot) -> Result<ExportArtifact, ExportError> {
        let content = self.sink.render(snapshot)?;

        std::fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::Write {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.output_dir.join(self.file_name(snapshot));
        std::fs::write(&path, &content).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

        info!(
            "Wrote {} report ({} bytes) to {}",
            self.format(),
            content.len(),
            path.display()
        );

        Ok(ExportArtifact {
            path,
            format: self.format(),
            bytes: content.len(),
        })
    }
}
