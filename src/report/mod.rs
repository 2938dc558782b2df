//! Report generation and export.
//!
//! Two interchangeable output strategies (structured JSON and printable
//! HTML) behind one exporter, gated by the contact capture flow.

pub mod capture;
pub mod exporter;
pub mod generator;

pub use capture::{CaptureState, LeadCapture};
pub use exporter::{ExportFormat, Exporter};
pub use generator::parse_json_report;
