//! Contact capture before export.
//!
//! A report is requested first, which opens the capture form if enough
//! stakeholders are mapped. Submitting complete contact details runs the
//! export and closes the form again. The contact is attached to that single
//! export and never kept.

use super::exporter::{ExportArtifact, ExportFormat, Exporter};
use crate::error::ExportError;
use crate::models::{AnalysisSummary, ContactDetails, ReportSnapshot, StakeholderRecord};
use chrono::NaiveDate;
use tracing::{debug, info};

/// State of the capture form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Closed,
    Open { format: ExportFormat },
}

/// Gatekeeper between "generate report" and the actual export.
#[derive(Debug, Clone)]
pub struct LeadCapture {
    state: CaptureState,
    min_stakeholders: usize,
}

impl LeadCapture {
    pub fn new(min_stakeholders: usize) -> Self {
        Self {
            state: CaptureState::Closed,
            min_stakeholders,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, CaptureState::Open { .. })
    }

    pub fn min_stakeholders(&self) -> usize {
        self.min_stakeholders
    }

    /// Ask for a report. Opens the form only when enough records exist.
    pub fn request(&mut self, stakeholders: usize, format: ExportFormat) -> Result<(), ExportError> {
        if stakeholders < self.min_stakeholders {
            return Err(ExportError::TooFewStakeholders {
                required: self.min_stakeholders,
                current: stakeholders,
            });
        }

        debug!("Capture form opened for {} export", format);
        self.state = CaptureState::Open { format };
        Ok(())
    }

    /// Close the form without exporting.
    pub fn cancel(&mut self) {
        self.state = CaptureState::Closed;
    }

    /// Submit the form and run the export.
    ///
    /// The minimum is checked again here, since records may have been removed
    /// while the form was open; falling below it closes the form. Incomplete
    /// contact details leave the form open. The snapshot is taken here, so the
    /// artifact reflects the records at submission time.
    pub fn submit(
        &mut self,
        contact: ContactDetails,
        stakeholders: &[StakeholderRecord],
        analysis: Option<&AnalysisSummary>,
        today: NaiveDate,
        exporter: impl FnOnce(ExportFormat) -> Exporter,
    ) -> Result<ExportArtifact, ExportError> {
        let CaptureState::Open { format } = self.state else {
            return Err(ExportError::NotRequested);
        };

        if stakeholders.len() < self.min_stakeholders {
            self.state = CaptureState::Closed;
            return Err(ExportError::TooFewStakeholders {
                required: self.min_stakeholders,
                current: stakeholders.len(),
            });
        }

        if !contact.is_complete() {
            return Err(ExportError::MissingContact);
        }

        debug!("Lead captured: {} <{}>", contact.name, contact.email);

        let snapshot = ReportSnapshot::capture(today, stakeholders, analysis, &contact);
        let artifact = exporter(format).export(&snapshot)?;

        self.state = CaptureState::Closed;
        info!(
            event = "report_generated",
            category = "engagement",
            format = %format,
            stakeholders = snapshot.stakeholders.len(),
            "Report generated"
        );

        Ok(artifact)
    }
}
