//! Interactive session.
//!
//! Reads commands line by line, applies them to the record store and
//! recomputes the analysis after every mutating command. All user-facing
//! failures are reported on the output and the session carries on.

pub mod commands;

use crate::analysis::{risk_stakeholders, summarize, Thresholds};
use crate::config::Config;
use crate::hierarchy;
use crate::models::{AnalysisSummary, ContactDetails, StakeholderDraft};
use crate::report::{CaptureState, ExportFormat, Exporter, LeadCapture};
use crate::store::RecordStore;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use commands::{parse_line, SessionCommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Export settings resolved from config and CLI.
#[derive(Debug, Clone)]
struct ExportSettings {
    default_format: ExportFormat,
    output_dir: PathBuf,
    auto_print: bool,
}

/// One user's working session.
pub struct Session<W: Write> {
    store: RecordStore,
    summary: Option<AnalysisSummary>,
    thresholds: Thresholds,
    capture: LeadCapture,
    export: ExportSettings,
    out: W,
    prompt: bool,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl<W: Write> Session<W> {
    /// Create a session over an existing store.
    pub fn new(store: RecordStore, config: &Config, out: W) -> Self {
        let thresholds = Thresholds::from(&config.analysis);
        let summary = summarize(store.records(), &thresholds);

        Self {
            store,
            summary,
            thresholds,
            capture: LeadCapture::new(config.export.min_stakeholders),
            export: ExportSettings {
                default_format: config.export.format,
                output_dir: config.general.output_dir.clone(),
                auto_print: config.export.auto_print,
            },
            out,
            prompt: false,
            today: local_today,
        }
    }

    /// Print a prompt before each line (interactive terminals).
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Override the date used for export file names.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn summary(&self) -> Option<&AnalysisSummary> {
        self.summary.as_ref()
    }

    pub fn capture(&self) -> &LeadCapture {
        &self.capture
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Recompute the analysis from scratch.
    pub fn recompute(&mut self) {
        self.summary = summarize(self.store.records(), &self.thresholds);
    }

    /// Process every line of input until EOF or `quit`.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        self.write_prompt()?;

        for line in input.lines() {
            let line = line.context("Failed to read session input")?;

            if self.execute_line(&line)? == Flow::Quit {
                debug!("Session ended by quit command");
                return Ok(());
            }

            self.write_prompt()?;
        }

        debug!("Session input exhausted");
        Ok(())
    }

    /// Parse and execute a single line.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        match parse_line(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Ok(Flow::Continue),
            Err(message) => {
                writeln!(self.out, "{}", message.trim_end())?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Execute a parsed command.
    pub fn execute(&mut self, command: SessionCommand) -> Result<Flow> {
        let mutates = command.is_mutation();

        match command {
            SessionCommand::Add {
                name,
                title,
                department,
                reports_to,
                influence,
                support,
                engagement,
                relationship,
            } => {
                let draft = StakeholderDraft {
                    department,
                    influence,
                    support,
                    engagement,
                    relationship,
                    reports_to,
                    ..StakeholderDraft::new(name, title)
                };
                if let Some(id) = self.store.add(draft) {
                    writeln!(self.out, "➕ Added stakeholder #{}", id)?;
                }
            }
            SessionCommand::Set { id, field, value } => {
                let value = value.unwrap_or_default();
                match self.store.update(id, field, &value) {
                    Ok(()) => writeln!(self.out, "✏️  Updated {} on #{}", field, id)?,
                    Err(e) => writeln!(self.out, "⚠️  {}", e)?,
                }
            }
            SessionCommand::Remove { id } => match self.store.remove(id) {
                Some(removed) => writeln!(self.out, "🗑️  Removed #{} {}", id, removed.name)?,
                None => writeln!(self.out, "⚠️  No stakeholder with id {}", id)?,
            },
            SessionCommand::List => self.print_list()?,
            SessionCommand::Summary => self.print_summary()?,
            SessionCommand::Tree { strict } => self.print_tree(strict)?,
            SessionCommand::Report { format } => {
                let format = format.unwrap_or(self.export.default_format);
                match self.capture.request(self.store.len(), format) {
                    Ok(()) => {
                        writeln!(self.out, "📝 Get your strategic analysis report ({})", format)?;
                        writeln!(
                            self.out,
                            "   Enter: contact --name <NAME> --email <EMAIL> [--company <COMPANY>] [--phone <PHONE>]"
                        )?;
                        writeln!(self.out, "   Or: cancel")?;
                    }
                    Err(e) => writeln!(self.out, "⚠️  {}", e)?,
                }
            }
            SessionCommand::Contact {
                name,
                email,
                company,
                phone,
            } => {
                let contact = ContactDetails {
                    name,
                    email,
                    company,
                    phone,
                };
                self.submit_contact(contact)?;
            }
            SessionCommand::Cancel => {
                if self.capture.state() == CaptureState::Closed {
                    writeln!(self.out, "No report request is open.")?;
                } else {
                    self.capture.cancel();
                    writeln!(self.out, "Report request cancelled.")?;
                }
            }
            SessionCommand::Help => self.print_help()?,
            SessionCommand::Quit => return Ok(Flow::Quit),
        }

        if mutates {
            self.recompute();
        }

        Ok(Flow::Continue)
    }

    fn submit_contact(&mut self, contact: ContactDetails) -> Result<()> {
        let export = &self.export;
        let result = self.capture.submit(
            contact,
            self.store.records(),
            self.summary.as_ref(),
            (self.today)(),
            |format| Exporter::for_format(format, &export.output_dir, export.auto_print),
        );

        match result {
            Ok(artifact) => {
                writeln!(
                    self.out,
                    "✅ Report saved to: {} ({} bytes)",
                    artifact.path.display(),
                    artifact.bytes
                )?;
                if artifact.format == ExportFormat::Html {
                    writeln!(
                        self.out,
                        "   Open it in a browser to print or save as PDF."
                    )?;
                }
            }
            Err(e) => {
                warn!("Export not completed: {}", e);
                writeln!(self.out, "⚠️  {}", e)?;
            }
        }

        Ok(())
    }

    fn print_list(&mut self) -> Result<()> {
        if self.store.is_empty() {
            writeln!(self.out, "No stakeholders yet. Use: add <NAME> <TITLE>")?;
            return Ok(());
        }

        for s in self.store.records() {
            let department = if s.department.is_empty() {
                String::new()
            } else {
                format!(" - {}", s.department)
            };
            writeln!(
                self.out,
                "#{} {} {} ({}{})",
                s.id,
                s.relationship.marker(),
                s.name,
                s.title,
                department
            )?;

            let reports_to = s
                .parent_name()
                .map(|name| format!(" | reports to {}", name))
                .unwrap_or_default();
            writeln!(
                self.out,
                "   {} Influence {}/10 | Support {}/10 | Engagement {}/5 | {}{}",
                s.influence_band().emoji(),
                s.influence,
                s.support,
                s.engagement,
                s.relationship,
                reports_to
            )?;
        }

        Ok(())
    }

    fn print_summary(&mut self) -> Result<()> {
        let Some(summary) = self.summary.as_ref() else {
            writeln!(self.out, "No stakeholders yet; nothing to analyse.")?;
            return Ok(());
        };

        writeln!(self.out, "📊 Influence Analysis:")?;
        writeln!(self.out, "   Average Influence: {:.1}/10", summary.avg_influence)?;
        writeln!(
            self.out,
            "   High Influence ({}+): {} stakeholders",
            self.thresholds.high_influence, summary.high_influence
        )?;
        writeln!(self.out, "   Average Support: {:.1}/10", summary.avg_support)?;
        writeln!(
            self.out,
            "   Supporters ({}+): {} stakeholders",
            self.thresholds.supporter_support, summary.supporters
        )?;
        writeln!(self.out, "   High-Risk: {} stakeholders", summary.risks)?;

        let risks = risk_stakeholders(self.store.records(), &self.thresholds);
        if !risks.is_empty() {
            let names: Vec<&str> = risks.iter().map(|s| s.name.as_str()).collect();
            writeln!(self.out, "   At risk: {}", names.join(", "))?;
        }

        if !summary.recommendations.is_empty() {
            writeln!(self.out, "\n🎯 Strategic Recommendations:")?;
            for rec in &summary.recommendations {
                writeln!(self.out, "   - {}", rec)?;
            }
        }

        Ok(())
    }

    fn print_tree(&mut self, strict: bool) -> Result<()> {
        let built = if strict {
            hierarchy::build_strict(self.store.records())
        } else {
            hierarchy::build(self.store.records())
        };

        match built {
            Ok(chart) => {
                debug!("Charted {} of {} stakeholders", chart.len(), self.store.len());

                if chart.is_empty() {
                    writeln!(self.out, "No reporting lines to chart.")?;
                } else {
                    write!(self.out, "{}", chart.render_text())?;
                }

                if !chart.detached().is_empty() {
                    let names: Vec<String> = chart
                        .detached()
                        .iter()
                        .filter_map(|id| self.store.get(*id))
                        .map(|s| format!("#{} {}", s.id, s.name))
                        .collect();
                    writeln!(
                        self.out,
                        "(not charted, manager not found: {})",
                        names.join(", ")
                    )?;
                }
            }
            Err(e) => writeln!(self.out, "⚠️  {}", e)?,
        }

        Ok(())
    }

    fn print_help(&mut self) -> Result<()> {
        writeln!(self.out, "Commands:")?;
        writeln!(self.out, "  add <NAME> <TITLE> [-d DEPT] [-r MANAGER] [--influence N] [--support N] [--engagement N] [--relationship R]")?;
        writeln!(self.out, "  set <ID> <FIELD> <VALUE>     fields: name, title, department, influence, support, engagement, relationship, reports-to")?;
        writeln!(self.out, "  remove <ID>")?;
        writeln!(self.out, "  list | summary | tree")?;
        writeln!(self.out, "  report [--format json|html]  (needs at least {} stakeholders)", self.capture.min_stakeholders())?;
        writeln!(self.out, "  contact --name <NAME> --email <EMAIL> [--company C] [--phone P]")?;
        writeln!(self.out, "  cancel | help | quit")?;
        Ok(())
    }

    fn write_prompt(&mut self) -> Result<()> {
        if self.prompt {
            write!(self.out, "stakemap> ")?;
            self.out.flush()?;
        }
        Ok(())
    }
}
