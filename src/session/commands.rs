//! Session command parsing.
//!
//! Each input line is split into shell-like tokens and parsed with clap,
//! so every command gets the same flag handling and error messages as the
//! top-level CLI.

use crate::models::{RecordField, Relationship, StakeholderId};
use crate::report::ExportFormat;
use clap::{Parser, Subcommand};

/// One parsed session line.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_subcommand = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Commands accepted by the interactive session.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Add a stakeholder (ignored when name or title is blank)
    Add {
        name: String,
        title: String,

        #[arg(short, long, default_value = "")]
        department: String,

        /// Name of the stakeholder this one reports to
        #[arg(short, long, value_name = "NAME")]
        reports_to: Option<String>,

        #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
        influence: i64,

        #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
        support: i64,

        #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
        engagement: i64,

        #[arg(long, default_value = "new")]
        relationship: Relationship,
    },

    /// Change one field of a stakeholder
    Set {
        id: StakeholderId,
        field: RecordField,
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },

    /// Remove a stakeholder
    #[command(alias = "rm")]
    Remove { id: StakeholderId },

    /// List stakeholders in insertion order
    #[command(alias = "ls")]
    List,

    /// Show the influence analysis
    Summary,

    /// Show the organisational chart
    Tree {
        /// Fail when a manager name matches no stakeholder
        #[arg(long)]
        strict: bool,
    },

    /// Request a report (opens the contact form)
    Report {
        #[arg(long)]
        format: Option<ExportFormat>,
    },

    /// Submit contact details and export the requested report
    Contact {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        company: String,

        #[arg(long, default_value = "")]
        phone: String,
    },

    /// Close the contact form without exporting
    Cancel,

    /// Show available commands
    Help,

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

impl SessionCommand {
    /// Whether the command changes the record list.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            SessionCommand::Add { .. } | SessionCommand::Set { .. } | SessionCommand::Remove { .. }
        )
    }
}

/// Parse a raw line. Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens = split_line(trimmed)?;
    SessionLine::try_parse_from(tokens)
        .map(|parsed| Some(parsed.command))
        .map_err(|e| e.to_string())
}

/// Split a line on whitespace, honouring single and double quotes.
///
/// Quoted empty strings produce empty tokens. A backslash inside double
/// quotes escapes the next character.
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => current.push(ch),
                        None => return Err("unterminated single quote".to_string()),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(ch) => current.push(ch),
                            None => return Err("unterminated double quote".to_string()),
                        },
                        Some(ch) => current.push(ch),
                        None => return Err("unterminated double quote".to_string()),
                    }
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}
