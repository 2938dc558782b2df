//! Data models for the stakeholder mapper.
//!
//! This module contains the core data structures shared by the record
//! store, the aggregator, the hierarchy builder and the report exporter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Departments offered by the add form. Department stays free text;
/// anything outside this list is accepted with a warning.
pub const KNOWN_DEPARTMENTS: &[&str] = &[
    "Executive",
    "IT",
    "Finance",
    "Operations",
    "Legal",
    "Procurement",
    "Other",
];

/// Department name the executive-coverage recommendation looks for.
pub const EXECUTIVE_DEPARTMENT: &str = "Executive";

/// Unique, immutable identifier assigned when a record is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StakeholderId(pub u64);

impl fmt::Display for StakeholderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StakeholderId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(StakeholderId)
    }
}

/// Stance of a stakeholder toward the initiative being mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Champion,
    Supporter,
    Neutral,
    Skeptic,
    Blocker,
    /// Not yet classified.
    #[default]
    New,
}

impl Relationship {
    /// All relationships in form order.
    pub const ALL: [Relationship; 6] = [
        Relationship::Champion,
        Relationship::Supporter,
        Relationship::Neutral,
        Relationship::Skeptic,
        Relationship::Blocker,
        Relationship::New,
    ];

    /// Returns an emoji marker for terminal output.
    pub fn marker(&self) -> &'static str {
        match self {
            Relationship::Champion => "✅",
            Relationship::Supporter => "📈",
            Relationship::Neutral => "🎯",
            Relationship::Skeptic => "⚠️",
            Relationship::Blocker => "⛔",
            Relationship::New => "👤",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relationship::Champion => write!(f, "Champion"),
            Relationship::Supporter => write!(f, "Supporter"),
            Relationship::Neutral => write!(f, "Neutral"),
            Relationship::Skeptic => write!(f, "Skeptic"),
            Relationship::Blocker => write!(f, "Blocker"),
            Relationship::New => write!(f, "New"),
        }
    }
}

impl FromStr for Relationship {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "champion" => Ok(Relationship::Champion),
            "supporter" => Ok(Relationship::Supporter),
            "neutral" => Ok(Relationship::Neutral),
            "skeptic" => Ok(Relationship::Skeptic),
            "blocker" => Ok(Relationship::Blocker),
            "new" => Ok(Relationship::New),
            other => Err(format!(
                "unknown relationship '{}' (expected one of: champion, supporter, neutral, skeptic, blocker, new)",
                other
            )),
        }
    }
}

/// Display band for an influence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InfluenceBand {
    Low,
    Moderate,
    High,
    Critical,
}

impl InfluenceBand {
    pub fn from_score(influence: i64) -> Self {
        if influence >= 8 {
            InfluenceBand::Critical
        } else if influence >= 6 {
            InfluenceBand::High
        } else if influence >= 4 {
            InfluenceBand::Moderate
        } else {
            InfluenceBand::Low
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            InfluenceBand::Low => "🟢",
            InfluenceBand::Moderate => "🟡",
            InfluenceBand::High => "🟠",
            InfluenceBand::Critical => "🔴",
        }
    }

    /// CSS class used by the printable report.
    pub fn css_class(&self) -> &'static str {
        match self {
            InfluenceBand::Low => "influence-low",
            InfluenceBand::Moderate => "influence-moderate",
            InfluenceBand::High => "influence-high",
            InfluenceBand::Critical => "influence-critical",
        }
    }
}

/// Display band for a support score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SupportBand {
    Weak,
    Mixed,
    Strong,
}

impl SupportBand {
    pub fn from_score(support: i64) -> Self {
        if support >= 7 {
            SupportBand::Strong
        } else if support >= 4 {
            SupportBand::Mixed
        } else {
            SupportBand::Weak
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            SupportBand::Weak => "support-weak",
            SupportBand::Mixed => "support-mixed",
            SupportBand::Strong => "support-strong",
        }
    }
}

/// One tracked stakeholder.
///
/// Scores are plain integers: the store never clamps them, so a record can
/// carry values outside the nominal 1-10 / 1-5 ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeholderRecord {
    pub id: StakeholderId,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub department: String,
    /// Organisational power, nominally 1-10.
    pub influence: i64,
    /// Favourability toward the initiative, nominally 1-10.
    pub support: i64,
    /// Active participation, nominally 1-5.
    pub engagement: i64,
    #[serde(default)]
    pub relationship: Relationship,
    /// Name of the record this one reports to. `None` marks a root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_to: Option<String>,
}

impl StakeholderRecord {
    pub fn influence_band(&self) -> InfluenceBand {
        InfluenceBand::from_score(self.influence)
    }

    pub fn support_band(&self) -> SupportBand {
        SupportBand::from_score(self.support)
    }

    /// The reports-to name, treating blank as absent.
    pub fn parent_name(&self) -> Option<&str> {
        self.reports_to
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Contents of the add form.
#[derive(Debug, Clone, PartialEq)]
pub struct StakeholderDraft {
    pub name: String,
    pub title: String,
    pub department: String,
    pub influence: i64,
    pub support: i64,
    pub engagement: i64,
    pub relationship: Relationship,
    pub reports_to: Option<String>,
}

impl Default for StakeholderDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: String::new(),
            department: String::new(),
            influence: 5,
            support: 5,
            engagement: 3,
            relationship: Relationship::New,
            reports_to: None,
        }
    }
}

impl StakeholderDraft {
    /// Creates a draft with form defaults for everything but name and title.
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Whether the draft satisfies the add precondition.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.title.trim().is_empty()
    }

    pub(crate) fn into_record(self, id: StakeholderId) -> StakeholderRecord {
        StakeholderRecord {
            id,
            name: self.name,
            title: self.title,
            department: self.department,
            influence: self.influence,
            support: self.support,
            engagement: self.engagement,
            relationship: self.relationship,
            reports_to: self
                .reports_to
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
        }
    }
}

/// Field selector for in-place updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Name,
    Title,
    Department,
    Influence,
    Support,
    Engagement,
    Relationship,
    ReportsTo,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordField::Name => "name",
            RecordField::Title => "title",
            RecordField::Department => "department",
            RecordField::Influence => "influence",
            RecordField::Support => "support",
            RecordField::Engagement => "engagement",
            RecordField::Relationship => "relationship",
            RecordField::ReportsTo => "reports-to",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for RecordField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(RecordField::Name),
            "title" => Ok(RecordField::Title),
            "department" | "dept" => Ok(RecordField::Department),
            "influence" => Ok(RecordField::Influence),
            "support" => Ok(RecordField::Support),
            "engagement" => Ok(RecordField::Engagement),
            "relationship" => Ok(RecordField::Relationship),
            "reports-to" | "reports_to" | "reportsto" => Ok(RecordField::ReportsTo),
            other => Err(format!("unknown field '{}'", other)),
        }
    }
}

/// Contact details collected by the capture form before an export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub phone: String,
}

impl ContactDetails {
    /// Name and email are the only required fields; no format check.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

/// Derived statistics over the current record list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Mean influence, rounded to one decimal.
    pub avg_influence: f64,
    /// Mean support, rounded to one decimal.
    pub avg_support: f64,
    pub high_influence: usize,
    pub supporters: usize,
    /// High influence combined with low support.
    pub risks: usize,
    pub recommendations: Vec<String>,
}

/// Frozen copy of everything an export carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub date: NaiveDate,
    pub stakeholders: Vec<StakeholderRecord>,
    pub analysis: Option<AnalysisSummary>,
    pub contact: ContactDetails,
}

impl ReportSnapshot {
    /// Copies the given state; later changes to the sources do not reach it.
    pub fn capture(
        date: NaiveDate,
        stakeholders: &[StakeholderRecord],
        analysis: Option<&AnalysisSummary>,
        contact: &ContactDetails,
    ) -> Self {
        Self {
            date,
            stakeholders: stakeholders.to_vec(),
            analysis: analysis.cloned(),
            contact: contact.clone(),
        }
    }
}
