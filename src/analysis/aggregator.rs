//! Stakeholder aggregation and recommendations.
//!
//! The summary is a pure function of the record list. Callers recompute it
//! in full after every mutation; nothing here is patched incrementally.

use crate::models::{AnalysisSummary, Relationship, StakeholderRecord, EXECUTIVE_DEPARTMENT};
use std::collections::HashMap;

/// Score cut-offs used by the summary and the recommendation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Influence at or above which a stakeholder counts as high influence.
    pub high_influence: i64,
    /// Support at or above which a stakeholder counts as a supporter.
    pub supporter_support: i64,
    /// Support at or below which a high-influence stakeholder is a risk.
    pub risk_support: i64,
    /// Engagement at or below which a stakeholder counts as under-engaged.
    pub low_engagement: i64,
    /// Influence at or above which under-engagement matters.
    pub engagement_influence: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high_influence: 7,
            supporter_support: 6,
            risk_support: 4,
            low_engagement: 2,
            engagement_influence: 5,
        }
    }
}

impl From<&crate::config::AnalysisConfig> for Thresholds {
    fn from(config: &crate::config::AnalysisConfig) -> Self {
        Self {
            high_influence: config.high_influence,
            supporter_support: config.supporter_support,
            risk_support: config.risk_support,
            low_engagement: config.low_engagement,
            engagement_influence: config.engagement_influence,
        }
    }
}

impl Thresholds {
    fn is_high_influence(&self, s: &StakeholderRecord) -> bool {
        s.influence >= self.high_influence
    }

    fn is_risk(&self, s: &StakeholderRecord) -> bool {
        self.is_high_influence(s) && s.support <= self.risk_support
    }

    fn is_under_engaged(&self, s: &StakeholderRecord) -> bool {
        s.engagement <= self.low_engagement && s.influence >= self.engagement_influence
    }
}

/// Compute the summary for the current records.
///
/// Returns `None` for an empty list; there is no zeroed summary.
pub fn summarize(records: &[StakeholderRecord], thresholds: &Thresholds) -> Option<AnalysisSummary> {
    if records.is_empty() {
        return None;
    }

    let count = records.len() as f64;
    // Scores are unclamped, so an integer sum can overflow.
    let total_influence: f64 = records.iter().map(|s| s.influence as f64).sum();
    let total_support: f64 = records.iter().map(|s| s.support as f64).sum();

    Some(AnalysisSummary {
        avg_influence: round_one_decimal(total_influence / count),
        avg_support: round_one_decimal(total_support / count),
        high_influence: records
            .iter()
            .filter(|s| thresholds.is_high_influence(s))
            .count(),
        supporters: records
            .iter()
            .filter(|s| s.support >= thresholds.supporter_support)
            .count(),
        risks: records.iter().filter(|s| thresholds.is_risk(s)).count(),
        recommendations: generate_recommendations(records, thresholds),
    })
}

/// Produce the canned recommendations, in fixed rule order.
///
/// Each rule is evaluated independently, so zero to four lines come back.
pub fn generate_recommendations(
    records: &[StakeholderRecord],
    thresholds: &Thresholds,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    let has_champion = records
        .iter()
        .any(|s| s.relationship == Relationship::Champion && thresholds.is_high_influence(s));
    let skeptics = records.iter().filter(|s| thresholds.is_risk(s)).count();
    let under_engaged = records
        .iter()
        .filter(|s| thresholds.is_under_engaged(s))
        .count();
    let has_executive = records
        .iter()
        .any(|s| s.department == EXECUTIVE_DEPARTMENT);

    if !has_champion {
        recommendations.push(
            "Priority: Identify and cultivate champions among high-influence stakeholders"
                .to_string(),
        );
    }

    if skeptics > 0 {
        recommendations.push(format!(
            "Critical: Address concerns of {} high-influence skeptic(s)",
            skeptics
        ));
    }

    if under_engaged > 0 {
        recommendations.push(format!(
            "Action: Increase engagement with {} influential but under-engaged stakeholder(s)",
            under_engaged
        ));
    }

    if !has_executive {
        recommendations.push("Consider: Add executive-level stakeholders to your mapping".to_string());
    }

    recommendations
}

/// Count stakeholders per relationship, in form order, skipping empty ones.
pub fn relationship_distribution(records: &[StakeholderRecord]) -> Vec<(Relationship, usize)> {
    let mut counts: HashMap<Relationship, usize> = HashMap::new();

    for record in records {
        *counts.entry(record.relationship).or_default() += 1;
    }

    Relationship::ALL
        .into_iter()
        .filter_map(|rel| counts.get(&rel).map(|count| (rel, *count)))
        .collect()
}

/// Identify the high-risk stakeholders themselves (not just the count).
pub fn risk_stakeholders<'a>(
    records: &'a [StakeholderRecord],
    thresholds: &Thresholds,
) -> Vec<&'a StakeholderRecord> {
    records.iter().filter(|s| thresholds.is_risk(s)).collect()
}

/// Round to one decimal on the exact decimal expansion of the stored value,
/// so 1.15 (stored as 1.1499...) becomes 1.1. Exact halves such as 6.25
/// round away from zero.
fn round_one_decimal(value: f64) -> f64 {
    let scaled = value * 10.0;
    if (value * 4.0).fract() == 0.0 && scaled.fract().abs() == 0.5 {
        return scaled.round() / 10.0;
    }
    format!("{:.1}", value).parse().unwrap_or(value)
}
