//! Report rendering.
//!
//! Renders a frozen [`ReportSnapshot`] either as pretty-printed JSON or as a
//! self-contained, printable HTML document.

use crate::analysis::relationship_distribution;
use crate::hierarchy::{self, OrgNode};
use crate::models::{
    AnalysisSummary, ContactDetails, InfluenceBand, ReportSnapshot, StakeholderRecord,
};
use anyhow::Result;
use html_escape::encode_text;

const STYLESHEET: &str = r#"
body { font-family: Arial, Helvetica, sans-serif; color: #1f2937; margin: 2rem; }
h1 { color: #1e3a8a; border-bottom: 2px solid #1e3a8a; padding-bottom: 0.5rem; }
h2 { color: #1e40af; margin-top: 2rem; }
table.summary td { padding: 0.25rem 1rem 0.25rem 0; }
ul.org-chart, ul.org-chart ul { list-style: none; padding-left: 1.5rem; border-left: 1px dashed #9ca3af; }
ul.org-chart { border-left: none; padding-left: 0; }
.profile { border: 1px solid #e5e7eb; border-radius: 6px; padding: 0.75rem; margin-bottom: 0.75rem; page-break-inside: avoid; }
.influence-critical { color: #dc2626; } .influence-high { color: #ea580c; }
.influence-moderate { color: #ca8a04; } .influence-low { color: #16a34a; }
.support-strong { color: #16a34a; } .support-mixed { color: #ca8a04; } .support-weak { color: #dc2626; }
.notice { color: #b45309; font-style: italic; }
@media print { body { margin: 0; } }
"#;

const PRINT_SCRIPT: &str = "<script>window.onload = function () { window.print(); window.close(); };</script>\n";

/// Generate a JSON report.
pub fn generate_json_report(snapshot: &ReportSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(snapshot)
}

/// Parse a JSON report back into a snapshot.
pub fn parse_json_report(content: &str) -> Result<ReportSnapshot> {
    serde_json::from_str(content).map_err(Into::into)
}

/// Generate a complete printable HTML report.
pub fn generate_html_report(snapshot: &ReportSnapshot, auto_print: bool) -> String {
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    output.push_str("<meta charset=\"utf-8\">\n");
    output.push_str(&format!(
        "<title>Stakeholder Analysis Report - {}</title>\n",
        snapshot.date.format("%Y-%m-%d")
    ));
    output.push_str(&format!("<style>{}</style>\n", STYLESHEET));
    if auto_print {
        output.push_str(PRINT_SCRIPT);
    }
    output.push_str("</head>\n<body>\n");

    output.push_str("<h1>Stakeholder Influence Analysis</h1>\n");
    output.push_str(&format!(
        "<p>Generated {}</p>\n",
        snapshot.date.format("%B %-d, %Y")
    ));

    output.push_str(&generate_contact_section(&snapshot.contact));
    output.push_str(&generate_summary_section(
        snapshot.analysis.as_ref(),
        &snapshot.stakeholders,
    ));
    output.push_str(&generate_org_chart_section(&snapshot.stakeholders));
    output.push_str(&generate_profiles_section(&snapshot.stakeholders));
    output.push_str(&generate_recommendations_section(snapshot.analysis.as_ref()));
    output.push_str(&generate_footer());

    output.push_str("</body>\n</html>\n");

    output
}

/// Generate the "prepared for" block.
fn generate_contact_section(contact: &ContactDetails) -> String {
    let mut section = String::new();

    section.push_str("<section class=\"contact\">\n");
    section.push_str(&format!(
        "<p><strong>Prepared for:</strong> {} &lt;{}&gt;",
        encode_text(&contact.name),
        encode_text(&contact.email)
    ));
    if !contact.company.trim().is_empty() {
        section.push_str(&format!(", {}", encode_text(&contact.company)));
    }
    if !contact.phone.trim().is_empty() {
        section.push_str(&format!(" | {}", encode_text(&contact.phone)));
    }
    section.push_str("</p>\n</section>\n");

    section
}

/// Generate the summary section.
fn generate_summary_section(
    analysis: Option<&AnalysisSummary>,
    stakeholders: &[StakeholderRecord],
) -> String {
    let mut section = String::new();

    section.push_str("<h2>Influence Analysis</h2>\n");

    let Some(analysis) = analysis else {
        section.push_str("<p class=\"notice\">No stakeholders were mapped.</p>\n");
        return section;
    };

    section.push_str("<table class=\"summary\">\n");
    section.push_str(&format!(
        "<tr><td>Total Stakeholders:</td><td><strong>{}</strong></td></tr>\n",
        stakeholders.len()
    ));
    section.push_str(&format!(
        "<tr><td>Average Influence:</td><td><strong>{:.1}/10</strong></td></tr>\n",
        analysis.avg_influence
    ));
    section.push_str(&format!(
        "<tr><td>High Influence:</td><td><strong>{} stakeholders</strong></td></tr>\n",
        analysis.high_influence
    ));
    section.push_str(&format!(
        "<tr><td>Average Support:</td><td><strong>{:.1}/10</strong></td></tr>\n",
        analysis.avg_support
    ));
    section.push_str(&format!(
        "<tr><td>Supporters:</td><td><strong class=\"support-strong\">{} stakeholders</strong></td></tr>\n",
        analysis.supporters
    ));
    section.push_str(&format!(
        "<tr><td>High-Risk:</td><td><strong class=\"support-weak\">{} stakeholders</strong></td></tr>\n",
        analysis.risks
    ));
    section.push_str("</table>\n");

    let distribution = relationship_distribution(stakeholders);
    if !distribution.is_empty() {
        section.push_str("<h3>By Relationship</h3>\n<ul>\n");
        for (relationship, count) in distribution {
            section.push_str(&format!("<li>{}: {}</li>\n", relationship, count));
        }
        section.push_str("</ul>\n");
    }

    section
}

/// Generate the organisational chart as nested lists.
fn generate_org_chart_section(stakeholders: &[StakeholderRecord]) -> String {
    let mut section = String::new();

    section.push_str("<h2>Organizational Hierarchy</h2>\n");

    match hierarchy::build(stakeholders) {
        Ok(chart) if chart.is_empty() => {
            section.push_str("<p class=\"notice\">No reporting lines could be charted.</p>\n");
        }
        Ok(chart) => {
            section.push_str("<ul class=\"org-chart\">\n");
            for root in chart.roots() {
                section.push_str(&render_org_node(root));
            }
            section.push_str("</ul>\n");
        }
        Err(e) => {
            section.push_str(&format!(
                "<p class=\"notice\">Chart omitted: {}</p>\n",
                encode_text(&e.to_string())
            ));
        }
    }

    section
}

fn render_org_node(node: &OrgNode) -> String {
    let mut item = String::new();

    item.push_str(&format!(
        "<li class=\"{}\"><strong>{}</strong> - {}",
        InfluenceBand::from_score(node.influence).css_class(),
        encode_text(&node.name),
        encode_text(&node.title)
    ));
    if !node.department.is_empty() {
        item.push_str(&format!(" ({})", encode_text(&node.department)));
    }

    if !node.children.is_empty() {
        item.push_str("\n<ul>\n");
        for child in &node.children {
            item.push_str(&render_org_node(child));
        }
        item.push_str("</ul>\n");
    }

    item.push_str("</li>\n");
    item
}

/// Generate one profile block per stakeholder, in insertion order.
fn generate_profiles_section(stakeholders: &[StakeholderRecord]) -> String {
    let mut section = String::new();

    section.push_str("<h2>Stakeholder Profiles</h2>\n");

    for stakeholder in stakeholders {
        section.push_str("<div class=\"profile\">\n");
        section.push_str(&format!(
            "<h3>{}</h3>\n<p>{}",
            encode_text(&stakeholder.name),
            encode_text(&stakeholder.title)
        ));
        if !stakeholder.department.is_empty() {
            section.push_str(&format!(" - {}", encode_text(&stakeholder.department)));
        }
        section.push_str("</p>\n");

        section.push_str(&format!(
            "<p>Influence: <span class=\"{}\">{}/10</span> | Support: <span class=\"{}\">{}/10</span> | Engagement: {}/5 | Relationship: {}</p>\n",
            stakeholder.influence_band().css_class(),
            stakeholder.influence,
            stakeholder.support_band().css_class(),
            stakeholder.support,
            stakeholder.engagement,
            stakeholder.relationship
        ));

        if let Some(manager) = stakeholder.parent_name() {
            section.push_str(&format!("<p>Reports to: {}</p>\n", encode_text(manager)));
        }

        section.push_str("</div>\n");
    }

    section
}

/// Generate the recommendations section.
fn generate_recommendations_section(analysis: Option<&AnalysisSummary>) -> String {
    let recommendations = match analysis {
        Some(a) if !a.recommendations.is_empty() => &a.recommendations,
        _ => return String::new(),
    };

    let mut section = String::new();

    section.push_str("<h2>Strategic Recommendations</h2>\n<ol>\n");
    for rec in recommendations {
        section.push_str(&format!("<li>{}</li>\n", encode_text(rec)));
    }
    section.push_str("</ol>\n");

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "<footer><hr><p><em>Report generated by StakeMap</em></p></footer>\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{summarize, Thresholds};
    use crate::models::{Relationship, StakeholderId};
    use chrono::NaiveDate;

    fn stakeholder(id: u64, name: &str, reports_to: Option<&str>) -> StakeholderRecord {
        StakeholderRecord {
            id: StakeholderId(id),
            name: name.to_string(),
            title: "Director".to_string(),
            department: "IT".to_string(),
            influence: 8,
            support: 3,
            engagement: 2,
            relationship: Relationship::Skeptic,
            reports_to: reports_to.map(String::from),
        }
    }

    fn create_test_snapshot() -> ReportSnapshot {
        let stakeholders = vec![
            stakeholder(1, "Ana", None),
            stakeholder(2, "Ben", Some("Ana")),
            stakeholder(3, "Cy <script>", Some("Ben")),
        ];
        let analysis = summarize(&stakeholders, &Thresholds::default());

        ReportSnapshot {
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            stakeholders,
            analysis,
            contact: ContactDetails {
                name: "Dana".to_string(),
                email: "dana@example.com".to_string(),
                company: "Acme".to_string(),
                phone: String::new(),
            },
        }
    }

    #[test]
    fn test_generate_json_report_shape() {
        let json = generate_json_report(&create_test_snapshot()).unwrap();

        assert!(json.contains("\"date\": \"2026-10-19\""));
        assert!(json.contains("\"stakeholders\""));
        assert!(json.contains("\"avgInfluence\": 8.0"));
        assert!(json.contains("\"contact\""));
        assert!(json.contains("\"reportsTo\": \"Ana\""));
    }

    #[test]
    fn test_json_report_parses_back() {
        let snapshot = create_test_snapshot();
        let json = generate_json_report(&snapshot).unwrap();
        let parsed = parse_json_report(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_generate_html_report_sections() {
        let html = generate_html_report(&create_test_snapshot(), true);

        assert!(html.contains("<title>Stakeholder Analysis Report - 2026-10-19</title>"));
        assert!(html.contains("<h2>Influence Analysis</h2>"));
        assert!(html.contains("<h2>Organizational Hierarchy</h2>"));
        assert!(html.contains("<h2>Stakeholder Profiles</h2>"));
        assert!(html.contains("<h2>Strategic Recommendations</h2>"));
        assert!(html.contains("window.print()"));
        assert!(html.contains("Dana"));
    }

    #[test]
    fn test_html_escapes_user_text() {
        let html = generate_html_report(&create_test_snapshot(), false);
        assert!(html.contains("Cy &lt;script&gt;"));
        assert!(!html.contains("Cy <script>"));
        assert!(!html.contains("window.print()"));
    }

    #[test]
    fn test_org_chart_nests_reports() {
        let section = generate_org_chart_section(&create_test_snapshot().stakeholders);

        let ana = section.find("<strong>Ana</strong>").unwrap();
        let ben = section.find("<strong>Ben</strong>").unwrap();
        let nested = section[ana..ben].matches("<ul>").count();
        assert_eq!(nested, 1);
    }

    #[test]
    fn test_org_chart_cycle_notice() {
        let stakeholders = vec![
            stakeholder(1, "Ana", Some("Ben")),
            stakeholder(2, "Ben", Some("Ana")),
        ];
        let section = generate_org_chart_section(&stakeholders);
        assert!(section.contains("Chart omitted: reporting cycle detected"));
    }

    #[test]
    fn test_recommendations_section_empty_without_analysis() {
        assert_eq!(generate_recommendations_section(None), "");
    }
}
