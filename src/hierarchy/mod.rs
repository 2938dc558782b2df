//! Organisational chart built from reports-to references.
//!
//! Records name their manager by name. Names are first resolved to record
//! positions (the first record bearing a name wins), then records are grouped
//! under their resolved parent in a single pass. Records with no manager are
//! roots. A record whose manager cannot be resolved is detached: it appears
//! in no rendered branch, and neither do its own reports.

use crate::error::HierarchyError;
use crate::models::{Relationship, StakeholderId, StakeholderRecord};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One rendered stakeholder and its direct reports.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgNode {
    pub id: StakeholderId,
    pub name: String,
    pub title: String,
    pub department: String,
    pub relationship: Relationship,
    pub influence: i64,
    pub children: Vec<OrgNode>,
}

impl OrgNode {
    /// Number of nodes in this subtree, including this one.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(OrgNode::size).sum::<usize>()
    }
}

/// Forest of reporting lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrgChart {
    roots: Vec<OrgNode>,
    detached: Vec<StakeholderId>,
}

#[derive(Debug, Clone, Copy)]
enum Parent<'a> {
    Root,
    Resolved(usize),
    Dangling(&'a str),
}

/// Build the chart, dropping records with unresolvable managers.
pub fn build(records: &[StakeholderRecord]) -> Result<OrgChart, HierarchyError> {
    ChartBuilder::new(records).build()
}

/// Build the chart, rejecting any manager name that matches no record.
pub fn build_strict(records: &[StakeholderRecord]) -> Result<OrgChart, HierarchyError> {
    let builder = ChartBuilder::new(records);

    if let Some((child, parent)) = builder.first_dangling() {
        return Err(HierarchyError::UnknownParent {
            child: records[child].name.clone(),
            parent: parent.to_string(),
        });
    }

    builder.build()
}

struct ChartBuilder<'a> {
    records: &'a [StakeholderRecord],
    parents: Vec<Parent<'a>>,
    children: Vec<Vec<usize>>,
}

impl<'a> ChartBuilder<'a> {
    fn new(records: &'a [StakeholderRecord]) -> Self {
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            by_name.entry(record.name.as_str()).or_insert(idx);
        }

        let mut parents = Vec::with_capacity(records.len());
        let mut children = vec![Vec::new(); records.len()];

        for (idx, record) in records.iter().enumerate() {
            let parent = match record.parent_name() {
                None => Parent::Root,
                Some(name) => match by_name.get(name) {
                    Some(&parent_idx) => {
                        children[parent_idx].push(idx);
                        Parent::Resolved(parent_idx)
                    }
                    None => Parent::Dangling(name),
                },
            };
            parents.push(parent);
        }

        Self {
            records,
            parents,
            children,
        }
    }

    fn first_dangling(&self) -> Option<(usize, &'a str)> {
        self.parents.iter().enumerate().find_map(|(idx, parent)| match parent {
            Parent::Dangling(name) => Some((idx, *name)),
            _ => None,
        })
    }

    /// Walk every parent chain once; a chain that revisits itself is a cycle.
    fn check_cycles(&self) -> Result<(), HierarchyError> {
        let mut settled = vec![false; self.records.len()];

        for start in 0..self.records.len() {
            let mut path: Vec<usize> = Vec::new();
            let mut on_path: HashSet<usize> = HashSet::new();
            let mut current = start;

            loop {
                if settled[current] {
                    break;
                }
                if !on_path.insert(current) {
                    let from = path.iter().position(|&idx| idx == current).unwrap_or(0);
                    let mut members: Vec<String> = path[from..]
                        .iter()
                        .map(|&idx| self.records[idx].name.clone())
                        .collect();
                    members.push(self.records[current].name.clone());
                    return Err(HierarchyError::Cycle { members });
                }
                path.push(current);

                match self.parents[current] {
                    Parent::Resolved(parent) => current = parent,
                    Parent::Root | Parent::Dangling(_) => break,
                }
            }

            for idx in path {
                settled[idx] = true;
            }
        }

        Ok(())
    }

    fn build(self) -> Result<OrgChart, HierarchyError> {
        self.check_cycles()?;

        let mut reached = vec![false; self.records.len()];
        let roots: Vec<OrgNode> = self
            .parents
            .iter()
            .enumerate()
            .filter(|(_, parent)| matches!(parent, Parent::Root))
            .map(|(idx, _)| self.node(idx, &mut reached))
            .collect();

        let detached: Vec<StakeholderId> = self
            .records
            .iter()
            .zip(&reached)
            .filter(|(_, reached)| !**reached)
            .map(|(record, _)| record.id)
            .collect();

        if !detached.is_empty() {
            debug!("{} stakeholder(s) detached from the chart", detached.len());
        }

        Ok(OrgChart { roots, detached })
    }

    fn node(&self, idx: usize, reached: &mut [bool]) -> OrgNode {
        reached[idx] = true;
        let record = &self.records[idx];

        OrgNode {
            id: record.id,
            name: record.name.clone(),
            title: record.title.clone(),
            department: record.department.clone(),
            relationship: record.relationship,
            influence: record.influence,
            children: self.children[idx]
                .iter()
                .map(|&child| self.node(child, reached))
                .collect(),
        }
    }
}

impl OrgChart {
    pub fn roots(&self) -> &[OrgNode] {
        &self.roots
    }

    /// Records left out of every branch, in insertion order.
    pub fn detached(&self) -> &[StakeholderId] {
        &self.detached
    }

    /// Number of rendered nodes.
    pub fn len(&self) -> usize {
        self.roots.iter().map(OrgNode::size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Depth-first, pre-order listing of `(depth, node)`.
    pub fn walk(&self) -> Vec<(usize, &OrgNode)> {
        fn visit<'n>(node: &'n OrgNode, depth: usize, out: &mut Vec<(usize, &'n OrgNode)>) {
            out.push((depth, node));
            for child in &node.children {
                visit(child, depth + 1, out);
            }
        }

        let mut out = Vec::new();
        for root in &self.roots {
            visit(root, 0, &mut out);
        }
        out
    }

    /// Render as indented text, two spaces per level.
    pub fn render_text(&self) -> String {
        let mut output = String::new();

        for (depth, node) in self.walk() {
            output.push_str(&"  ".repeat(depth));
            output.push_str(&format!("- {} {} ({}", node.relationship.marker(), node.name, node.title));
            if !node.department.is_empty() {
                output.push_str(&format!(", {}", node.department));
            }
            output.push_str(")\n");
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, name: &str, reports_to: &str) -> StakeholderRecord {
        StakeholderRecord {
            id: StakeholderId(id),
            name: name.to_string(),
            title: "Title".to_string(),
            department: String::new(),
            influence: 5,
            support: 5,
            engagement: 3,
            relationship: Relationship::New,
            reports_to: (!reports_to.is_empty()).then(|| reports_to.to_string()),
        }
    }

    fn names(nodes: &[OrgNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_dangling_reference_is_dropped() {
        let records = vec![record(1, "A", ""), record(2, "B", "A"), record(3, "C", "Z")];
        let chart = build(&records).unwrap();

        assert_eq!(names(chart.roots()), vec!["A"]);
        assert_eq!(names(&chart.roots()[0].children), vec!["B"]);
        assert_eq!(chart.len(), 2);
        assert_eq!(chart.detached(), &[StakeholderId(3)]);
        assert!(!chart.render_text().contains("C ("));
    }

    #[test]
    fn test_reports_under_dangling_record_are_detached() {
        let records = vec![record(1, "A", ""), record(2, "C", "Z"), record(3, "D", "C")];
        let chart = build(&records).unwrap();

        assert_eq!(chart.len(), 1);
        assert_eq!(chart.detached(), &[StakeholderId(2), StakeholderId(3)]);
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let records = vec![
            record(1, "A", ""),
            record(2, "C", "A"),
            record(3, "B", "A"),
            record(4, "E", ""),
            record(5, "D", "B"),
        ];
        let chart = build(&records).unwrap();

        assert_eq!(names(chart.roots()), vec!["A", "E"]);
        assert_eq!(names(&chart.roots()[0].children), vec!["C", "B"]);

        let walked: Vec<(usize, &str)> = chart
            .walk()
            .into_iter()
            .map(|(depth, node)| (depth, node.name.as_str()))
            .collect();
        assert_eq!(walked, vec![(0, "A"), (1, "C"), (1, "B"), (2, "D"), (0, "E")]);
    }

    #[test]
    fn test_text_render_indents_by_depth() {
        let records = vec![record(1, "A", ""), record(2, "B", "A"), record(3, "C", "B")];
        let text = build(&records).unwrap().render_text();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("- "));
        assert!(lines[1].starts_with("  - "));
        assert!(lines[2].starts_with("    - "));
        assert!(lines[2].contains("C (Title)"));
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let records = vec![record(1, "A", ""), record(2, "B", "B")];
        let err = build(&records).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::Cycle {
                members: vec!["B".to_string(), "B".to_string()]
            }
        );
    }

    #[test]
    fn test_mutual_reference_is_cycle() {
        let records = vec![record(1, "A", "B"), record(2, "B", "A")];
        let err = build(&records).unwrap_err();
        assert!(matches!(err, HierarchyError::Cycle { ref members } if members.len() == 3));
    }

    #[test]
    fn test_duplicate_names_resolve_to_first() {
        // The second "A" hangs below B; without first-wins resolution this
        // would loop A -> B -> A forever.
        let records = vec![record(1, "A", ""), record(2, "B", "A"), record(3, "A", "B")];
        let chart = build(&records).unwrap();

        let walked: Vec<(usize, StakeholderId)> = chart
            .walk()
            .into_iter()
            .map(|(depth, node)| (depth, node.id))
            .collect();
        assert_eq!(
            walked,
            vec![
                (0, StakeholderId(1)),
                (1, StakeholderId(2)),
                (2, StakeholderId(3)),
            ]
        );
    }

    #[test]
    fn test_strict_rejects_unknown_parent() {
        let records = vec![record(1, "A", ""), record(2, "C", "Z")];
        let err = build_strict(&records).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::UnknownParent {
                child: "C".to_string(),
                parent: "Z".to_string()
            }
        );

        let ok = vec![record(1, "A", ""), record(2, "B", "A")];
        assert_eq!(build_strict(&ok).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_records() {
        let chart = build(&[]).unwrap();
        assert!(chart.is_empty());
        assert_eq!(chart.render_text(), "");
    }
}
