//! In-memory record store.
//!
//! Holds the ordered list of stakeholder records for one session.
//! Insertion order is display order.

use crate::error::StoreError;
use crate::models::{
    RecordField, StakeholderDraft, StakeholderId, StakeholderRecord, KNOWN_DEPARTMENTS,
};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Ordered, id-addressed collection of stakeholder records.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<StakeholderRecord>,
    next_id: u64,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing records, keeping their ids.
    pub fn from_records(records: Vec<StakeholderRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id.0).max().unwrap_or(0) + 1;
        Self { records, next_id }
    }

    /// Seed a store from a previously exported JSON report.
    pub fn load_report(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report: {}", path.display()))?;

        let snapshot = crate::report::parse_json_report(&content)
            .with_context(|| format!("Failed to parse report: {}", path.display()))?;

        info!(
            "Loaded {} stakeholders from {} (exported {})",
            snapshot.stakeholders.len(),
            path.display(),
            snapshot.date
        );

        Ok(Self::from_records(snapshot.stakeholders))
    }

    pub fn records(&self) -> &[StakeholderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: StakeholderId) -> Option<&StakeholderRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Append a record built from the draft.
    ///
    /// Returns `None` without touching the store when name or title is blank.
    /// Duplicate names are not checked.
    pub fn add(&mut self, draft: StakeholderDraft) -> Option<StakeholderId> {
        if !draft.is_complete() {
            debug!("Ignoring incomplete stakeholder draft");
            return None;
        }

        warn_unknown_department(&draft.department);

        let id = StakeholderId(self.next_id);
        self.next_id += 1;
        self.records.push(draft.into_record(id));

        debug!("Added stakeholder {}", id);
        Some(id)
    }

    /// Replace one field on the record with the given id.
    ///
    /// Numeric fields are parsed as integers and stored as-is; no range
    /// clamping is applied.
    pub fn update(
        &mut self,
        id: StakeholderId,
        field: RecordField,
        value: &str,
    ) -> Result<(), StoreError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::UnknownId(id))?;

        match field {
            RecordField::Name => record.name = value.to_string(),
            RecordField::Title => record.title = value.to_string(),
            RecordField::Department => {
                warn_unknown_department(value);
                record.department = value.to_string();
            }
            RecordField::Influence => record.influence = parse_score(field, value, 10)?,
            RecordField::Support => record.support = parse_score(field, value, 10)?,
            RecordField::Engagement => record.engagement = parse_score(field, value, 5)?,
            RecordField::Relationship => {
                record.relationship = value.parse().map_err(StoreError::InvalidRelationship)?
            }
            RecordField::ReportsTo => {
                let name = value.trim();
                record.reports_to = (!name.is_empty()).then(|| name.to_string());
            }
        }

        debug!("Updated {} on stakeholder {}", field, id);
        Ok(())
    }

    /// Delete the record with the given id.
    ///
    /// Does not cascade: records reporting to the removed name keep
    /// pointing at it.
    pub fn remove(&mut self, id: StakeholderId) -> Option<StakeholderRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        let removed = self.records.remove(index);
        debug!("Removed stakeholder {} ({})", id, removed.name);
        Some(removed)
    }
}

fn parse_score(field: RecordField, value: &str, max: i64) -> Result<i64, StoreError> {
    let score: i64 = value
        .trim()
        .parse()
        .map_err(|_| StoreError::InvalidNumber {
            field,
            value: value.to_string(),
        })?;

    if !(1..=max).contains(&score) {
        warn!("{} {} is outside the expected 1-{} range", field, score, max);
    }

    Ok(score)
}

fn warn_unknown_department(department: &str) {
    if !department.is_empty() && !KNOWN_DEPARTMENTS.contains(&department) {
        warn!("Department '{}' is not one of the standard departments", department);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Relationship;

    fn draft(name: &str, title: &str) -> StakeholderDraft {
        StakeholderDraft::new(name, title)
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut store = RecordStore::new();
        let a = store.add(draft("Ana", "CFO")).unwrap();
        let b = store.add(draft("Ben", "CIO")).unwrap();

        assert_eq!(store.len(), 2);
        assert_ne!(a, b);
        assert_eq!(store.records()[0].name, "Ana");
        assert_eq!(store.records()[1].name, "Ben");
    }

    #[test]
    fn test_add_uses_form_defaults() {
        let mut store = RecordStore::new();
        let id = store.add(draft("Ana", "CFO")).unwrap();
        let record = store.get(id).unwrap();

        assert_eq!(record.influence, 5);
        assert_eq!(record.support, 5);
        assert_eq!(record.engagement, 3);
        assert_eq!(record.relationship, Relationship::New);
    }

    #[test]
    fn test_add_ignores_blank_name_or_title() {
        let mut store = RecordStore::new();
        assert!(store.add(draft("", "CFO")).is_none());
        assert!(store.add(draft("Ana", "")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_allows_duplicate_names() {
        let mut store = RecordStore::new();
        store.add(draft("Ana", "CFO"));
        store.add(draft("Ana", "CTO"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_numeric_without_clamping() {
        let mut store = RecordStore::new();
        let id = store.add(draft("Ana", "CFO")).unwrap();

        store.update(id, RecordField::Influence, "8").unwrap();
        store.update(id, RecordField::Support, "42").unwrap();
        store.update(id, RecordField::Engagement, "0").unwrap();

        let record = store.get(id).unwrap();
        assert_eq!(record.influence, 8);
        assert_eq!(record.support, 42);
        assert_eq!(record.engagement, 0);
    }

    #[test]
    fn test_update_rejects_non_numeric() {
        let mut store = RecordStore::new();
        let id = store.add(draft("Ana", "CFO")).unwrap();

        let err = store.update(id, RecordField::Influence, "high").unwrap_err();
        assert!(matches!(err, StoreError::InvalidNumber { .. }));
        assert_eq!(store.get(id).unwrap().influence, 5);
    }

    #[test]
    fn test_update_text_fields() {
        let mut store = RecordStore::new();
        let id = store.add(draft("Ana", "CFO")).unwrap();

        store.update(id, RecordField::Relationship, "champion").unwrap();
        store.update(id, RecordField::ReportsTo, "Ben").unwrap();
        store.update(id, RecordField::Department, "Finance").unwrap();

        let record = store.get(id).unwrap();
        assert_eq!(record.relationship, Relationship::Champion);
        assert_eq!(record.reports_to.as_deref(), Some("Ben"));
        assert_eq!(record.department, "Finance");

        store.update(id, RecordField::ReportsTo, "").unwrap();
        assert_eq!(store.get(id).unwrap().reports_to, None);
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = RecordStore::new();
        let err = store
            .update(StakeholderId(99), RecordField::Name, "X")
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownId(StakeholderId(99))));
    }

    #[test]
    fn test_remove_leaves_dangling_reference() {
        let mut store = RecordStore::new();
        let boss = store.add(draft("Ana", "CEO")).unwrap();
        let mut report = draft("Ben", "CIO");
        report.reports_to = Some("Ana".to_string());
        let ben = store.add(report).unwrap();
        let before = store.get(ben).unwrap().clone();

        let removed = store.remove(boss).unwrap();

        assert_eq!(removed.name, "Ana");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(ben), Some(&before));
        assert_eq!(store.get(ben).unwrap().reports_to.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = RecordStore::new();
        store.add(draft("Ana", "CEO"));
        assert!(store.remove(StakeholderId(42)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut store = RecordStore::new();
        let a = store.add(draft("Ana", "CEO")).unwrap();
        store.remove(a);
        let b = store.add(draft("Ben", "CIO")).unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_from_records_continues_ids() {
        let mut seed = RecordStore::new();
        seed.add(draft("Ana", "CEO"));
        seed.add(draft("Ben", "CIO"));

        let mut store = RecordStore::from_records(seed.records().to_vec());
        let next = store.add(draft("Cy", "CTO")).unwrap();
        assert_eq!(next, StakeholderId(3));
    }
}
