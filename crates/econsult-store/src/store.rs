//! In-memory comment store for a single review session.

use std::collections::HashSet;
use std::path::Path;

use arrow::record_batch::RecordBatch;
use econsult_core::{Comment, CommentId, CommentUpdate, sample};
use tracing::{debug, info};

use crate::StoreError;
use crate::export::comments_to_record_batch;

/// Canonical collection of comments under review.
///
/// The store is the only writer of comment state. Reads hand out the
/// comments in ingestion order; writes go through [`update`](Self::update)
/// and touch only the reviewer fields of one comment.
///
/// Construction validates that ids are unique and every confidence lies in
/// `[0, 1]`. Use [`open`](Self::open) for a JSON file produced by the
/// ingestion pipeline and [`sample`](Self::sample) for the built-in
/// consultation.
#[derive(Debug, Clone)]
pub struct CommentStore {
    comments: Vec<Comment>,
}

impl CommentStore {
    /// Build a store from already-labelled comments.
    pub fn new(comments: Vec<Comment>) -> Result<Self, StoreError> {
        let mut seen = HashSet::with_capacity(comments.len());
        for comment in &comments {
            if !seen.insert(&comment.id) {
                return Err(StoreError::DuplicateId(comment.id.clone()));
            }
            if !(0.0..=1.0).contains(&comment.confidence) {
                return Err(StoreError::InvalidConfidence {
                    id: comment.id.clone(),
                    confidence: comment.confidence,
                });
            }
        }
        Ok(Self { comments })
    }

    /// Store holding the built-in sample consultation.
    pub fn sample() -> Self {
        Self {
            comments: sample::consultation_comments(),
        }
    }

    /// Load a JSON array of comments from disk.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json(&json)?;
        info!(count = store.len(), path = %path.display(), "loaded comment store");
        Ok(store)
    }

    /// Parse a JSON array of comments.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let comments: Vec<Comment> = serde_json::from_str(json)?;
        Self::new(comments)
    }

    // ── Reads ──

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// All comments in ingestion order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| &c.id == id)
    }

    /// Distinct provision labels in first-seen order.
    pub fn provisions(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.comments
            .iter()
            .map(|c| c.provision.as_str())
            .filter(|p| seen.insert(*p))
            .collect()
    }

    /// Export every comment with the full comment schema.
    pub fn to_record_batch(&self) -> Result<RecordBatch, StoreError> {
        comments_to_record_batch(self.comments.iter())
    }

    // ── Writes ──

    /// Apply a reviewer update to one comment.
    ///
    /// Returns the updated comment. An unknown id leaves the store untouched.
    pub fn update(
        &mut self,
        id: &CommentId,
        update: &CommentUpdate,
    ) -> Result<&Comment, StoreError> {
        let comment = self
            .comments
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        comment.apply(update);
        debug!(id = %id, ?update, "comment updated");
        Ok(comment)
    }

    pub fn toggle_flag(&mut self, id: &CommentId) -> Result<&Comment, StoreError> {
        let flagged = self.require(id)?.flagged;
        self.update(id, &CommentUpdate::flagged(!flagged))
    }

    pub fn set_notes(
        &mut self,
        id: &CommentId,
        notes: impl Into<String>,
    ) -> Result<&Comment, StoreError> {
        self.update(id, &CommentUpdate::notes(notes))
    }

    pub fn toggle_report_inclusion(&mut self, id: &CommentId) -> Result<&Comment, StoreError> {
        let include = self.require(id)?.include_in_report;
        self.update(id, &CommentUpdate::include_in_report(!include))
    }

    fn require(&self, id: &CommentId) -> Result<&Comment, StoreError> {
        self.get(id).ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn id(s: &str) -> CommentId {
        CommentId::new(s)
    }

    #[test]
    fn sample_store_loads() {
        let store = CommentStore::sample();
        assert_eq!(store.len(), 10);
        assert!(store.get(&id("4")).is_some());
        assert!(store.get(&id("11")).is_none());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut comments = sample::consultation_comments();
        comments[1].id = id("1");
        assert!(matches!(
            CommentStore::new(comments),
            Err(StoreError::DuplicateId(dup)) if dup == id("1")
        ));
    }

    #[test]
    fn out_of_range_confidence_rejected() {
        let mut comments = sample::consultation_comments();
        comments[0].confidence = 1.2;
        assert!(matches!(
            CommentStore::new(comments),
            Err(StoreError::InvalidConfidence { .. })
        ));

        let mut comments = sample::consultation_comments();
        comments[0].confidence = f64::NAN;
        assert!(CommentStore::new(comments).is_err());
    }

    #[test]
    fn update_changes_only_target() {
        let mut store = CommentStore::sample();
        let before = store.comments().to_vec();

        let updated = store.update(&id("3"), &CommentUpdate::flagged(true)).unwrap();
        assert!(updated.flagged);

        for (old, new) in before.iter().zip(store.comments()) {
            if old.id == id("3") {
                assert!(new.flagged);
                assert_eq!(old.sentiment, new.sentiment);
                assert_eq!(old.text, new.text);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn update_unknown_id_is_not_found_and_harmless() {
        let mut store = CommentStore::sample();
        let before = store.comments().to_vec();
        let result = store.update(&id("missing"), &CommentUpdate::flagged(true));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.comments(), before.as_slice());
    }

    #[test]
    fn toggles_and_notes() {
        let mut store = CommentStore::sample();
        assert!(!store.toggle_flag(&id("2")).unwrap().flagged);
        assert!(store.toggle_flag(&id("2")).unwrap().flagged);

        assert!(!store.toggle_report_inclusion(&id("5")).unwrap().include_in_report);

        let c = store.set_notes(&id("8"), "cite in summary").unwrap();
        assert_eq!(c.notes, "cite in summary");
        assert!(matches!(
            store.toggle_flag(&id("nope")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn provisions_first_seen_order() {
        let store = CommentStore::sample();
        let provisions = store.provisions();
        assert_eq!(provisions.len(), 10);
        assert_eq!(provisions[0], "Section 4.2 - Data Collection");
        assert_eq!(provisions[9], "Section 4.1 - Data Minimization");
    }

    #[test]
    fn open_json_file() {
        let json = serde_json::to_string(&sample::consultation_comments()).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let store = CommentStore::open(file.path()).unwrap();
        assert_eq!(store.len(), 10);
        assert_eq!(store.comments(), CommentStore::sample().comments());
    }

    #[test]
    fn open_missing_file_errors() {
        let result = CommentStore::open(Path::new("/nonexistent/comments.json"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn malformed_json_errors() {
        assert!(matches!(
            CommentStore::from_json(r#"[{"id": "1"}]"#),
            Err(StoreError::Json(_))
        ));
    }

    #[test]
    fn full_record_batch() {
        let batch = CommentStore::sample().to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 10);
        assert_eq!(batch.num_columns(), 13);
    }
}
