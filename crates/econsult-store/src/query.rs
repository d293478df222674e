//! Comment query pipeline: predicate evaluation, ordering, and execution.
//!
//! A query filters the store in ingestion order, then stable-sorts the
//! survivors. There is no secondary sort key: comments that compare equal
//! keep their relative store order, so a deterministic store yields a
//! deterministic result.

use std::cmp::Ordering;

use econsult_core::{Comment, FilterSpec, SortKey, SortOrder};

/// Whether `comment` satisfies every active predicate of `spec`.
pub fn matches(comment: &Comment, spec: &FilterSpec) -> bool {
    if !spec.query.is_empty() {
        let needle = spec.query.to_lowercase();
        if !comment.search_text().contains(&needle) {
            return false;
        }
    }

    spec.sentiment.accepts(&comment.sentiment)
        && spec.stakeholder_type.accepts(&comment.stakeholder_type)
        && spec.provision.accepts(&comment.provision)
        && spec.flagged.accepts(comment.flagged)
}

/// Order two comments by `sort_by`, reversed for [`SortOrder::Desc`].
///
/// `None` treats every pair as equal.
pub fn compare(a: &Comment, b: &Comment, sort_by: Option<SortKey>, order: SortOrder) -> Ordering {
    let ordering = match sort_by {
        Some(SortKey::Date) => a.date.cmp(&b.date),
        Some(SortKey::Sentiment) => a.sentiment.rank().cmp(&b.sentiment.rank()),
        Some(SortKey::Confidence) => a
            .confidence
            .partial_cmp(&b.confidence)
            .unwrap_or(Ordering::Equal),
        Some(SortKey::Stakeholder) => collate(&a.stakeholder, &b.stakeholder),
        None => Ordering::Equal,
    };

    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Human-facing name ordering: case-insensitive first, code points to break ties.
fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Ordered result of a query, before pagination.
#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    pub comments: Vec<&'a Comment>,
    pub total_results: usize,
}

impl<'a> QueryResult<'a> {
    pub fn is_empty(&self) -> bool {
        self.total_results == 0
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.comments.iter().map(|c| c.id.as_str()).collect()
    }
}

/// Filter `comments` through `spec`, then stable-sort the matches.
pub fn run_query<'a>(comments: &'a [Comment], spec: &FilterSpec) -> QueryResult<'a> {
    let mut matched: Vec<&Comment> = comments.iter().filter(|c| matches(c, spec)).collect();
    // sort_by is stable; equal keys keep store order.
    matched.sort_by(|a, b| compare(a, b, spec.sort_by, spec.sort_order));

    QueryResult {
        total_results: matched.len(),
        comments: matched,
    }
}
