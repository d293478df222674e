//! Pagination and the stateful review session.

use econsult_core::{Comment, CommentId, CommentUpdate, FilterSpec, ReviewConfig};
use serde::Serialize;
use tracing::debug;

use crate::StoreError;
use crate::query::run_query;
use crate::stats::SentimentCounts;
use crate::store::CommentStore;

/// Slice out 1-indexed page `page` of `items`.
///
/// Page 0 and pages past the end are empty. The last page may be short.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `total` results; 0 when there are none.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// One rendered page of the current query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView<'a> {
    pub comments: Vec<&'a Comment>,
    pub page: usize,
    pub total_pages: usize,
    pub total_results: usize,
    /// Sentiment counts over every matching comment, not just this page.
    pub counts: SentimentCounts,
}

impl PageView<'_> {
    /// No comment matched. Callers offer to clear the filters.
    pub fn is_empty(&self) -> bool {
        self.total_results == 0
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// A reviewer's session over one comment store.
///
/// Holds the current filter and page. Any change to the filter sends the
/// reviewer back to page 1; navigation clamps to the pages that exist.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    store: CommentStore,
    config: ReviewConfig,
    filter: FilterSpec,
    page: usize,
}

impl ReviewSession {
    pub fn new(store: CommentStore, config: ReviewConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let filter = config.default_filter();
        Ok(Self {
            store,
            config,
            filter,
            page: 1,
        })
    }

    pub fn store(&self) -> &CommentStore {
        &self.store
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    // ── Filters ──

    pub fn set_filter(&mut self, filter: FilterSpec) {
        debug!(?filter, "filter changed");
        self.filter = filter;
        self.page = 1;
    }

    /// Edit the current filter in place. Always resets to page 1.
    pub fn update_filter(&mut self, edit: impl FnOnce(&mut FilterSpec)) {
        let mut filter = self.filter.clone();
        edit(&mut filter);
        self.set_filter(filter);
    }

    pub fn clear_filters(&mut self) {
        self.set_filter(self.config.default_filter());
    }

    pub fn active_filter_count(&self) -> usize {
        self.filter.active_filter_count()
    }

    // ── Navigation ──

    pub fn total_pages(&self) -> usize {
        let total = run_query(self.store.comments(), &self.filter).total_results;
        total_pages(total, self.config.page_size)
    }

    /// Move to `page`, clamped to `[1, max(total_pages, 1)]`. Returns the new page.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let last = self.total_pages().max(1);
        self.page = page.clamp(1, last);
        self.page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> usize {
        self.go_to_page(self.page.saturating_sub(1))
    }

    // ── Review actions ──

    /// Apply a reviewer update. The filter and page are left alone.
    pub fn update(
        &mut self,
        id: &CommentId,
        update: &CommentUpdate,
    ) -> Result<&Comment, StoreError> {
        self.store.update(id, update)
    }

    pub fn toggle_flag(&mut self, id: &CommentId) -> Result<&Comment, StoreError> {
        self.store.toggle_flag(id)
    }

    pub fn set_notes(
        &mut self,
        id: &CommentId,
        notes: impl Into<String>,
    ) -> Result<&Comment, StoreError> {
        self.store.set_notes(id, notes)
    }

    pub fn toggle_report_inclusion(&mut self, id: &CommentId) -> Result<&Comment, StoreError> {
        self.store.toggle_report_inclusion(id)
    }

    // ── View ──

    /// Run the current query and cut out the current page.
    pub fn view(&self) -> PageView<'_> {
        let result = run_query(self.store.comments(), &self.filter);
        let counts = SentimentCounts::from_comments(result.comments.iter().copied());
        let page_size = self.config.page_size;

        PageView {
            comments: paginate(&result.comments, self.page, page_size).to_vec(),
            page: self.page,
            total_pages: total_pages(result.total_results, page_size),
            total_results: result.total_results,
            counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use econsult_core::{FlagFilter, Sentiment};

    fn session() -> ReviewSession {
        ReviewSession::new(CommentStore::sample(), ReviewConfig::default()).unwrap()
    }

    fn small_pages(page_size: usize) -> ReviewSession {
        let config = ReviewConfig::default().with_page_size(page_size);
        ReviewSession::new(CommentStore::sample(), config).unwrap()
    }

    fn page_ids(view: &PageView<'_>) -> Vec<String> {
        view.comments.iter().map(|c| c.id.to_string()).collect()
    }

    // ── paginate ──

    #[test]
    fn paginate_exact_pages() {
        let items: Vec<i32> = (1..=10).collect();
        assert_eq!(paginate(&items, 1, 5), &[1, 2, 3, 4, 5]);
        assert_eq!(paginate(&items, 2, 5), &[6, 7, 8, 9, 10]);
        assert!(paginate(&items, 3, 5).is_empty());
        assert_eq!(total_pages(items.len(), 5), 2);
    }

    #[test]
    fn paginate_short_last_page() {
        let items: Vec<i32> = (1..=7).collect();
        assert_eq!(paginate(&items, 2, 5), &[6, 7]);
        assert_eq!(total_pages(7, 5), 2);
    }

    #[test]
    fn paginate_out_of_range_is_empty() {
        let items: Vec<i32> = (1..=3).collect();
        assert!(paginate(&items, 0, 5).is_empty());
        assert!(paginate(&items, usize::MAX, 5).is_empty());
        assert!(paginate::<i32>(&[], 1, 5).is_empty());
        assert_eq!(total_pages(0, 5), 0);
    }

    // ── session ──

    #[test]
    fn zero_page_size_rejected() {
        let config = ReviewConfig::default().with_page_size(0);
        assert!(matches!(
            ReviewSession::new(CommentStore::sample(), config),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn default_view_is_newest_first() {
        let s = session();
        let view = s.view();
        assert_eq!(view.page, 1);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.total_results, 10);
        assert_eq!(page_ids(&view), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(view.counts.total, 10);
        assert!(view.has_next());
        assert!(!view.has_prev());
    }

    #[test]
    fn navigation_clamps() {
        let mut s = session();
        assert_eq!(s.next_page(), 2);
        assert_eq!(s.next_page(), 2);
        assert_eq!(page_ids(&s.view()), vec!["6", "7", "8", "9", "10"]);
        assert_eq!(s.prev_page(), 1);
        assert_eq!(s.prev_page(), 1);
        assert_eq!(s.go_to_page(99), 2);
        assert_eq!(s.go_to_page(0), 1);
    }

    #[test]
    fn filter_change_resets_page() {
        let mut s = small_pages(2);
        assert_eq!(s.go_to_page(4), 4);

        s.update_filter(|f| f.query = "data".into());
        assert_eq!(s.page(), 1);

        s.go_to_page(2);
        s.update_filter(|f| f.sort_order = f.sort_order.toggled());
        assert_eq!(s.page(), 1);

        s.go_to_page(2);
        s.clear_filters();
        assert_eq!(s.page(), 1);
        assert_eq!(s.filter(), &FilterSpec::default());
    }

    #[test]
    fn counts_cover_all_matches_not_just_page() {
        let mut s = small_pages(2);
        s.set_filter(FilterSpec::new().with_sentiment(Sentiment::Positive));
        let view = s.view();
        assert_eq!(view.comments.len(), 2);
        assert_eq!(view.total_results, 5);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.counts.positive, 5);
        assert_eq!(view.counts.total, 5);
    }

    #[test]
    fn empty_result_is_a_view() {
        let mut s = session();
        s.update_filter(|f| f.query = "no such phrase anywhere".into());
        let view = s.view();
        assert!(view.is_empty());
        assert!(view.comments.is_empty());
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.counts, SentimentCounts::default());
        assert_eq!(s.go_to_page(5), 1);
        assert_eq!(s.active_filter_count(), 1);
    }

    #[test]
    fn mutation_visible_in_next_view() {
        let mut s = session();
        s.set_filter(FilterSpec::new().with_flagged(FlagFilter::Flagged));
        assert_eq!(s.view().total_results, 4);

        s.toggle_flag(&CommentId::new("3")).unwrap();
        let view = s.view();
        assert_eq!(view.total_results, 5);
        assert!(page_ids(&view).contains(&"3".to_string()));

        s.set_notes(&CommentId::new("3"), "follow up").unwrap();
        assert_eq!(s.store().get(&CommentId::new("3")).unwrap().notes, "follow up");
    }

    #[test]
    fn mutation_keeps_page() {
        let mut s = session();
        s.go_to_page(2);
        s.toggle_report_inclusion(&CommentId::new("8")).unwrap();
        assert_eq!(s.page(), 2);
    }
}
