//! Filter criteria, pagination cursor and the debounced criteria feed.
//!
//! Two views of the criteria are kept. `criteria` is what the user has
//! typed so far; `applied` is the last debounced value, the one listings are
//! actually fetched for. Page changes always apply to `applied`.

use std::sync::Mutex;
use std::time::Duration;

use tcgshop_core::error::CoreError;
use tcgshop_core::filter::{FilterCriteria, QueryParameters};
use tokio::sync::watch;

use crate::debounce::Debouncer;
use crate::sync::lock;

/// Default quiet period before criteria edits take effect.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
struct Cursor {
    criteria: FilterCriteria,
    applied: FilterCriteria,
    page: u32,
}

pub struct FilterState {
    page_size: u32,
    cursor: Mutex<Cursor>,
    debouncer: Debouncer<FilterCriteria>,
}

impl FilterState {
    pub fn new(page_size: u32, quiet: Duration) -> Self {
        Self {
            page_size,
            cursor: Mutex::new(Cursor {
                page: 1,
                ..Default::default()
            }),
            debouncer: Debouncer::new(quiet, FilterCriteria::default()),
        }
    }

    /// Replace the criteria wholesale and reset the cursor to page 1.
    ///
    /// The new value reaches [`subscribe`](Self::subscribe) receivers once
    /// it has been stable for the quiet period.
    pub fn set_criteria(&self, criteria: FilterCriteria) {
        {
            let mut cursor = lock(&self.cursor);
            cursor.criteria = criteria.clone();
            cursor.page = 1;
        }
        tracing::debug!(?criteria, "Filter criteria edited");
        self.debouncer.push(criteria);
    }

    /// Reset every criterion. Goes through the same debounce as any edit.
    pub fn clear(&self) {
        self.set_criteria(FilterCriteria::default());
    }

    /// Criteria as last edited, possibly not yet applied.
    pub fn criteria(&self) -> FilterCriteria {
        lock(&self.cursor).criteria.clone()
    }

    /// Criteria the current listing was requested for.
    pub fn applied(&self) -> FilterCriteria {
        lock(&self.cursor).applied.clone()
    }

    pub fn has_active_filters(&self) -> bool {
        lock(&self.cursor).criteria.has_active_filters()
    }

    pub fn page(&self) -> u32 {
        lock(&self.cursor).page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Debounced criteria. Each change is one settled edit.
    pub fn subscribe(&self) -> watch::Receiver<FilterCriteria> {
        self.debouncer.subscribe()
    }

    /// Whether an edit is still inside its quiet period.
    pub fn is_settling(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Record a settled value as applied and project it at the cursor.
    ///
    /// Criteria that differ from the applied ones always start at page 1,
    /// even if the cursor was moved while the edit was settling.
    pub fn apply(&self, criteria: FilterCriteria) -> Result<QueryParameters, CoreError> {
        let mut cursor = lock(&self.cursor);
        let page = if criteria == cursor.applied { cursor.page } else { 1 };
        let query = QueryParameters::new(&criteria, page, self.page_size)?;
        cursor.page = page;
        cursor.applied = criteria;
        Ok(query)
    }

    /// Move the cursor, returning the query for the applied criteria there.
    pub fn set_page(&self, page: u32) -> Result<QueryParameters, CoreError> {
        let mut cursor = lock(&self.cursor);
        let query = QueryParameters::new(&cursor.applied, page, self.page_size)?;
        cursor.page = page;
        Ok(query)
    }

    /// Query for the applied criteria at the current cursor.
    pub fn query(&self) -> Result<QueryParameters, CoreError> {
        let cursor = lock(&self.cursor);
        QueryParameters::new(&cursor.applied, cursor.page, self.page_size)
    }

    /// Drop an edit that has not settled yet.
    pub fn cancel_pending(&self) {
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn set_criteria_resets_page() {
        let filters = FilterState::new(20, DEFAULT_DEBOUNCE);
        filters.set_page(3).unwrap();
        assert_eq!(filters.page(), 3);

        filters.set_criteria(FilterCriteria::by_name("pika"));
        assert_eq!(filters.page(), 1);
        assert_eq!(filters.criteria().name, "pika");
        assert_eq!(filters.applied(), FilterCriteria::default());
    }

    #[tokio::test(start_paused = true)]
    async fn edits_coalesce_into_one_settled_value() {
        let filters = FilterState::new(20, DEFAULT_DEBOUNCE);
        let mut rx = filters.subscribe();

        filters.set_criteria(FilterCriteria::by_name("char"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        filters.set_criteria(FilterCriteria::by_name("charm"));
        assert!(filters.is_settling());

        tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(1)).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().name, "charm");
    }

    #[test]
    fn apply_projects_at_cursor() {
        let filters = FilterState::new(10, DEFAULT_DEBOUNCE);
        let query = filters.apply(FilterCriteria::by_name(" mew ")).unwrap();

        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 10);
        assert_eq!(query.name_query.as_deref(), Some("mew"));
        assert_eq!(filters.applied().name, " mew ");
    }

    #[test]
    fn set_page_uses_applied_criteria() {
        let filters = FilterState::new(20, DEFAULT_DEBOUNCE);
        filters.apply(FilterCriteria::by_name("zap")).unwrap();

        let query = filters.set_page(2).unwrap();
        assert_eq!(query.page, 2);
        assert_eq!(query.name_query.as_deref(), Some("zap"));
    }

    #[test]
    fn page_zero_is_rejected_and_cursor_kept() {
        let filters = FilterState::new(20, DEFAULT_DEBOUNCE);
        filters.set_page(4).unwrap();

        assert_matches!(filters.set_page(0), Err(CoreError::Validation(_)));
        assert_eq!(filters.page(), 4);
    }

    #[test]
    fn new_criteria_apply_at_first_page() {
        let filters = FilterState::new(5, DEFAULT_DEBOUNCE);
        filters.apply(FilterCriteria::by_name("a")).unwrap();
        filters.set_page(3).unwrap();

        let query = filters.apply(FilterCriteria::by_name("pika")).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(filters.page(), 1);
    }

    #[test]
    fn unchanged_criteria_keep_cursor() {
        let filters = FilterState::new(5, DEFAULT_DEBOUNCE);
        filters.apply(FilterCriteria::by_name("a")).unwrap();
        filters.set_page(3).unwrap();

        let query = filters.apply(FilterCriteria::by_name("a")).unwrap();
        assert_eq!(query.page, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_goes_through_debounce() {
        let filters = FilterState::new(20, DEFAULT_DEBOUNCE);
        filters.set_criteria(FilterCriteria::by_name("a"));
        assert!(filters.has_active_filters());

        filters.clear();
        assert!(!filters.has_active_filters());
        assert!(filters.is_settling());
    }
}
