//! Filter criteria and their projection onto catalog query parameters.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default number of cards per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum page size the catalog accepts.
pub const MAX_PAGE_SIZE: u32 = 250;

/// What the user has asked to see. An empty field means "no constraint".
///
/// Values are replaced wholesale on every edit, never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub rarity: String,
    /// Set identifier, e.g. `"base1"`.
    pub set: String,
}

impl FilterCriteria {
    /// Criteria constraining only the card name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether any criterion carries a non-blank value.
    pub fn has_active_filters(&self) -> bool {
        [&self.name, &self.card_type, &self.rarity, &self.set]
            .iter()
            .any(|v| !v.trim().is_empty())
    }
}

/// Parameters of one listing request. Always derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameters {
    pub page: u32,
    pub page_size: u32,
    /// Case-insensitive name substring.
    pub name_query: Option<String>,
    pub card_type: Option<String>,
    pub rarity: Option<String>,
    pub set: Option<String>,
}

impl QueryParameters {
    /// Project `criteria` at a pagination cursor.
    ///
    /// Values are trimmed; blank values become `None`. `page` must be at
    /// least 1 and `page_size` within `1..=MAX_PAGE_SIZE`.
    pub fn new(criteria: &FilterCriteria, page: u32, page_size: u32) -> Result<Self, CoreError> {
        if page == 0 {
            return Err(CoreError::Validation("page must be at least 1".to_string()));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(CoreError::Validation(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        Ok(Self {
            page,
            page_size,
            name_query: non_blank(&criteria.name),
            card_type: non_blank(&criteria.card_type),
            rarity: non_blank(&criteria.rarity),
            set: non_blank(&criteria.set),
        })
    }

    /// The first page of an unfiltered listing.
    pub fn first_page(page_size: u32) -> Result<Self, CoreError> {
        Self::new(&FilterCriteria::default(), 1, page_size)
    }

    /// Catalog search expression for the name token, e.g. `name:"char"`.
    pub fn search_expression(&self) -> Option<String> {
        self.name_query.as_ref().map(|n| format!("name:\"{n}\""))
    }

    /// Zero-based index range of this page within the full result set.
    pub fn window(&self) -> std::ops::Range<usize> {
        let size = self.page_size as usize;
        let start = (self.page as usize).saturating_sub(1).saturating_mul(size);
        start..start.saturating_add(size)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn empty_criteria_has_no_constraints() {
        let q = QueryParameters::new(&FilterCriteria::default(), 1, DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(q.name_query, None);
        assert_eq!(q.card_type, None);
        assert_eq!(q.rarity, None);
        assert_eq!(q.set, None);
        assert_eq!(q.search_expression(), None);
    }

    #[test]
    fn values_are_trimmed_and_blanks_dropped() {
        let criteria = FilterCriteria {
            name: "  char ".into(),
            card_type: "Fire".into(),
            rarity: "   ".into(),
            set: "base1".into(),
        };
        let q = QueryParameters::new(&criteria, 2, 20).unwrap();

        assert_eq!(q.name_query.as_deref(), Some("char"));
        assert_eq!(q.card_type.as_deref(), Some("Fire"));
        assert_eq!(q.rarity, None);
        assert_eq!(q.set.as_deref(), Some("base1"));
        assert_eq!(q.search_expression().as_deref(), Some("name:\"char\""));
    }

    #[test]
    fn page_zero_is_rejected() {
        let result = QueryParameters::new(&FilterCriteria::default(), 0, 20);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn page_size_bounds_are_enforced() {
        let criteria = FilterCriteria::default();
        assert_matches!(QueryParameters::new(&criteria, 1, 0), Err(CoreError::Validation(_)));
        assert_matches!(
            QueryParameters::new(&criteria, 1, MAX_PAGE_SIZE + 1),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn window_covers_the_page() {
        let q = QueryParameters::new(&FilterCriteria::default(), 3, 20).unwrap();
        assert_eq!(q.window(), 40..60);
    }

    #[test]
    fn window_of_hand_built_page_zero_starts_at_zero() {
        let q = QueryParameters {
            page: 0,
            ..QueryParameters::first_page(20).unwrap()
        };
        assert_eq!(q.window(), 0..20);
    }

    #[test]
    fn has_active_filters_ignores_whitespace() {
        assert!(!FilterCriteria::default().has_active_filters());
        assert!(!FilterCriteria::by_name("  ").has_active_filters());
        assert!(FilterCriteria::by_name("pika").has_active_filters());
    }

    #[test]
    fn criteria_serializes_type_field_name() {
        let json = serde_json::to_value(FilterCriteria {
            card_type: "Water".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json["type"], "Water");
    }
}
