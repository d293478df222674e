//! Review session configuration.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::filter::{FilterSpec, SortKey, SortOrder};

/// Comments shown per page in the comments explorer.
pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewConfig {
    pub page_size: usize,
    pub default_sort_by: SortKey,
    pub default_sort_order: SortOrder,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_sort_by: SortKey::Date,
            default_sort_order: SortOrder::Desc,
        }
    }
}

impl ReviewConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page_size == 0 {
            return Err(ValidationError::ZeroPageSize);
        }
        Ok(())
    }

    /// Filter spec a cleared session returns to.
    pub fn default_filter(&self) -> FilterSpec {
        FilterSpec::default().sorted_by(self.default_sort_by, self.default_sort_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_explorer() {
        let config = ReviewConfig::default();
        assert_eq!(config.page_size, 5);
        assert!(config.validate().is_ok());
        assert_eq!(config.default_filter(), FilterSpec::default());
    }

    #[test]
    fn zero_page_size_rejected() {
        let config = ReviewConfig::default().with_page_size(0);
        assert_eq!(config.validate(), Err(ValidationError::ZeroPageSize));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ReviewConfig = serde_json::from_str(r#"{"pageSize": 10}"#).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.default_sort_by, SortKey::Date);
        assert_eq!(config.default_sort_order, SortOrder::Desc);
    }
}
