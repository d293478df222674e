//! Filter and sort specifications for comment queries.
//!
//! [`FilterSpec`] is the typed form used by the query pipeline. The dashboard
//! boundary speaks in strings with an `"all"` sentinel; [`RawFilterSpec`]
//! captures that form and converts into a [`FilterSpec`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::comment::{Sentiment, StakeholderType};
use crate::error::ValidationError;

/// Sentinel used by the string boundary for "no constraint".
pub const ALL: &str = "all";

/// A categorical constraint: either anything, or exactly one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    Any,
    Exactly(T),
}

impl<T: PartialEq> Filter<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(expected) => expected == value,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl<T> Filter<T> {
    /// Parse the boundary form, mapping `"all"` to [`Filter::Any`].
    pub fn parse_with<E>(
        raw: &str,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<Self, E> {
        if raw == ALL {
            Ok(Self::Any)
        } else {
            parse(raw).map(Self::Exactly)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(ALL),
            Self::Exactly(v) => v.fmt(f),
        }
    }
}

/// Three-valued constraint on the reviewer flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagFilter {
    #[default]
    All,
    Flagged,
    Unflagged,
}

impl FlagFilter {
    pub fn accepts(&self, flagged: bool) -> bool {
        match self {
            Self::All => true,
            Self::Flagged => flagged,
            Self::Unflagged => !flagged,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => ALL,
            Self::Flagged => "flagged",
            Self::Unflagged => "unflagged",
        }
    }
}

impl FromStr for FlagFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ALL => Ok(Self::All),
            "flagged" => Ok(Self::Flagged),
            "unflagged" => Ok(Self::Unflagged),
            other => Err(ValidationError::UnknownFlagFilter(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Date,
    Sentiment,
    Confidence,
    Stakeholder,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Sentiment => "sentiment",
            Self::Confidence => "confidence",
            Self::Stakeholder => "stakeholder",
        }
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Date),
            "sentiment" => Ok(Self::Sentiment),
            "confidence" => Ok(Self::Confidence),
            "stakeholder" => Ok(Self::Stakeholder),
            other => Err(ValidationError::UnknownSortKey(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ValidationError::UnknownSortOrder(other.to_string())),
        }
    }
}

/// Typed query over the comment collection.
///
/// Built fresh for each query. `sort_by = None` keeps the filtered sequence
/// in store order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub query: String,
    pub sentiment: Filter<Sentiment>,
    pub stakeholder_type: Filter<StakeholderType>,
    pub provision: Filter<String>,
    pub flagged: FlagFilter,
    pub sort_by: Option<SortKey>,
    pub sort_order: SortOrder,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            query: String::new(),
            sentiment: Filter::Any,
            stakeholder_type: Filter::Any,
            provision: Filter::Any,
            flagged: FlagFilter::All,
            sort_by: Some(SortKey::Date),
            sort_order: SortOrder::Desc,
        }
    }
}

impl FilterSpec {
    /// Default spec: everything, newest first.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Filter::Exactly(sentiment);
        self
    }

    pub fn with_stakeholder_type(mut self, stakeholder_type: StakeholderType) -> Self {
        self.stakeholder_type = Filter::Exactly(stakeholder_type);
        self
    }

    pub fn with_provision(mut self, provision: impl Into<String>) -> Self {
        self.provision = Filter::Exactly(provision.into());
        self
    }

    pub fn with_flagged(mut self, flagged: FlagFilter) -> Self {
        self.flagged = flagged;
        self
    }

    pub fn sorted_by(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort_by = Some(key);
        self.sort_order = order;
        self
    }

    pub fn unsorted(mut self) -> Self {
        self.sort_by = None;
        self
    }

    /// Number of narrowing predicates in effect. Sorting never counts.
    pub fn active_filter_count(&self) -> usize {
        [
            !self.query.is_empty(),
            !self.sentiment.is_any(),
            !self.stakeholder_type.is_any(),
            !self.provision.is_any(),
            self.flagged != FlagFilter::All,
        ]
        .into_iter()
        .filter(|&active| active)
        .count()
    }
}

/// String-typed filter specification as exchanged with the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFilterSpec {
    pub query: String,
    pub sentiment: String,
    pub stakeholder_type: String,
    pub provision: String,
    pub flagged: String,
    pub sort_by: String,
    pub sort_order: String,
}

impl Default for RawFilterSpec {
    fn default() -> Self {
        Self {
            query: String::new(),
            sentiment: ALL.into(),
            stakeholder_type: ALL.into(),
            provision: ALL.into(),
            flagged: ALL.into(),
            sort_by: SortKey::Date.as_str().into(),
            sort_order: SortOrder::Desc.as_str().into(),
        }
    }
}

impl TryFrom<RawFilterSpec> for FilterSpec {
    type Error = ValidationError;

    /// An unrecognised `sortBy` degrades to an unsorted query rather than
    /// failing; every other unrecognised value is rejected.
    fn try_from(raw: RawFilterSpec) -> Result<Self, Self::Error> {
        let sort_by = match raw.sort_by.parse::<SortKey>() {
            Ok(key) => Some(key),
            Err(_) => {
                warn!(sort_by = %raw.sort_by, "unknown sort key, keeping store order");
                None
            }
        };
        let provision = if raw.provision == ALL {
            Filter::Any
        } else {
            Filter::Exactly(raw.provision)
        };

        Ok(Self {
            query: raw.query,
            sentiment: Filter::parse_with(&raw.sentiment, str::parse)?,
            stakeholder_type: Filter::parse_with(&raw.stakeholder_type, str::parse)?,
            provision,
            flagged: raw.flagged.parse()?,
            sort_by,
            sort_order: raw.sort_order.parse()?,
        })
    }
}

impl From<&FilterSpec> for RawFilterSpec {
    fn from(spec: &FilterSpec) -> Self {
        Self {
            query: spec.query.clone(),
            sentiment: spec.sentiment.to_string(),
            stakeholder_type: spec.stakeholder_type.to_string(),
            provision: spec.provision.to_string(),
            flagged: spec.flagged.as_str().into(),
            sort_by: spec
                .sort_by
                .map(|k| k.as_str().to_string())
                .unwrap_or_default(),
            sort_order: spec.sort_order.as_str().into(),
        }
    }
}
