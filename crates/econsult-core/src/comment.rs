//! Stakeholder comment records submitted to a public consultation.
//!
//! A [`Comment`] arrives from the ingestion pipeline already labelled with
//! sentiment, confidence, summary and keywords. During review only the
//! reviewer fields (`flagged`, `notes`, `include_in_report`) change, and only
//! through a [`CommentUpdate`].

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Opaque, immutable comment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CommentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Polarity label assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Fixed sort rank: negative < neutral < positive.
    ///
    /// The ordering has no meaning beyond keeping sorted output stable
    /// across implementations.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Neutral => 1,
            Self::Positive => 2,
        }
    }

    /// Signed score used for per-provision averages.
    pub fn score(&self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Neutral => 0.0,
            Self::Negative => -1.0,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            other => Err(ValidationError::UnknownSentiment(other.to_string())),
        }
    }
}

/// Kind of submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StakeholderType {
    Individual,
    Organization,
    Government,
    #[serde(rename = "NGO")]
    Ngo,
}

impl StakeholderType {
    pub const ALL: [StakeholderType; 4] = [
        Self::Individual,
        Self::Organization,
        Self::Government,
        Self::Ngo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Organization => "Organization",
            Self::Government => "Government",
            Self::Ngo => "NGO",
        }
    }
}

impl fmt::Display for StakeholderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StakeholderType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Individual" => Ok(Self::Individual),
            "Organization" => Ok(Self::Organization),
            "Government" => Ok(Self::Government),
            "NGO" => Ok(Self::Ngo),
            other => Err(ValidationError::UnknownStakeholderType(other.to_string())),
        }
    }
}

/// A single piece of stakeholder feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub stakeholder: String,
    pub stakeholder_type: StakeholderType,
    /// Section of the proposed document the comment addresses.
    pub provision: String,
    pub text: String,
    pub sentiment: Sentiment,
    /// Classifier certainty in `sentiment`, within `[0, 1]`.
    pub confidence: f64,
    pub summary: String,
    pub keywords: Vec<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_include_in_report")]
    pub include_in_report: bool,
}

fn default_include_in_report() -> bool {
    true
}

impl Comment {
    /// Lower-cased haystack for free-text search.
    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(4 + self.keywords.len());
        parts.push(&self.text);
        parts.push(&self.stakeholder);
        parts.push(&self.provision);
        parts.push(&self.summary);
        parts.extend(self.keywords.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }

    /// Apply the reviewer fields of `update`, leaving analysis fields untouched.
    pub fn apply(&mut self, update: &CommentUpdate) {
        if let Some(flagged) = update.flagged {
            self.flagged = flagged;
        }
        if let Some(notes) = &update.notes {
            self.notes.clone_from(notes);
        }
        if let Some(include) = update.include_in_report {
            self.include_in_report = include;
        }
    }
}

/// Partial update of the reviewer-owned fields of a [`Comment`].
///
/// Patches naming any other field are rejected at deserialisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CommentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_in_report: Option<bool>,
}

impl CommentUpdate {
    pub fn flagged(flagged: bool) -> Self {
        Self {
            flagged: Some(flagged),
            ..Self::default()
        }
    }

    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..Self::default()
        }
    }

    pub fn include_in_report(include: bool) -> Self {
        Self {
            include_in_report: Some(include),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flagged.is_none() && self.notes.is_none() && self.include_in_report.is_none()
    }
}
