//! Report selection and the export boundary.
//!
//! A [`Report`] picks comments with a [`ReportFilter`], summarises them, and
//! hands the selection to an external encoder as an Arrow `RecordBatch`
//! shaped by [`ExportConfig`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use econsult_core::{Comment, Sentiment, StakeholderType, comments as schema};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::StoreError;
use crate::export::project_record_batch;
use crate::stats::{Insights, KeywordCount, keyword_tally};

/// Keywords shown in a report's word cloud.
pub const REPORT_KEYWORDS: usize = 20;

// ── Selection ──

/// Which comments go into a report.
///
/// Sets are allow-lists: a comment passes when its value is in the set. An
/// empty `provisions` set means every provision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportFilter {
    pub sentiments: BTreeSet<Sentiment>,
    pub stakeholder_types: BTreeSet<StakeholderType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub only_flagged: bool,
    pub only_report_ready: bool,
    pub provisions: BTreeSet<String>,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            sentiments: Sentiment::ALL.into_iter().collect(),
            stakeholder_types: StakeholderType::ALL.into_iter().collect(),
            date_from: None,
            date_to: None,
            only_flagged: false,
            only_report_ready: true,
            provisions: BTreeSet::new(),
        }
    }
}

impl ReportFilter {
    pub fn matches(&self, comment: &Comment) -> bool {
        if !self.sentiments.contains(&comment.sentiment) {
            return false;
        }
        if !self.stakeholder_types.contains(&comment.stakeholder_type) {
            return false;
        }
        if let Some(from) = self.date_from
            && comment.date < from
        {
            return false;
        }
        if let Some(to) = self.date_to
            && comment.date > to
        {
            return false;
        }
        if self.only_flagged && !comment.flagged {
            return false;
        }
        if self.only_report_ready && !comment.include_in_report {
            return false;
        }
        self.provisions.is_empty() || self.provisions.contains(&comment.provision)
    }

    /// Filters narrowed from their defaults. The report-ready switch is not counted.
    pub fn active_filter_count(&self) -> usize {
        [
            self.sentiments.len() < Sentiment::ALL.len(),
            self.stakeholder_types.len() < StakeholderType::ALL.len(),
            self.date_from.is_some() || self.date_to.is_some(),
            self.only_flagged,
            !self.provisions.is_empty(),
        ]
        .into_iter()
        .filter(|&active| active)
        .count()
    }

    pub fn select<'a>(&self, comments: &'a [Comment]) -> Vec<&'a Comment> {
        comments.iter().filter(|c| self.matches(c)).collect()
    }
}

// ── Export options ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    pub fn file_name(&self) -> String {
        format!("stakeholder-feedback-report.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    pub include_charts: bool,
    pub include_word_cloud: bool,
    pub include_summaries: bool,
    pub include_full_comments: bool,
    pub include_metadata: bool,
    pub report_title: String,
    pub report_description: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_charts: true,
            include_word_cloud: true,
            include_summaries: true,
            include_full_comments: false,
            include_metadata: true,
            report_title: "Stakeholder Feedback Analysis Report".into(),
            report_description: "Comprehensive sentiment analysis of public consultation responses"
                .into(),
        }
    }
}

impl ExportConfig {
    /// Rough output size in KB for `comments` rows.
    pub fn estimated_size_kb(&self, comments: usize) -> f64 {
        let mut size = comments as f64 * 0.5;
        if self.include_full_comments {
            size *= 3.0;
        }
        if self.include_charts {
            size += 2.0;
        }
        if self.include_word_cloud {
            size += 1.0;
        }
        size
    }

    /// Export columns in output order.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = vec![schema::ID, schema::STAKEHOLDER, schema::PROVISION, schema::SENTIMENT];
        if self.include_summaries {
            columns.push(schema::SUMMARY);
        }
        if self.include_full_comments {
            columns.push(schema::TEXT);
        }
        if self.include_metadata {
            columns.extend([
                schema::STAKEHOLDER_TYPE,
                schema::CONFIDENCE,
                schema::DATE,
                schema::KEYWORDS,
            ]);
        }
        columns.extend([schema::FLAGGED, schema::NOTES]);
        columns
    }
}

// ── Report ──

#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub title: String,
    pub description: String,
    pub comments: Vec<&'a Comment>,
    pub insights: Insights,
    /// Empty unless the word cloud is requested.
    pub keywords: Vec<KeywordCount>,
    config: ExportConfig,
}

impl<'a> Report<'a> {
    /// Select comments in store order and summarise them.
    pub fn build(comments: &'a [Comment], filter: &ReportFilter, config: &ExportConfig) -> Self {
        let selected = filter.select(comments);
        let insights = Insights::from_comments(&selected);
        let keywords = if config.include_word_cloud {
            keyword_tally(&selected, REPORT_KEYWORDS)
        } else {
            Vec::new()
        };
        info!(
            selected = selected.len(),
            of = comments.len(),
            filters = filter.active_filter_count(),
            "report built"
        );

        Self {
            title: config.report_title.clone(),
            description: config.report_description.clone(),
            comments: selected,
            insights,
            keywords,
            config: config.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn estimated_size_kb(&self) -> f64 {
        self.config.estimated_size_kb(self.comments.len())
    }

    /// The selection as an Arrow batch for the external encoder.
    pub fn to_record_batch(&self) -> Result<RecordBatch, StoreError> {
        if self.comments.is_empty() {
            return Err(StoreError::NothingToExport);
        }
        project_record_batch(self.comments.iter().copied(), &self.config.columns())
    }
}
