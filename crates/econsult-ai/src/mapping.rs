//! Mapping uploaded CSV columns onto comment fields.
//!
//! Only the header line is handled here. Reading CSV bodies belongs to the
//! upload service in front of the engine.

use std::collections::BTreeMap;
use std::fmt;

use econsult_core::comments as schema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Split a CSV header line into column names.
///
/// Names are trimmed and stripped of double quotes; empty names are dropped.
pub fn parse_header_line(line: &str) -> Vec<String> {
    line.split(',')
        .map(|h| h.trim().replace('"', ""))
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect()
}

/// A comment field an uploaded column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalField {
    Stakeholder,
    Text,
    Date,
    StakeholderType,
    Provision,
    Email,
}

impl LogicalField {
    /// Detection order: required fields first.
    pub const ALL: [LogicalField; 6] = [
        Self::Stakeholder,
        Self::Text,
        Self::Date,
        Self::StakeholderType,
        Self::Provision,
        Self::Email,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Stakeholder => "stakeholder",
            Self::Text => "text",
            Self::Date => "date",
            Self::StakeholderType => "stakeholderType",
            Self::Provision => "provision",
            Self::Email => "email",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Stakeholder => "Stakeholder Name",
            Self::Text => "Comment Text",
            Self::Date => "Date",
            Self::StakeholderType => "Stakeholder Type",
            Self::Provision => "Provision/Section",
            Self::Email => "Email Address",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Stakeholder | Self::Text | Self::Date)
    }

    /// Lower-case substrings that identify a header for this field.
    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            Self::Stakeholder => &["stakeholder", "name", "organization", "submitter"],
            Self::Text => &["comment", "text", "feedback", "response", "message"],
            Self::Date => &["date", "submitted", "created", "timestamp"],
            Self::StakeholderType => &["type", "category", "stakeholder_type"],
            Self::Provision => &["provision", "section", "topic", "subject"],
            Self::Email => &["email", "contact", "address"],
        }
    }

    /// Comment column this field populates. Email is collected but not stored.
    pub fn target_column(&self) -> Option<&'static str> {
        match self {
            Self::Stakeholder => Some(schema::STAKEHOLDER),
            Self::Text => Some(schema::TEXT),
            Self::Date => Some(schema::DATE),
            Self::StakeholderType => Some(schema::STAKEHOLDER_TYPE),
            Self::Provision => Some(schema::PROVISION),
            Self::Email => None,
        }
    }

    fn matches_header(&self, header: &str) -> bool {
        let header = header.to_lowercase();
        self.patterns().iter().any(|p| header.contains(p))
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("{0} is required")]
    MissingRequired(LogicalField),

    #[error("Duplicate column mappings: {}", .0.join(", "))]
    DuplicateColumns(Vec<String>),
}

/// Every problem found in a mapping, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", display_errors(.0))]
pub struct MappingErrors(pub Vec<MappingError>);

fn display_errors(errors: &[MappingError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Assignment of uploaded columns to comment fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    columns: BTreeMap<LogicalField, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guess a column for each field: the first header containing one of its patterns.
    pub fn auto_detect<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut mapping = Self::new();
        for field in LogicalField::ALL {
            if let Some(header) = headers.iter().find(|h| field.matches_header(h.as_ref())) {
                mapping.set(field, Some(header.as_ref()));
            }
        }
        debug!(mapped = mapping.columns.len(), headers = headers.len(), "auto-detected columns");
        mapping
    }

    /// Map `field` to `column`. `None`, an empty name, or `"none"` clears it.
    pub fn set(&mut self, field: LogicalField, column: Option<&str>) {
        match column.map(str::trim) {
            Some(c) if !c.is_empty() && c != "none" => {
                self.columns.insert(field, c.to_string());
            }
            _ => {
                self.columns.remove(&field);
            }
        }
    }

    pub fn get(&self, field: LogicalField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LogicalField, &str)> {
        self.columns.iter().map(|(f, c)| (*f, c.as_str()))
    }

    pub fn validate(&self) -> Vec<MappingError> {
        let mut errors: Vec<MappingError> = LogicalField::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.get(*f).is_none())
            .map(MappingError::MissingRequired)
            .collect();

        let mut seen: Vec<&str> = Vec::new();
        let mut duplicates: Vec<String> = Vec::new();
        for (_, column) in self.iter() {
            if seen.contains(&column) {
                if !duplicates.iter().any(|d| d == column) {
                    duplicates.push(column.to_string());
                }
            } else {
                seen.push(column);
            }
        }
        if !duplicates.is_empty() {
            errors.push(MappingError::DuplicateColumns(duplicates));
        }
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    pub fn into_validated(self) -> Result<Self, MappingErrors> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(MappingErrors(errors))
        }
    }
}
