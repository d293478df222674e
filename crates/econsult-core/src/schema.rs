/// Arrow schema definitions for consultation comment exports.
pub mod comments {
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    pub const ID: &str = "id";
    pub const STAKEHOLDER: &str = "stakeholder";
    pub const STAKEHOLDER_TYPE: &str = "stakeholder_type";
    pub const PROVISION: &str = "provision";
    pub const TEXT: &str = "text";
    pub const SENTIMENT: &str = "sentiment";
    pub const CONFIDENCE: &str = "confidence";
    pub const SUMMARY: &str = "summary";
    pub const KEYWORDS: &str = "keywords";
    pub const DATE: &str = "date";
    pub const FLAGGED: &str = "flagged";
    pub const NOTES: &str = "notes";
    pub const INCLUDE_IN_REPORT: &str = "include_in_report";

    /// Field definition for a named comment column.
    ///
    /// Returns `None` for names outside the comment schema.
    pub fn field(name: &str) -> Option<Field> {
        let field = match name {
            ID => Field::new(ID, DataType::Utf8, false),
            STAKEHOLDER => Field::new(STAKEHOLDER, DataType::Utf8, false),
            STAKEHOLDER_TYPE => Field::new(STAKEHOLDER_TYPE, DataType::Utf8, false),
            PROVISION => Field::new(PROVISION, DataType::Utf8, false),
            TEXT => Field::new(TEXT, DataType::Utf8, false),
            SENTIMENT => Field::new(SENTIMENT, DataType::Utf8, false),
            CONFIDENCE => Field::new(CONFIDENCE, DataType::Float64, false),
            SUMMARY => Field::new(SUMMARY, DataType::Utf8, false),
            KEYWORDS => Field::new(
                KEYWORDS,
                DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
                false,
            ),
            DATE => Field::new(DATE, DataType::Date32, false),
            FLAGGED => Field::new(FLAGGED, DataType::Boolean, false),
            NOTES => Field::new(NOTES, DataType::Utf8, false),
            INCLUDE_IN_REPORT => Field::new(INCLUDE_IN_REPORT, DataType::Boolean, false),
            _ => return None,
        };
        Some(field)
    }

    /// Every comment column, in canonical order.
    pub const ALL_COLUMNS: &[&str] = &[
        ID,
        STAKEHOLDER,
        STAKEHOLDER_TYPE,
        PROVISION,
        TEXT,
        SENTIMENT,
        CONFIDENCE,
        SUMMARY,
        KEYWORDS,
        DATE,
        FLAGGED,
        NOTES,
        INCLUDE_IN_REPORT,
    ];

    /// Schema for a subset of columns, kept in the order given.
    ///
    /// Unknown names are skipped.
    pub fn projected_schema(columns: &[&str]) -> Schema {
        Schema::new(columns.iter().filter_map(|c| field(c)).collect::<Vec<_>>())
    }

    /// Full comment schema.
    pub fn comment_schema() -> Schema {
        projected_schema(ALL_COLUMNS)
    }
}
