//! Arrow export of comment subsets.
//!
//! The export boundary receives a `RecordBatch`; encoding it as CSV, PDF or
//! anything else is left to the consumer.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, Float64Array, ListBuilder, StringArray, StringBuilder,
};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use econsult_core::{Comment, comments as schema};

use crate::StoreError;

/// Export comments with the full comment schema.
pub fn comments_to_record_batch<'a>(
    comments: impl IntoIterator<Item = &'a Comment>,
) -> Result<RecordBatch, StoreError> {
    project_record_batch(comments, schema::ALL_COLUMNS)
}

/// Export comments with only the named columns, in the order given.
///
/// Unknown column names are skipped.
pub fn project_record_batch<'a>(
    comments: impl IntoIterator<Item = &'a Comment>,
    columns: &[&str],
) -> Result<RecordBatch, StoreError> {
    let rows: Vec<&Comment> = comments.into_iter().collect();
    let schema = Arc::new(schema::projected_schema(columns));

    let arrays: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .map(|f| column(&rows, f.name()))
        .collect();

    Ok(RecordBatch::try_new(schema, arrays)?)
}

fn column(rows: &[&Comment], name: &str) -> ArrayRef {
    match name {
        schema::ID => utf8(rows, |c| c.id.as_str()),
        schema::STAKEHOLDER => utf8(rows, |c| c.stakeholder.as_str()),
        schema::STAKEHOLDER_TYPE => utf8(rows, |c| c.stakeholder_type.as_str()),
        schema::PROVISION => utf8(rows, |c| c.provision.as_str()),
        schema::TEXT => utf8(rows, |c| c.text.as_str()),
        schema::SENTIMENT => utf8(rows, |c| c.sentiment.as_str()),
        schema::SUMMARY => utf8(rows, |c| c.summary.as_str()),
        schema::NOTES => utf8(rows, |c| c.notes.as_str()),
        schema::CONFIDENCE => Arc::new(Float64Array::from_iter_values(
            rows.iter().map(|c| c.confidence),
        )),
        schema::DATE => Arc::new(Date32Array::from_iter_values(
            rows.iter().map(|c| days_since_epoch(c.date)),
        )),
        schema::FLAGGED => Arc::new(BooleanArray::from(
            rows.iter().map(|c| c.flagged).collect::<Vec<_>>(),
        )),
        schema::INCLUDE_IN_REPORT => Arc::new(BooleanArray::from(
            rows.iter().map(|c| c.include_in_report).collect::<Vec<_>>(),
        )),
        schema::KEYWORDS => {
            let mut builder = ListBuilder::new(StringBuilder::new());
            for c in rows {
                for k in &c.keywords {
                    builder.values().append_value(k);
                }
                builder.append(true);
            }
            Arc::new(builder.finish())
        }
        // projected_schema only yields known comment columns.
        other => unreachable!("no comment column named {other}"),
    }
}

fn utf8<'a>(rows: &[&'a Comment], get: impl Fn(&'a Comment) -> &'a str) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(rows.iter().map(|c| get(*c))))
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - epoch).num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, ListArray};
    use econsult_core::sample;

    #[test]
    fn full_export_shape() {
        let comments = sample::consultation_comments();
        let batch = comments_to_record_batch(&comments).unwrap();
        assert_eq!(batch.num_rows(), 10);
        assert_eq!(batch.num_columns(), 13);

        let ids = batch
            .column_by_name("id")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(ids.value(0), "1");
        assert_eq!(ids.value(9), "10");
    }

    #[test]
    fn projection_keeps_requested_columns() {
        let comments = sample::consultation_comments();
        let batch = project_record_batch(&comments[..2], &["sentiment", "id"]).unwrap();
        assert_eq!(batch.num_columns(), 2);
        assert_eq!(batch.schema().field(0).name(), "sentiment");

        let sentiments = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(sentiments.value(0), "positive");
        assert_eq!(sentiments.value(1), "negative");
    }

    #[test]
    fn keywords_and_dates_encoded() {
        let comments = sample::consultation_comments();
        let batch = project_record_batch(&comments[..1], &["keywords", "date"]).unwrap();

        let keywords = batch
            .column(0)
            .as_any()
            .downcast_ref::<ListArray>()
            .unwrap();
        let first = keywords.value(0);
        let first = first.as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(first.value(0), "privacy");

        let dates = batch
            .column(1)
            .as_any()
            .downcast_ref::<Date32Array>()
            .unwrap();
        // 2024-01-15
        assert_eq!(dates.value(0), 19737);
    }

    #[test]
    fn empty_subset_exports_empty_batch() {
        let batch = comments_to_record_batch(std::iter::empty()).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 13);
    }
}
