//! Terminal rendering for comments, pages, statistics, and reports.
//!
//! A single comment is shown as a vertical card built from a one-row
//! RecordBatch, with type-aware formatting for strings, numbers, dates,
//! booleans, and keyword lists. Pages and report exports use Arrow's table
//! pretty-printer.

use arrow::array::{Array, BooleanArray, Float64Array, ListArray, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use econsult_ai::{ColumnMapping, LogicalField, MappingError};
use econsult_core::{Comment, Sentiment, comments as schema};
use econsult_store::{
    KeywordCount, PageView, ProvisionStat, Report, SentimentCounts, project_record_batch,
};

const WRAP_WIDTH: usize = 76;
const MAX_KEYWORDS: usize = 10;

// ── Card section groupings ──

const SUBMISSION: &[&str] = &[
    schema::STAKEHOLDER,
    schema::STAKEHOLDER_TYPE,
    schema::DATE,
    schema::PROVISION,
];

const ANALYSIS: &[&str] = &[
    schema::SENTIMENT,
    schema::CONFIDENCE,
    schema::SUMMARY,
    schema::KEYWORDS,
];

const REVIEW: &[&str] = &[schema::FLAGGED, schema::INCLUDE_IN_REPORT, schema::NOTES];

/// Columns of the comments table, in display order.
const PAGE_COLUMNS: &[&str] = &[
    schema::ID,
    schema::DATE,
    schema::STAKEHOLDER,
    schema::STAKEHOLDER_TYPE,
    schema::SENTIMENT,
    schema::CONFIDENCE,
    schema::FLAGGED,
    schema::PROVISION,
];

// ── Comments ──

/// Print the first row of a comment batch as a vertical card.
pub fn print_comment_card(batch: &RecordBatch) {
    if batch.num_rows() == 0 {
        return;
    }
    let id = get_utf8(batch, schema::ID).unwrap_or_default();
    let stakeholder = get_utf8(batch, schema::STAKEHOLDER).unwrap_or_default();

    println!("=== Comment {id} ===");
    println!("{stakeholder}");
    println!();

    print_section(batch, "Submission", SUBMISSION);
    print_section(batch, "Analysis", ANALYSIS);
    print_section(batch, "Review", REVIEW);

    if let Some(text) = get_utf8(batch, schema::TEXT)
        && !text.is_empty()
    {
        println!("Comment");
        for line in wrap(&text, WRAP_WIDTH) {
            println!("  {line}");
        }
        println!();
    }
}

/// Print one page of the comments explorer.
pub fn print_page(view: &PageView<'_>, active_filters: usize) -> anyhow::Result<()> {
    if view.is_empty() {
        println!("No comments match the current filters.");
        if active_filters > 0 {
            println!("({active_filters} active filters; run without filter flags to clear them)");
        }
        return Ok(());
    }

    let batch = project_record_batch(view.comments.iter().copied(), PAGE_COLUMNS)?;
    println!("{}", pretty_format_batches(&[batch])?);
    println!(
        "Page {} of {}  ({} results)",
        view.page, view.total_pages, view.total_results
    );
    print_counts(&view.counts);
    Ok(())
}

// ── Statistics ──

pub fn print_counts(counts: &SentimentCounts) {
    println!(
        "  positive {} ({}%)  negative {} ({}%)  neutral {} ({}%)",
        counts.positive,
        counts.percentage(Sentiment::Positive),
        counts.negative,
        counts.percentage(Sentiment::Negative),
        counts.neutral,
        counts.percentage(Sentiment::Neutral),
    );
}

pub fn print_provisions(stats: &[ProvisionStat]) {
    if stats.is_empty() {
        return;
    }
    println!("Provisions");
    for s in stats {
        println!(
            "  {:<44} {:>3} comments  {:+.2}  {}",
            truncate(&s.provision, 44),
            s.comments,
            s.average_sentiment,
            s.leaning()
        );
    }
    println!();
}

pub fn print_keywords(keywords: &[KeywordCount]) {
    if keywords.is_empty() {
        return;
    }
    println!("Top keywords");
    for k in keywords {
        println!("  {:<28} {:>3}  {:?}", k.keyword, k.count, k.tier);
    }
    println!();
}

// ── Reports ──

pub fn print_report_summary(report: &Report<'_>) {
    let insights = &report.insights;
    println!("=== {} ===", report.title);
    println!("{}", report.description);
    println!();

    println!("Selection");
    println!("  {:<26} {}", "comments", report.len());
    println!("  {:<26} {}", "overall sentiment", insights.counts.overall());
    println!(
        "  {:<26} {:.0}%",
        "average confidence",
        insights.average_confidence * 100.0
    );
    println!("  {:<26} {}", "flagged", insights.flagged);
    println!(
        "  {:<26} {}",
        "stakeholder types",
        insights.stakeholder_type_count()
    );
    println!(
        "  {:<26} {:.1} KB",
        "estimated size",
        report.estimated_size_kb()
    );
    print_counts(&insights.counts);
    println!();

    print_list("Top concerns", &insights.top_concerns);
    print_list("Positive highlights", &insights.positive_highlights);
    print_keywords(&report.keywords);
}

pub fn print_batch(batch: &RecordBatch) -> anyhow::Result<()> {
    println!("{}", pretty_format_batches(std::slice::from_ref(batch))?);
    Ok(())
}

// ── Column mapping ──

pub fn print_mapping(headers: &[String], mapping: &ColumnMapping, errors: &[MappingError]) {
    println!("Columns: {}", headers.join(", "));
    println!();
    for field in LogicalField::ALL {
        let marker = if field.is_required() { "*" } else { " " };
        let column = mapping.get(field).unwrap_or("-- not mapped --");
        println!("  {marker} {:<20} {}", field.label(), column);
    }
    println!();
    if errors.is_empty() {
        println!("Mapping is valid.");
    } else {
        for e in errors {
            println!("  ! {e}");
        }
    }
}

// ── Section rendering ──

fn print_section(batch: &RecordBatch, header: &str, cols: &[&str]) {
    let rows: Vec<(&str, String)> = cols
        .iter()
        .filter_map(|&name| format_value(batch, name).map(|v| (name, v)))
        .collect();
    if rows.is_empty() {
        return;
    }

    println!("{header}");
    for (name, value) in rows {
        println!("  {name:<20} {value}");
    }
    println!();
}

/// Format row 0 of `col_name`, or `None` when absent, null, or empty.
fn format_value(batch: &RecordBatch, col_name: &str) -> Option<String> {
    let col = batch.column_by_name(col_name)?;
    if col.is_null(0) {
        return None;
    }

    let value = match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(0).to_string())?,
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| format!("{:.0}%", a.value(0) * 100.0))?,
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|a| if a.value(0) { "yes" } else { "no" }.to_string())?,
        DataType::Date32 => {
            let fmt = arrow::util::display::ArrayFormatter::try_new(
                col.as_ref(),
                &Default::default(),
            )
            .ok()?;
            fmt.value(0).to_string()
        }
        DataType::List(_) => list_utf8(col.as_ref())?,
        _ => format!("{col:?}"),
    };

    (!value.is_empty()).then_some(value)
}

fn list_utf8(col: &dyn Array) -> Option<String> {
    let list = col.as_any().downcast_ref::<ListArray>()?;
    let values = list.value(0);
    let strings = values.as_any().downcast_ref::<StringArray>()?;
    let items: Vec<&str> = (0..strings.len())
        .filter(|&i| !strings.is_null(i))
        .map(|i| strings.value(i))
        .collect();
    if items.is_empty() {
        return None;
    }
    let shown = items.len().min(MAX_KEYWORDS);
    let mut out = items[..shown].join(", ");
    if items.len() > MAX_KEYWORDS {
        out.push_str(&format!(" ... and {} more", items.len() - MAX_KEYWORDS));
    }
    Some(out)
}

// ── Helpers ──

fn get_utf8(batch: &RecordBatch, col_name: &str) -> Option<String> {
    let col = batch.column_by_name(col_name)?;
    if col.is_null(0) {
        return None;
    }
    col.as_any()
        .downcast_ref::<StringArray>()
        .map(|a| a.value(0).to_string())
}

fn print_list(header: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{header}");
    for item in items {
        println!("  - {item}");
    }
    println!();
}

/// One-line preview of a comment for mutation confirmations.
pub fn one_line(comment: &Comment) -> String {
    format!(
        "{} [{}] {}{}",
        comment.id,
        comment.sentiment,
        truncate(&comment.stakeholder, 40),
        if comment.flagged { " (flagged)" } else { "" }
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{head}...")
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
