//! Review engine: in-memory comment store, query pipeline, aggregation, and report export.

mod error;
pub use error::StoreError;

pub mod export;
pub mod page;
pub mod query;
pub mod report;
pub mod stats;
mod store;

pub use export::{comments_to_record_batch, project_record_batch};
pub use page::{PageView, ReviewSession, paginate, total_pages};
pub use query::{QueryResult, compare, matches, run_query};
pub use report::{ExportConfig, ExportFormat, Report, ReportFilter};
pub use stats::{
    Insights, KeywordCount, KeywordTier, ProvisionStat, SentimentCounts, average_confidence,
    keyword_tally, provision_breakdown,
};
pub use store::CommentStore;
