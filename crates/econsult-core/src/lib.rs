pub mod comment;
pub mod config;
pub mod error;
pub mod filter;
pub mod sample;
pub mod schema;
pub mod sort_key;

pub use comment::{Comment, CommentId, CommentUpdate, Sentiment, StakeholderType};
pub use config::ReviewConfig;
pub use error::ValidationError;
pub use filter::{Filter, FilterSpec, FlagFilter, RawFilterSpec, SortKey, SortOrder};
pub use schema::comments;
pub use sort_key::normalize_provision;
