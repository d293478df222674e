//! Ingestion boundary: column mapping for uploaded CSV files and the staged
//! processing run that labels a new comment batch.

pub mod mapping;
pub mod pipeline;

pub use mapping::{ColumnMapping, LogicalField, MappingError, MappingErrors, parse_header_line};
pub use pipeline::{
    InstantClock, Pipeline, PipelineError, ProcessingState, Progress, Stage, StepClock, TokioClock,
};
