//! econsult CLI: review stakeholder comments on a draft law.
//!
//! Usage:
//!   econsult [--data comments.json] list [--sentiment negative --flagged flagged ...]
//!   econsult show <id>
//!   econsult flag <id> | note <id> <text> | include <id> | update <id> <patch>
//!   econsult stats | report | mapping <header-line> | process --comments N

mod display;
mod process;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use econsult_ai::{ColumnMapping, InstantClock, TokioClock, parse_header_line};
use econsult_core::{
    CommentId, CommentUpdate, FilterSpec, RawFilterSpec, ReviewConfig, Sentiment, StakeholderType,
};
use econsult_store::{
    CommentStore, ExportConfig, ExportFormat, Insights, Report, ReportFilter, ReviewSession,
    keyword_tally, provision_breakdown, run_query,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const STATS_KEYWORDS: usize = 15;

#[derive(Parser)]
#[command(
    name = "econsult",
    version,
    about = "Review engine for public consultation comments"
)]
struct Cli {
    /// JSON array of comments (defaults to the built-in sample consultation)
    #[arg(long, global = true, env = "ECONSULT_DATA")]
    data: Option<PathBuf>,

    /// JSON review configuration file
    #[arg(long, global = true, env = "ECONSULT_CONFIG")]
    config: Option<PathBuf>,

    /// Comments per page (overrides the configuration file)
    #[arg(long, global = true, env = "ECONSULT_PAGE_SIZE")]
    page_size: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of comments matching the filters
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Page to show (1-indexed, clamped to the available pages)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show a single comment
    Show {
        id: String,
    },
    /// Toggle the reviewer flag on a comment
    Flag {
        id: String,
    },
    /// Replace the reviewer notes on a comment
    Note {
        id: String,
        text: String,
    },
    /// Toggle whether a comment is included in reports
    Include {
        id: String,
    },
    /// Apply a JSON patch of reviewer fields (flagged, notes, includeInReport)
    Update {
        id: String,
        patch: String,
    },
    /// Sentiment overview, insights, provision breakdown, and top keywords
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Select comments for a report and print the export batch
    Report(ReportArgs),
    /// Auto-detect a column mapping for a CSV header line
    Mapping {
        /// e.g. "Name,Organization Type,Comment,Date Submitted,Section"
        header: String,
    },
    /// Run the staged processing pipeline for an upload
    Process {
        /// Number of comments in the upload
        #[arg(long)]
        comments: usize,
        /// Skip the delays between steps
        #[arg(long)]
        instant: bool,
    },
}

/// Comment explorer filters, in the dashboard's string form.
#[derive(Args)]
struct FilterArgs {
    /// Case-insensitive text search over text, stakeholder, provision, summary, keywords
    #[arg(long, short, default_value = "")]
    query: String,
    /// positive | negative | neutral | all
    #[arg(long, default_value = "all")]
    sentiment: String,
    /// Individual | Organization | Government | NGO | all
    #[arg(long, default_value = "all")]
    stakeholder_type: String,
    /// Exact provision label, or all
    #[arg(long, default_value = "all")]
    provision: String,
    /// flagged | unflagged | all
    #[arg(long, default_value = "all")]
    flagged: String,
    /// date | sentiment | confidence | stakeholder
    #[arg(long, default_value = "date")]
    sort_by: String,
    /// asc | desc
    #[arg(long, default_value = "desc")]
    order: String,
}

impl FilterArgs {
    fn into_spec(self) -> anyhow::Result<FilterSpec> {
        let raw = RawFilterSpec {
            query: self.query,
            sentiment: self.sentiment,
            stakeholder_type: self.stakeholder_type,
            provision: self.provision,
            flagged: self.flagged,
            sort_by: self.sort_by,
            sort_order: self.order,
        };
        FilterSpec::try_from(raw).context("invalid filter")
    }
}

#[derive(Args)]
struct ReportArgs {
    /// Sentiments to include (comma-separated; default all)
    #[arg(long, value_delimiter = ',')]
    sentiment: Vec<Sentiment>,
    /// Stakeholder types to include (comma-separated; default all)
    #[arg(long, value_delimiter = ',')]
    stakeholder_type: Vec<StakeholderType>,
    /// Earliest submission date (inclusive)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Latest submission date (inclusive)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Only flagged comments
    #[arg(long)]
    only_flagged: bool,
    /// Also take comments not marked for the report
    #[arg(long)]
    all_comments: bool,
    /// Provisions to include (repeatable; default all)
    #[arg(long)]
    provision: Vec<String>,

    /// Export format handed to the encoder
    #[arg(long, default_value = "csv")]
    format: ExportFormat,
    #[arg(long)]
    no_charts: bool,
    #[arg(long)]
    no_word_cloud: bool,
    #[arg(long)]
    no_summaries: bool,
    /// Include full comment text
    #[arg(long)]
    full_comments: bool,
    #[arg(long)]
    no_metadata: bool,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

impl ReportArgs {
    fn filter(&self) -> ReportFilter {
        let mut filter = ReportFilter::default();
        if !self.sentiment.is_empty() {
            filter.sentiments = self.sentiment.iter().copied().collect();
        }
        if !self.stakeholder_type.is_empty() {
            filter.stakeholder_types = self.stakeholder_type.iter().copied().collect();
        }
        filter.date_from = self.from;
        filter.date_to = self.to;
        filter.only_flagged = self.only_flagged;
        filter.only_report_ready = !self.all_comments;
        filter.provisions = self.provision.iter().cloned().collect();
        filter
    }

    fn export_config(&self) -> ExportConfig {
        let defaults = ExportConfig::default();
        ExportConfig {
            include_charts: !self.no_charts,
            include_word_cloud: !self.no_word_cloud,
            include_summaries: !self.no_summaries,
            include_full_comments: self.full_comments,
            include_metadata: !self.no_metadata,
            report_title: self.title.clone().unwrap_or(defaults.report_title),
            report_description: self
                .description
                .clone()
                .unwrap_or(defaults.report_description),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.page_size)?;
    let store = open_store(cli.data.as_deref())?;

    match cli.command {
        Commands::List { filter, page } => cmd_list(store, config, filter, page),
        Commands::Show { id } => cmd_show(&store, &id),
        Commands::Flag { id } => {
            cmd_update(store, config, &id, |s, id| s.toggle_flag(id).map(|_| ()))
        }
        Commands::Note { id, text } => {
            cmd_update(store, config, &id, |s, id| s.set_notes(id, text).map(|_| ()))
        }
        Commands::Include { id } => cmd_update(store, config, &id, |s, id| {
            s.toggle_report_inclusion(id).map(|_| ())
        }),
        Commands::Update { id, patch } => {
            let patch: CommentUpdate = serde_json::from_str(&patch)
                .context("patch may only set flagged, notes, includeInReport")?;
            cmd_update(store, config, &id, |s, id| s.update(id, &patch).map(|_| ()))
        }
        Commands::Stats { filter } => cmd_stats(&store, filter),
        Commands::Report(args) => cmd_report(&store, &args),
        Commands::Mapping { header } => cmd_mapping(&header),
        Commands::Process { comments, instant } => cmd_process(comments, instant).await,
    }
}

fn load_config(path: Option<&Path>, page_size: Option<usize>) -> anyhow::Result<ReviewConfig> {
    let mut config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<ReviewConfig>(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ReviewConfig::default(),
    };
    if let Some(page_size) = page_size {
        config = config.with_page_size(page_size);
    }
    config.validate()?;
    Ok(config)
}

fn open_store(path: Option<&Path>) -> anyhow::Result<CommentStore> {
    match path {
        Some(path) => {
            CommentStore::open(path).with_context(|| format!("opening {}", path.display()))
        }
        None => {
            let store = CommentStore::sample();
            info!(count = store.len(), "using sample consultation");
            Ok(store)
        }
    }
}

// ── Commands ──

fn cmd_list(
    store: CommentStore,
    config: ReviewConfig,
    filter: FilterArgs,
    page: usize,
) -> anyhow::Result<()> {
    let mut session = ReviewSession::new(store, config)?;
    session.set_filter(filter.into_spec()?);
    session.go_to_page(page);

    let view = session.view();
    display::print_page(&view, session.active_filter_count())
}

fn cmd_show(store: &CommentStore, id: &str) -> anyhow::Result<()> {
    let id = CommentId::new(id);
    let comment = store
        .get(&id)
        .with_context(|| format!("comment not found: {id}"))?;
    let batch = econsult_store::comments_to_record_batch([comment])?;
    display::print_comment_card(&batch);
    Ok(())
}

/// Apply a reviewer action in a fresh session and show the result.
///
/// Nothing is written back to the data file.
fn cmd_update(
    store: CommentStore,
    config: ReviewConfig,
    id: &str,
    action: impl FnOnce(&mut ReviewSession, &CommentId) -> Result<(), econsult_store::StoreError>,
) -> anyhow::Result<()> {
    let id = CommentId::new(id);
    let mut session = ReviewSession::new(store, config)?;
    action(&mut session, &id)?;

    let comment = session
        .store()
        .get(&id)
        .with_context(|| format!("comment not found: {id}"))?;
    println!("Updated {}", display::one_line(comment));
    println!("(session only; the data file is unchanged)");
    println!();
    let batch = econsult_store::comments_to_record_batch([comment])?;
    display::print_comment_card(&batch);
    Ok(())
}

fn cmd_stats(store: &CommentStore, filter: FilterArgs) -> anyhow::Result<()> {
    let spec = filter.into_spec()?;
    let result = run_query(store.comments(), &spec);
    if result.is_empty() {
        println!("No comments match the current filters.");
        return Ok(());
    }

    let insights = Insights::from_comments(&result.comments);
    println!("=== Sentiment overview ({} comments) ===", result.total_results);
    display::print_counts(&insights.counts);
    println!("  overall: {}", insights.counts.overall());
    println!(
        "  average confidence: {:.0}%",
        insights.average_confidence * 100.0
    );
    println!(
        "  flagged: {}  stakeholder types: {}",
        insights.flagged,
        insights.stakeholder_type_count()
    );
    println!();

    println!("Stakeholders");
    for (kind, n) in &insights.by_stakeholder_type {
        println!("  {:<26} {}", kind.as_str(), n);
    }
    println!();

    display::print_provisions(&provision_breakdown(&result.comments));
    display::print_keywords(&keyword_tally(&result.comments, STATS_KEYWORDS));
    Ok(())
}

fn cmd_report(store: &CommentStore, args: &ReportArgs) -> anyhow::Result<()> {
    let filter = args.filter();
    let config = args.export_config();
    let report = Report::build(store.comments(), &filter, &config);

    display::print_report_summary(&report);
    if report.is_empty() {
        println!("No comments match the report filters; nothing to export.");
        return Ok(());
    }

    let batch = report.to_record_batch()?;
    println!(
        "Export for {} ({} rows, {} columns)",
        args.format.file_name(),
        batch.num_rows(),
        batch.num_columns()
    );
    display::print_batch(&batch)
}

fn cmd_mapping(header: &str) -> anyhow::Result<()> {
    let headers = parse_header_line(header);
    anyhow::ensure!(!headers.is_empty(), "header line has no columns");

    let mapping = ColumnMapping::auto_detect(&headers);
    let errors = mapping.validate();
    display::print_mapping(&headers, &mapping, &errors);
    mapping.into_validated()?;
    Ok(())
}

async fn cmd_process(comments: usize, instant: bool) -> anyhow::Result<()> {
    let stats = if instant {
        process::run_process(&InstantClock, comments).await?
    } else {
        process::run_process(&TokioClock, comments).await?
    };
    println!(
        "Processed {} comments in {} steps ({:.1}s)",
        stats.total_comments, stats.steps, stats.elapsed_secs
    );
    Ok(())
}
