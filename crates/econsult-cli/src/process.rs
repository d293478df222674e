//! Processing run: drives the staged pipeline and reports progress on stderr.

use std::ops::ControlFlow;
use std::time::Instant;

use econsult_ai::{Pipeline, ProcessingState, Progress, StepClock};

pub struct ProcessStats {
    pub total_comments: usize,
    pub steps: usize,
    pub elapsed_secs: f64,
}

/// Run every stage for `total_comments` comments, printing one line per step.
pub async fn run_process<C: StepClock>(
    clock: &C,
    total_comments: usize,
) -> anyhow::Result<ProcessStats> {
    let start = Instant::now();
    let mut pipeline = Pipeline::new();
    pipeline.start(total_comments)?;

    let mut steps = 0usize;
    let mut current = ProcessingState::Parsing;
    eprintln!("  {}", stage_label(current));

    pipeline
        .run(clock, |progress| {
            steps += 1;
            if progress.state != current {
                current = progress.state;
                if let Some(label) = current.stage().map(|s| s.label()) {
                    eprintln!("  {label}");
                }
            }
            eprintln!("{}", progress_line(progress));
            ControlFlow::Continue(())
        })
        .await?;

    Ok(ProcessStats {
        total_comments,
        steps,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}

fn stage_label(state: ProcessingState) -> &'static str {
    state.stage().map_or("", |s| s.label())
}

fn progress_line(progress: &Progress) -> String {
    format!(
        "    [{:>3}%] overall {:>5.1}%  {}/{} comments",
        progress.stage_progress,
        progress.overall,
        progress.processed_comments,
        progress.total_comments
    )
}
