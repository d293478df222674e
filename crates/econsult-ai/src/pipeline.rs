//! Staged processing of an uploaded comment batch.
//!
//! Parsing, sentiment analysis, and summarisation run one after another.
//! Each stage advances in fixed percentage steps; a [`StepClock`] decides how
//! long to wait between steps so the same state machine can be driven by
//! real time or instantly.

use std::fmt;
use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Stage of the processing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Parsing,
    Analyzing,
    Summarizing,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Self::Parsing, Self::Analyzing, Self::Summarizing];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Parsing => "Parsing CSV Data",
            Self::Analyzing => "Analyzing Sentiment",
            Self::Summarizing => "Generating Summaries",
        }
    }

    /// Percentage points added per step.
    pub fn increment(&self) -> u32 {
        match self {
            Self::Parsing => 10,
            Self::Analyzing => 5,
            Self::Summarizing => 8,
        }
    }

    /// Pause between steps under [`TokioClock`].
    pub fn step_delay(&self) -> Duration {
        match self {
            Self::Parsing => Duration::from_millis(100),
            Self::Analyzing => Duration::from_millis(150),
            Self::Summarizing => Duration::from_millis(120),
        }
    }

    fn index(&self) -> u32 {
        match self {
            Self::Parsing => 0,
            Self::Analyzing => 1,
            Self::Summarizing => 2,
        }
    }

    fn next(&self) -> Option<Stage> {
        match self {
            Self::Parsing => Some(Self::Analyzing),
            Self::Analyzing => Some(Self::Summarizing),
            Self::Summarizing => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingState {
    Idle,
    Parsing,
    Analyzing,
    Summarizing,
    Complete,
    Failed,
}

impl ProcessingState {
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Parsing => Some(Stage::Parsing),
            Self::Analyzing => Some(Stage::Analyzing),
            Self::Summarizing => Some(Stage::Summarizing),
            Self::Idle | Self::Complete | Self::Failed => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.stage().is_some()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Parsing => "parsing",
            Self::Analyzing => "analyzing",
            Self::Summarizing => "summarizing",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

impl From<Stage> for ProcessingState {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Parsing => Self::Parsing,
            Stage::Analyzing => Self::Analyzing,
            Stage::Summarizing => Self::Summarizing,
        }
    }
}

impl fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("processing is not running (state: {0})")]
    NotRunning(ProcessingState),

    #[error("processing already running (state: {0})")]
    AlreadyRunning(ProcessingState),

    #[error("processing cancelled")]
    Cancelled,
}

/// Snapshot reported after every step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub state: ProcessingState,
    /// Progress of the current stage, 0..=100.
    pub stage_progress: u32,
    /// Progress of the whole run, 0.0..=100.0.
    pub overall: f64,
    pub processed_comments: usize,
    pub total_comments: usize,
}

/// State machine for one processing run.
///
/// `start` moves Idle (or a finished run) into Parsing; `step` advances the
/// current stage; reaching 100 moves on to the next stage at 0, and the last
/// stage ends in Complete. `cancel` drops all progress and returns to Idle.
#[derive(Debug, Clone)]
pub struct Pipeline {
    state: ProcessingState,
    stage_progress: u32,
    total_comments: usize,
    failure: Option<String>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            state: ProcessingState::Idle,
            stage_progress: 0,
            total_comments: 0,
            failure: None,
        }
    }

    pub fn state(&self) -> ProcessingState {
        self.state
    }

    /// Reason given to the last [`fail`](Self::fail), if the run failed.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn start(&mut self, total_comments: usize) -> Result<Progress, PipelineError> {
        if self.state.is_running() {
            return Err(PipelineError::AlreadyRunning(self.state));
        }
        self.state = ProcessingState::Parsing;
        self.stage_progress = 0;
        self.total_comments = total_comments;
        self.failure = None;
        info!(total_comments, "processing started");
        Ok(self.progress())
    }

    /// Advance the current stage by one increment.
    pub fn step(&mut self) -> Result<Progress, PipelineError> {
        let Some(stage) = self.state.stage() else {
            return Err(PipelineError::NotRunning(self.state));
        };

        self.stage_progress = (self.stage_progress + stage.increment()).min(100);
        if self.stage_progress >= 100 {
            match stage.next() {
                Some(next) => {
                    debug!(completed = ?stage, next = ?next, "stage complete");
                    self.state = next.into();
                    self.stage_progress = 0;
                }
                None => {
                    self.state = ProcessingState::Complete;
                    info!(total_comments = self.total_comments, "processing complete");
                }
            }
        }
        Ok(self.progress())
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<Progress, PipelineError> {
        if !self.state.is_running() {
            return Err(PipelineError::NotRunning(self.state));
        }
        let reason = reason.into();
        warn!(state = %self.state, %reason, "processing failed");
        self.state = ProcessingState::Failed;
        self.failure = Some(reason);
        Ok(self.progress())
    }

    /// Abandon the run. Progress is discarded; a new `start` begins from zero.
    pub fn cancel(&mut self) -> Result<Progress, PipelineError> {
        if !self.state.is_running() {
            return Err(PipelineError::NotRunning(self.state));
        }
        info!(state = %self.state, "processing cancelled");
        *self = Self::new();
        Ok(self.progress())
    }

    pub fn progress(&self) -> Progress {
        let (overall, processed) = match self.state {
            ProcessingState::Idle => (0.0, 0),
            ProcessingState::Complete => (100.0, self.total_comments),
            ProcessingState::Parsing | ProcessingState::Analyzing | ProcessingState::Summarizing => {
                let completed = self.state.stage().map_or(0, |s| s.index());
                let overall = f64::from(completed * 100 + self.stage_progress) / 3.0;
                (overall, self.processed_comments())
            }
            ProcessingState::Failed => (0.0, 0),
        };
        Progress {
            state: self.state,
            stage_progress: self.stage_progress,
            overall,
            processed_comments: processed,
            total_comments: self.total_comments,
        }
    }

    fn processed_comments(&self) -> usize {
        match self.state {
            ProcessingState::Analyzing => {
                (self.stage_progress as usize * self.total_comments) / 100
            }
            ProcessingState::Summarizing | ProcessingState::Complete => self.total_comments,
            _ => 0,
        }
    }

    /// Drive a started run to the end, waiting on `clock` before each step.
    ///
    /// `on_progress` sees every snapshot; returning `Break` cancels the run.
    pub async fn run<C: StepClock>(
        &mut self,
        clock: &C,
        mut on_progress: impl FnMut(&Progress) -> ControlFlow<()>,
    ) -> Result<Progress, PipelineError> {
        if !self.state.is_running() {
            return Err(PipelineError::NotRunning(self.state));
        }
        while let Some(stage) = self.state.stage() {
            clock.wait(stage).await;
            let progress = self.step()?;
            if on_progress(&progress).is_break() && self.state.is_running() {
                self.cancel()?;
                return Err(PipelineError::Cancelled);
            }
        }
        Ok(self.progress())
    }
}

/// Source of the pause between processing steps.
pub trait StepClock {
    fn wait(&self, stage: Stage) -> impl Future<Output = ()> + Send;
}

/// Sleeps each stage's [`Stage::step_delay`] on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl StepClock for TokioClock {
    async fn wait(&self, stage: Stage) {
        tokio::time::sleep(stage.step_delay()).await;
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantClock;

impl StepClock for InstantClock {
    async fn wait(&self, _stage: Stage) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(total: usize) -> Pipeline {
        let mut p = Pipeline::new();
        p.start(total).unwrap();
        p
    }

    fn step_n(p: &mut Pipeline, n: usize) -> Progress {
        let mut last = p.progress();
        for _ in 0..n {
            last = p.step().unwrap();
        }
        last
    }

    #[test]
    fn idle_pipeline_cannot_step() {
        let mut p = Pipeline::new();
        assert_eq!(p.step(), Err(PipelineError::NotRunning(ProcessingState::Idle)));
        assert!(p.cancel().is_err());
        assert!(p.fail("nothing to fail").is_err());
    }

    #[test]
    fn parsing_takes_ten_steps() {
        let mut p = started(200);
        let mid = step_n(&mut p, 5);
        assert_eq!(mid.state, ProcessingState::Parsing);
        assert_eq!(mid.stage_progress, 50);
        assert!((mid.overall - 50.0 / 3.0).abs() < 1e-9);
        assert_eq!(mid.processed_comments, 0);

        let done = step_n(&mut p, 5);
        assert_eq!(done.state, ProcessingState::Analyzing);
        assert_eq!(done.stage_progress, 0);
        assert!((done.overall - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn analysing_counts_processed_comments() {
        let mut p = started(200);
        step_n(&mut p, 10);
        let p1 = step_n(&mut p, 3);
        assert_eq!(p1.state, ProcessingState::Analyzing);
        assert_eq!(p1.stage_progress, 15);
        assert_eq!(p1.processed_comments, 30);

        let p2 = step_n(&mut p, 17);
        assert_eq!(p2.state, ProcessingState::Summarizing);
        assert_eq!(p2.processed_comments, 200);
    }

    #[test]
    fn processed_comments_round_down() {
        let mut p = started(7);
        step_n(&mut p, 10);
        // 5% of 7
        assert_eq!(p.step().unwrap().processed_comments, 0);
        // 15% of 7 = 1.05
        assert_eq!(step_n(&mut p, 2).processed_comments, 1);
    }

    #[test]
    fn summarising_clamps_last_step_and_completes() {
        let mut p = started(10);
        step_n(&mut p, 10 + 20);
        assert_eq!(p.state(), ProcessingState::Summarizing);

        let before_last = step_n(&mut p, 12);
        assert_eq!(before_last.stage_progress, 96);
        assert_eq!(before_last.state, ProcessingState::Summarizing);

        let done = p.step().unwrap();
        assert_eq!(done.state, ProcessingState::Complete);
        assert_eq!(done.overall, 100.0);
        assert_eq!(done.processed_comments, 10);
        assert!(matches!(p.step(), Err(PipelineError::NotRunning(ProcessingState::Complete))));
    }

    #[test]
    fn overall_never_decreases() {
        let mut p = started(50);
        let mut last = 0.0;
        while p.state().is_running() {
            let progress = p.step().unwrap();
            assert!(progress.overall >= last);
            last = progress.overall;
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn cannot_start_twice() {
        let mut p = started(5);
        assert_eq!(
            p.start(5),
            Err(PipelineError::AlreadyRunning(ProcessingState::Parsing))
        );
    }

    #[test]
    fn cancel_discards_progress() {
        let mut p = started(100);
        step_n(&mut p, 14);
        assert_eq!(p.state(), ProcessingState::Analyzing);

        let cancelled = p.cancel().unwrap();
        assert_eq!(cancelled.state, ProcessingState::Idle);
        assert_eq!(cancelled.stage_progress, 0);
        assert_eq!(cancelled.overall, 0.0);
        assert_eq!(cancelled.total_comments, 0);

        let restarted = p.start(100).unwrap();
        assert_eq!(restarted.state, ProcessingState::Parsing);
        assert_eq!(restarted.overall, 0.0);
    }

    #[test]
    fn failure_is_terminal_until_restart() {
        let mut p = started(10);
        step_n(&mut p, 3);
        let failed = p.fail("upload was not UTF-8").unwrap();
        assert_eq!(failed.state, ProcessingState::Failed);
        assert_eq!(p.failure(), Some("upload was not UTF-8"));
        assert!(p.step().is_err());

        p.start(10).unwrap();
        assert_eq!(p.failure(), None);
        assert_eq!(p.state(), ProcessingState::Parsing);
    }

    #[tokio::test]
    async fn run_to_completion_reports_every_step() {
        let mut p = started(40);
        let mut states = Vec::new();
        let done = p
            .run(&InstantClock, |progress| {
                states.push(progress.state);
                ControlFlow::Continue(())
            })
            .await
            .unwrap();

        assert_eq!(done.state, ProcessingState::Complete);
        assert_eq!(done.processed_comments, 40);
        // 10 parsing + 20 analysing + 13 summarising steps
        assert_eq!(states.len(), 43);
        assert_eq!(states.last(), Some(&ProcessingState::Complete));
    }

    #[tokio::test]
    async fn run_can_be_cancelled_from_callback() {
        let mut p = started(40);
        let result = p
            .run(&InstantClock, |progress| {
                if progress.state == ProcessingState::Analyzing {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .await;

        assert_eq!(result, Err(PipelineError::Cancelled));
        assert_eq!(p.state(), ProcessingState::Idle);
    }

    #[tokio::test]
    async fn run_requires_start() {
        let mut p = Pipeline::new();
        let result = p.run(&InstantClock, |_| ControlFlow::Continue(())).await;
        assert_eq!(result, Err(PipelineError::NotRunning(ProcessingState::Idle)));
    }

    #[tokio::test]
    async fn tokio_clock_waits_per_stage() {
        let start = tokio::time::Instant::now();
        TokioClock.wait(Stage::Parsing).await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
