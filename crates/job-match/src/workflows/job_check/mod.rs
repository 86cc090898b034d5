//! Boundary around the matcher: where jobs and resumes come from, how a pass
//! runs, when it runs, and where the results go.

mod notifier;
mod pipeline;
mod schedule;
mod source;

#[cfg(test)]
mod tests;

pub use notifier::{render_digest, ConsoleNotifier, Notifier, NotifyError};
pub use pipeline::{JobCheckPipeline, JobCheckSummary, MatchJobOutcome, PipelineError};
pub use schedule::{
    retry, run_blocking, run_blocking_since, run_pass_with_retry, JobCheckSchedule, RetryPolicy,
    ScheduleReport, MIN_INTERVAL,
};
pub use source::{
    CsvJobSource, JobSource, JsonFileJobSource, JsonFileResumeSource, LoadError, ResumeSource,
    StaticJobSource, StaticResumeSource,
};
