use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use job_match::config::{AppConfig, ConfigWarning, DataConfig};
use job_match::matching::{Job, Match, MatchBand, MatchEngine, Resume};
use job_match::workflows::job_check::{
    CsvJobSource, JobCheckPipeline, JobSource, JsonFileJobSource, JsonFileResumeSource, LoadError,
    Notifier, NotifyError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Job file on disk; the extension picks the parser.
#[derive(Debug, Clone)]
pub(crate) enum FileJobSource {
    Json(JsonFileJobSource),
    Csv(CsvJobSource),
}

impl FileJobSource {
    pub(crate) fn for_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if is_csv(&path) {
            Self::Csv(CsvJobSource::new(path))
        } else {
            Self::Json(JsonFileJobSource::new(path))
        }
    }
}

impl JobSource for FileJobSource {
    fn scrape_jobs(&self) -> Result<Vec<Job>, LoadError> {
        match self {
            Self::Json(source) => source.scrape_jobs(),
            Self::Csv(source) => source.scrape_jobs(),
        }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

pub(crate) type FilePipeline<N> = JobCheckPipeline<FileJobSource, JsonFileResumeSource, N>;

/// Wires the configured files and weights into a pipeline.
pub(crate) fn file_pipeline<N>(
    data: &DataConfig,
    matcher: Arc<MatchEngine>,
    notifier: Arc<N>,
) -> FilePipeline<N>
where
    N: Notifier + 'static,
{
    JobCheckPipeline::new(
        Arc::new(FileJobSource::for_path(data.jobs_path.clone())),
        Arc::new(JsonFileResumeSource::new(data.resume_path.clone())),
        matcher,
        notifier,
    )
}

pub(crate) fn log_config_warnings(config: &AppConfig) {
    for warning in config.warnings() {
        match warning {
            ConfigWarning::UnbalancedWeights { total } => {
                warn!(total, "{warning}");
            }
        }
    }
}

/// Server-side delivery: one log line per match.
#[derive(Debug, Default, Clone)]
pub(crate) struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify(&self, matches: &[Match], resume: &Resume) -> Result<(), NotifyError> {
        if matches.is_empty() {
            info!(user_id = %resume.user_id, "no new job matches");
            return Ok(());
        }

        for item in matches {
            info!(
                user_id = %resume.user_id,
                job_id = %item.job.id,
                title = %item.job.title,
                company = %item.job.company,
                score = item.score.total,
                band = %MatchBand::from_total(item.score.total),
                "job match"
            );
        }
        Ok(())
    }
}

/// Writes the matches as a JSON array, for `check --json`.
pub(crate) struct JsonNotifier<W> {
    out: Mutex<W>,
}

impl JsonNotifier<io::Stdout> {
    pub(crate) fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonNotifier<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> Notifier for JsonNotifier<W> {
    fn notify(&self, matches: &[Match], _resume: &Resume) -> Result<(), NotifyError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| NotifyError::Transport("json writer poisoned".to_string()))?;
        serde_json::to_writer_pretty(&mut *out, matches).map_err(io::Error::from)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use job_match::matching::{find_matches, MatchingConfig};

    fn resume() -> Resume {
        serde_json::from_str(
            r#"{
  "userId": "user-42",
  "profile": { "name": "John Doe", "email": "john@example.com", "yearsOfExperience": 3 },
  "skills": ["React", "TypeScript", "Node.js"]
}"#,
        )
        .expect("resume parses")
    }

    fn job() -> Job {
        serde_json::from_str(
            r#"{
  "id": "job-1",
  "title": "Frontend Developer",
  "company": "TechCorp",
  "postedAt": "2025-11-24T10:00:00Z",
  "yearsExperienceRequired": 3,
  "requiredSkills": ["React", "TypeScript"],
  "preferredSkills": ["Node.js", "AWS", "Docker"],
  "location": "Remote",
  "salary": "$90k-$110k"
}"#,
        )
        .expect("job parses")
    }

    #[test]
    fn csv_extension_selects_csv_parser() {
        assert!(matches!(
            FileJobSource::for_path("exports/jobs.CSV"),
            FileJobSource::Csv(_)
        ));
        assert!(matches!(
            FileJobSource::for_path("./data/job-postings.json"),
            FileJobSource::Json(_)
        ));
        assert!(matches!(
            FileJobSource::for_path("jobs"),
            FileJobSource::Json(_)
        ));
    }

    #[test]
    fn json_notifier_writes_match_array() {
        let matches = find_matches(&[job()], &resume(), &MatchingConfig::default());
        let notifier = JsonNotifier::new(Vec::new());

        notifier.notify(&matches, &resume()).expect("notify succeeds");

        let written = notifier.into_inner();
        let value: serde_json::Value = serde_json::from_slice(&written).expect("valid json");
        let array = value.as_array().expect("array output");
        assert_eq!(array.len(), 1);
        assert_eq!(array[0]["job"]["id"], "job-1");
        assert_eq!(array[0]["score"]["total"], 86.7);
    }

    #[test]
    fn logging_notifier_accepts_empty_batches() {
        LoggingNotifier
            .notify(&[], &resume())
            .expect("empty batch is fine");
    }
}
