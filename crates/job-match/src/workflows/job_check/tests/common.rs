use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use crate::matching::{Job, JobMatcher, Match, MatchEngine, MatchScore, MatchingConfig, Resume};
use crate::workflows::job_check::{
    JobCheckPipeline, JobSource, LoadError, Notifier, NotifyError, ResumeSource, StaticJobSource,
    StaticResumeSource,
};

pub(super) const JOBS_JSON: &str = r#"[
  {
    "id": "job-1",
    "title": "Frontend Developer",
    "company": "TechCorp",
    "postedAt": "2025-11-24T10:00:00Z",
    "yearsExperienceRequired": 3,
    "requiredSkills": ["React", "TypeScript"],
    "preferredSkills": ["Node.js", "AWS", "Docker"],
    "location": "Remote",
    "salary": "$90k-$110k"
  },
  {
    "id": "job-2",
    "title": "Python Developer",
    "company": "DataCorp",
    "postedAt": "2025-11-24T11:00:00Z",
    "yearsExperienceRequired": 2,
    "requiredSkills": ["Python", "Django", "MySQL"],
    "preferredSkills": [],
    "location": "Remote",
    "salary": "$80k-$100k"
  },
  {
    "id": "job-3",
    "title": "Full Stack Developer",
    "company": "WebCorp",
    "postedAt": "2025-11-25T09:30:00Z",
    "yearsExperienceRequired": 4,
    "requiredSkills": ["react", "node.js", "GraphQL"],
    "preferredSkills": ["PostgreSQL"],
    "location": "Austin, TX",
    "salary": "$100k-$120k"
  }
]"#;

pub(super) const RESUME_JSON: &str = r#"{
  "userId": "user-42",
  "profile": {
    "name": "John Doe",
    "email": "john@example.com",
    "yearsOfExperience": 3
  },
  "skills": ["React", "TypeScript", "Node.js", "PostgreSQL", "Git"],
  "preferences": {
    "maxYearsRequired": 5,
    "minSkillMatch": 2
  }
}"#;

pub(super) fn jobs() -> Vec<Job> {
    serde_json::from_str(JOBS_JSON).expect("fixture jobs parse")
}

pub(super) fn resume() -> Resume {
    serde_json::from_str(RESUME_JSON).expect("fixture resume parses")
}

pub(super) fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}

pub(super) fn matcher() -> Arc<MatchEngine> {
    Arc::new(MatchEngine::new(MatchingConfig::default()))
}

pub(super) type StaticPipeline<N> = JobCheckPipeline<StaticJobSource, StaticResumeSource, N>;

pub(super) fn static_pipeline(
    jobs: Vec<Job>,
) -> (StaticPipeline<RecordingNotifier>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let pipeline = JobCheckPipeline::new(
        Arc::new(StaticJobSource::new(jobs)),
        Arc::new(StaticResumeSource::new(resume())),
        matcher(),
        notifier.clone(),
    );
    (pipeline, notifier)
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    deliveries: Mutex<Vec<Vec<Match>>>,
}

impl RecordingNotifier {
    pub(super) fn deliveries(&self) -> Vec<Vec<Match>> {
        self.deliveries.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, matches: &[Match], _resume: &Resume) -> Result<(), NotifyError> {
        self.deliveries
            .lock()
            .expect("notifier mutex poisoned")
            .push(matches.to_vec());
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _matches: &[Match], _resume: &Resume) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay offline".to_string()))
    }
}

pub(super) struct UnavailableJobSource;

impl JobSource for UnavailableJobSource {
    fn scrape_jobs(&self) -> Result<Vec<Job>, LoadError> {
        Err(LoadError::Unavailable("job board offline".to_string()))
    }
}

pub(super) struct UnavailableResumeSource;

impl ResumeSource for UnavailableResumeSource {
    fn load_resume(&self) -> Result<Resume, LoadError> {
        Err(LoadError::Unavailable("profile store offline".to_string()))
    }
}

/// Fails the first `failures` calls, then serves the fixture jobs.
pub(super) struct FlakyJobSource {
    failures: usize,
    calls: AtomicUsize,
}

impl FlakyJobSource {
    pub(super) fn new(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl JobSource for FlakyJobSource {
    fn scrape_jobs(&self) -> Result<Vec<Job>, LoadError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(LoadError::Unavailable(format!("transient failure {}", call + 1)))
        } else {
            Ok(jobs())
        }
    }
}

/// Delegates to the default engine and counts how often matching runs.
#[derive(Default)]
pub(super) struct CountingMatcher {
    engine: MatchEngine,
    find_calls: AtomicUsize,
}

impl CountingMatcher {
    pub(super) fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }
}

impl JobMatcher for CountingMatcher {
    fn find_matches(&self, jobs: &[Job], resume: &Resume) -> Vec<Match> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.engine.find_matches(jobs, resume)
    }

    fn calculate_score(&self, job: &Job, resume: &Resume) -> MatchScore {
        self.engine.calculate_score(job, resume)
    }
}

/// Fails the first `failures` deliveries, then records like [`RecordingNotifier`].
pub(super) struct FlakyNotifier {
    failures: usize,
    attempts: AtomicUsize,
    delivered: RecordingNotifier,
}

impl FlakyNotifier {
    pub(super) fn new(failures: usize) -> Self {
        Self {
            failures,
            attempts: AtomicUsize::new(0),
            delivered: RecordingNotifier::default(),
        }
    }

    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub(super) fn deliveries(&self) -> Vec<Vec<Match>> {
        self.delivered.deliveries()
    }
}

impl Notifier for FlakyNotifier {
    fn notify(&self, matches: &[Match], resume: &Resume) -> Result<(), NotifyError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            return Err(NotifyError::Transport(format!(
                "delivery attempt {} rejected",
                attempt + 1
            )));
        }
        self.delivered.notify(matches, resume)
    }
}
