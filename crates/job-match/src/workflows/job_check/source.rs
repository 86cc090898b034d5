use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::matching::{Job, JobId, Resume};

/// Supplier of job postings for a pass.
pub trait JobSource: Send + Sync {
    fn scrape_jobs(&self) -> Result<Vec<Job>, LoadError>;

    /// Jobs posted strictly after `since`.
    fn scrape_jobs_since(&self, since: DateTime<Utc>) -> Result<Vec<Job>, LoadError> {
        let jobs = self.scrape_jobs()?;
        Ok(jobs.into_iter().filter(|job| job.posted_at > since).collect())
    }
}

/// Supplier of the one resume matched in a pass.
pub trait ResumeSource: Send + Sync {
    fn load_resume(&self) -> Result<Resume, LoadError>;
}

/// Failure to produce well-formed input; aborts the pass before matching.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("job data in {} is not an array", path.display())]
    NotAnArray { path: PathBuf },
    #[error("invalid job CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
    #[error("job {id} in {}: {reason}", path.display())]
    InvalidJob {
        path: PathBuf,
        id: String,
        reason: String,
    },
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Reads a JSON array of jobs from disk on every call.
#[derive(Debug, Clone)]
pub struct JsonFileJobSource {
    path: PathBuf,
}

impl JsonFileJobSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl JobSource for JsonFileJobSource {
    fn scrape_jobs(&self) -> Result<Vec<Job>, LoadError> {
        info!(path = %self.path.display(), "loading jobs");

        let contents = read_file(&self.path)?;
        let value: serde_json::Value =
            serde_json::from_str(&contents).map_err(|source| LoadError::Json {
                path: self.path.clone(),
                source,
            })?;
        if !value.is_array() {
            return Err(LoadError::NotAnArray {
                path: self.path.clone(),
            });
        }

        let jobs: Vec<Job> = serde_json::from_value(value).map_err(|source| LoadError::Json {
            path: self.path.clone(),
            source,
        })?;
        for job in &jobs {
            check_years_required(job.years_experience_required).map_err(|reason| {
                LoadError::InvalidJob {
                    path: self.path.clone(),
                    id: job.id.0.clone(),
                    reason,
                }
            })?;
        }

        info!(count = jobs.len(), "loaded job postings");
        Ok(jobs)
    }
}

/// Reads a CSV export of jobs. Skill cells hold `;`-separated lists.
#[derive(Debug, Clone)]
pub struct CsvJobSource {
    path: PathBuf,
}

impl CsvJobSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse<R: Read>(reader: R) -> Result<Vec<Job>, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut jobs = Vec::new();

        for (index, record) in csv_reader.deserialize::<JobRow>().enumerate() {
            let row = record?;
            // Header is row 1.
            jobs.push(row.into_job(index + 2)?);
        }

        Ok(jobs)
    }
}

impl JobSource for CsvJobSource {
    fn scrape_jobs(&self) -> Result<Vec<Job>, LoadError> {
        info!(path = %self.path.display(), "loading jobs from CSV export");

        let file = fs::File::open(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        let jobs = Self::parse(file)?;

        info!(count = jobs.len(), "loaded job postings");
        Ok(jobs)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobRow {
    id: String,
    title: String,
    company: String,
    posted_at: String,
    years_experience_required: f64,
    #[serde(default, deserialize_with = "skill_list")]
    required_skills: Vec<String>,
    #[serde(default, deserialize_with = "skill_list")]
    preferred_skills: Vec<String>,
    #[serde(default)]
    location: String,
    #[serde(default)]
    salary: String,
}

impl JobRow {
    fn into_job(self, row: usize) -> Result<Job, LoadError> {
        let posted_at = parse_timestamp(&self.posted_at).ok_or_else(|| LoadError::InvalidRecord {
            row,
            reason: format!("unrecognised postedAt '{}'", self.posted_at),
        })?;
        check_years_required(self.years_experience_required)
            .map_err(|reason| LoadError::InvalidRecord { row, reason })?;

        Ok(Job {
            id: JobId(self.id),
            title: self.title,
            company: self.company,
            posted_at,
            years_experience_required: self.years_experience_required,
            required_skills: self.required_skills,
            preferred_skills: self.preferred_skills,
            location: self.location,
            salary: self.salary,
        })
    }
}

fn check_years_required(years: f64) -> Result<(), String> {
    if years >= 0.0 {
        Ok(())
    } else {
        Err(format!(
            "yearsExperienceRequired must not be negative (got {years})"
        ))
    }
}

fn skill_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .split(';')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect())
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Reads a single resume document from disk.
#[derive(Debug, Clone)]
pub struct JsonFileResumeSource {
    path: PathBuf,
}

impl JsonFileResumeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResumeSource for JsonFileResumeSource {
    fn load_resume(&self) -> Result<Resume, LoadError> {
        let contents = read_file(&self.path)?;
        let resume: Resume = serde_json::from_str(&contents).map_err(|source| LoadError::Json {
            path: self.path.clone(),
            source,
        })?;

        debug!(user_id = %resume.user_id, "loaded resume");
        Ok(resume)
    }
}

/// Jobs already in memory, e.g. from a request body.
#[derive(Debug, Clone, Default)]
pub struct StaticJobSource {
    jobs: Vec<Job>,
}

impl StaticJobSource {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self { jobs }
    }
}

impl JobSource for StaticJobSource {
    fn scrape_jobs(&self) -> Result<Vec<Job>, LoadError> {
        Ok(self.jobs.clone())
    }
}

#[derive(Debug, Clone)]
pub struct StaticResumeSource {
    resume: Resume,
}

impl StaticResumeSource {
    pub fn new(resume: Resume) -> Self {
        Self { resume }
    }
}

impl ResumeSource for StaticResumeSource {
    fn load_resume(&self) -> Result<Resume, LoadError> {
        Ok(self.resume.clone())
    }
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
