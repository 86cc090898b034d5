use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Mutex;

use crate::matching::{Match, MatchBand, Resume};

/// Delivery channel for a pass's matches. Called even when nothing matched.
pub trait Notifier: Send + Sync {
    fn notify(&self, matches: &[Match], resume: &Resume) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to write notification: {0}")]
    Io(#[from] io::Error),
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Writes a plain-text digest to any writer; stdout for the CLI.
pub struct ConsoleNotifier<W> {
    out: Mutex<W>,
}

impl ConsoleNotifier<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> Notifier for ConsoleNotifier<W> {
    fn notify(&self, matches: &[Match], resume: &Resume) -> Result<(), NotifyError> {
        let digest = render_digest(matches, resume);
        let mut out = self
            .out
            .lock()
            .map_err(|_| NotifyError::Transport("console writer poisoned".to_string()))?;
        out.write_all(digest.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

const RULE: &str =
    "================================================================================";

/// Formats the matches for a human reader.
pub fn render_digest(matches: &[Match], resume: &Resume) -> String {
    let mut content = String::new();

    let _ = writeln!(content, "{RULE}");
    let _ = writeln!(
        content,
        "Job matches for {} <{}>",
        resume.profile.name, resume.profile.email
    );
    let _ = writeln!(content, "{RULE}");

    if matches.is_empty() {
        let _ = writeln!(content, "No new job matches found this time.");
        return content;
    }

    let noun = if matches.len() == 1 { "job" } else { "jobs" };
    let _ = writeln!(content, "Found {} matching {noun}:", matches.len());

    for (position, item) in matches.iter().enumerate() {
        let job = &item.job;
        let score = &item.score;
        content.push('\n');
        let _ = writeln!(
            content,
            "{}. {} at {} ({})",
            position + 1,
            job.title,
            job.company,
            MatchBand::from_total(score.total)
        );
        let _ = writeln!(content, "   Location: {} | Salary: {}", job.location, job.salary);
        let _ = writeln!(
            content,
            "   Score: {:.1}/100 (required {:.1}, preferred {:.1}, experience {:.1})",
            score.total,
            score.required_skills_score,
            score.preferred_skills_score,
            score.experience_score
        );
        if !item.matching_required_skills.is_empty() {
            let _ = writeln!(
                content,
                "   Required skills: {}",
                item.matching_required_skills.join(", ")
            );
        }
        if !item.matching_preferred_skills.is_empty() {
            let _ = writeln!(
                content,
                "   Preferred skills: {}",
                item.matching_preferred_skills.join(", ")
            );
        }
        let _ = writeln!(content, "   Why: {}", item.reason);
        let _ = writeln!(content, "   Posted: {}", job.posted_at.format("%Y-%m-%d"));
    }

    content
}
