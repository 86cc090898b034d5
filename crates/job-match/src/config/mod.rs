use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::matching::MatchingConfig;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub matching: MatchingConfig,
    pub data: DataConfig,
    pub schedule: ScheduleConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = MatchingConfig::default();
        let matching = MatchingConfig {
            threshold: number_var("MATCH_THRESHOLD", defaults.threshold)?,
            required_skills_weight: number_var(
                "REQUIRED_SKILLS_WEIGHT",
                defaults.required_skills_weight,
            )?,
            preferred_skills_weight: number_var(
                "PREFERRED_SKILLS_WEIGHT",
                defaults.preferred_skills_weight,
            )?,
            experience_weight: number_var("EXPERIENCE_WEIGHT", defaults.experience_weight)?,
            experience_buffer_years: number_var(
                "EXPERIENCE_BUFFER_YEARS",
                defaults.experience_buffer_years,
            )?,
        };
        validate_matching(&matching)?;

        let data = DataConfig {
            jobs_path: env::var("JOBS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_JOBS_PATH)),
            resume_path: env::var("RESUME_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_RESUME_PATH)),
        };

        let interval_secs = env::var("JOB_CHECK_INTERVAL_SECS")
            .unwrap_or_else(|_| "120".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidInterval)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            matching,
            data,
            schedule: ScheduleConfig {
                interval: Duration::from_secs(interval_secs),
            },
        })
    }

    /// Non-fatal findings the caller should log once telemetry is running.
    pub fn warnings(&self) -> Vec<ConfigWarning> {
        let total = self.matching.weight_total();
        if (total - 100.0).abs() > f64::EPSILON {
            vec![ConfigWarning::UnbalancedWeights { total }]
        } else {
            Vec::new()
        }
    }
}

pub const DEFAULT_JOBS_PATH: &str = "./data/job-postings.json";
pub const DEFAULT_RESUME_PATH: &str = "./data/user-profile.json";

fn number_var(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or(ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

fn validate_matching(config: &MatchingConfig) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&config.threshold) {
        return Err(ConfigError::ThresholdOutOfRange(config.threshold));
    }

    let non_negative = [
        ("REQUIRED_SKILLS_WEIGHT", config.required_skills_weight),
        ("PREFERRED_SKILLS_WEIGHT", config.preferred_skills_weight),
        ("EXPERIENCE_WEIGHT", config.experience_weight),
        ("EXPERIENCE_BUFFER_YEARS", config.experience_buffer_years),
    ];
    for (key, value) in non_negative {
        if value < 0.0 {
            return Err(ConfigError::Negative { key, value });
        }
    }

    Ok(())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Locations of the job and resume files fed to the job-check pipeline.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub jobs_path: PathBuf,
    pub resume_path: PathBuf,
}

/// Cadence for scheduled job checks.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub interval: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    ThresholdOutOfRange(f64),
    Negative { key: &'static str, value: f64 },
    InvalidInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a number (got '{value}')")
            }
            ConfigError::ThresholdOutOfRange(value) => {
                write!(f, "MATCH_THRESHOLD must be within 0-100 (got {value})")
            }
            ConfigError::Negative { key, value } => {
                write!(f, "{key} must not be negative (got {value})")
            }
            ConfigError::InvalidInterval => {
                write!(f, "JOB_CHECK_INTERVAL_SECS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

/// Configuration conditions worth surfacing without refusing to start.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    UnbalancedWeights { total: f64 },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::UnbalancedWeights { total } => write!(
                f,
                "scoring weights add up to {total} instead of 100; totals will not span 0-100"
            ),
        }
    }
}
