use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunConfig {
    #[serde(default)]
    pub name: String,

    /// Ordered task list. Duplicates are allowed; each entry is fetched once.
    #[validate(length(min = 1), custom = "validate_urls")]
    pub urls: Vec<String>,

    #[serde(default = "default_workers")]
    #[validate(range(min = 1))]
    pub workers: usize,

    #[serde(default = "default_adaptive")]
    pub adaptive: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,

    /// Rolling-average latency above which the throttle steps up, seconds.
    /// Must be finite and non-negative.
    #[serde(default = "default_max_latency_secs")]
    #[validate(custom = "validate_max_latency")]
    pub max_latency_secs: f64,

    /// Cumulative failure count above which the throttle steps up.
    #[serde(default = "default_max_failures")]
    pub max_failures: u64,

    #[serde(default)]
    pub output: Option<OutputConfig>,
}

impl RunConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn max_latency(&self) -> Duration {
        Duration::from_secs_f64(self.max_latency_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputConfig {
    Console,
    Json {
        path: String,
    },
    Csv {
        path: String,
    },
    Sqlite {
        path: String,
        #[serde(default = "default_table_name")]
        table: String,
    },
}

fn validate_max_latency(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_max_latency"))
    }
}

fn validate_urls(urls: &Vec<String>) -> Result<(), ValidationError> {
    for raw in urls {
        if url::Url::parse(raw).is_err() {
            return Err(ValidationError::new("invalid_url"));
        }
    }
    Ok(())
}

fn default_workers() -> usize {
    10
}

fn default_adaptive() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_snippet_chars() -> usize {
    200
}

fn default_max_latency_secs() -> f64 {
    2.0
}

fn default_max_failures() -> u64 {
    3
}

pub(crate) fn default_table_name() -> String {
    "fetch_results".to_string()
}
