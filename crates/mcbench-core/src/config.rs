use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{BenchError, Result};

/// Logging verbosity, parsed from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("invalid log level: {other}")),
        }
    }
}

/// Full configuration for one benchmark run, validated once at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub model_name: String,
    pub benchmark_path: PathBuf,
    pub log_level: LogLevel,
    pub silence_http: bool,
    pub num_responses: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub max_retries: u32,
    pub ollama_host: String,
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.model_name.trim().is_empty() {
            return Err(BenchError::InvalidConfiguration(
                "model name must not be empty".to_string(),
            ));
        }
        if self.ollama_host.trim().is_empty() {
            return Err(BenchError::InvalidConfiguration(
                "ollama host must not be empty".to_string(),
            ));
        }
        if self.num_responses == 0 {
            return Err(BenchError::InvalidConfiguration(
                "num_responses must be at least 1".to_string(),
            ));
        }
        if self.temperature < 0.0 {
            return Err(BenchError::InvalidConfiguration(format!(
                "temperature must be >= 0.0, got {}",
                self.temperature
            )));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(BenchError::InvalidConfiguration(format!(
                "top_p must be in (0.0, 1.0], got {}",
                self.top_p
            )));
        }
        if self.max_tokens == 0 {
            return Err(BenchError::InvalidConfiguration(
                "max_tokens must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model_name: "llama3.1".to_string(),
            benchmark_path: PathBuf::from("benchmarks/simple_bench_public.json"),
            log_level: LogLevel::Debug,
            silence_http: true,
            num_responses: 5,
            temperature: 0.7,
            top_p: 0.95,
            max_tokens: 2048,
            max_retries: 3,
            ollama_host: "http://localhost:11434".to_string(),
        }
    }
}
