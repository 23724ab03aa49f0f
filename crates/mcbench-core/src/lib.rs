// Domain modules
pub mod config;
pub mod error;
pub mod extract;
pub mod question;
pub mod report;

pub use config::{LogLevel, RunConfig};
pub use error::{BenchError, Result};
pub use extract::{extract, ExtractedAnswer};
pub use question::{BenchmarkItem, QuestionSet};
pub use report::{ItemOutcome, ResponseRecord, RunReport, Scoreboard};
