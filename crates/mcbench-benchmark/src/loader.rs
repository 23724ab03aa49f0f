use std::path::Path;

use mcbench_core::{BenchError, BenchmarkItem, QuestionSet, Result};

/// Loads a benchmark question file into items in file order.
pub fn load_question_set(path: &Path) -> Result<Vec<BenchmarkItem>> {
    if !path.exists() {
        return Err(BenchError::BenchmarkFileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let set: QuestionSet = serde_json::from_str(&content)
        .map_err(|e| BenchError::MalformedBenchmarkFile(format!("{}: {e}", path.display())))?;

    Ok(set.into_items())
}
