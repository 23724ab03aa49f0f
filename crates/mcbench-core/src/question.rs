use serde::{Deserialize, Serialize};

/// One benchmark question with its correct answer. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkItem {
    #[serde(default)]
    pub question_id: u32,
    pub prompt: String,
    pub answer: String,
}

/// On-disk shape of a benchmark file: a list of question records under
/// an `eval_data` key. Records may carry extra metadata fields; they are
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    pub eval_data: Vec<BenchmarkItem>,
}

impl QuestionSet {
    /// Items in file order, with ordinal ids assigned to records that
    /// did not carry a `question_id` of their own.
    pub fn into_items(self) -> Vec<BenchmarkItem> {
        self.eval_data
            .into_iter()
            .enumerate()
            .map(|(idx, mut item)| {
                if item.question_id == 0 {
                    item.question_id = idx as u32 + 1;
                }
                item
            })
            .collect()
    }
}
