use serde::{Deserialize, Serialize};

use crate::extract::ExtractedAnswer;
use crate::question::BenchmarkItem;

/// One sampled response for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub raw_text: String,
    pub extracted_token: Option<String>,
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

/// All sampled responses for one question, plus the per-item majority vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub question_id: u32,
    pub prompt: String,
    pub expected: String,
    pub responses: Vec<ResponseRecord>,
    pub majority_correct: bool,
}

/// Final result of a run. Created once, after every item has been processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub model_name: String,
    pub total_items: u32,
    pub total_responses: u32,
    pub correct_count: u32,
    pub score_percentage: f64,
    pub items_passed_majority: u32,
    pub per_item: Vec<ItemOutcome>,
}

#[derive(Debug, Clone)]
struct ItemProgress {
    question_id: u32,
    prompt: String,
    expected: String,
    responses: Vec<ResponseRecord>,
}

impl ItemProgress {
    fn is_for(&self, item: &BenchmarkItem) -> bool {
        self.question_id == item.question_id
            && self.prompt == item.prompt
            && self.expected == item.answer
    }
}

/// Accumulates response outcomes across a run and assembles the report.
/// Owned exclusively by the orchestrator for the run's duration.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    model_name: String,
    items: Vec<ItemProgress>,
}

impl Scoreboard {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            items: Vec::new(),
        }
    }

    /// Records one response outcome for `item`, returning whether it scored
    /// correct. Correctness is a case-insensitive exact match of the
    /// normalized token against the expected answer; an unparseable
    /// extraction always scores incorrect. Consecutive calls for the same
    /// item accumulate into one outcome; any other item starts a new one,
    /// so two questions that happen to share an id stay separate.
    pub fn record(
        &mut self,
        item: &BenchmarkItem,
        raw_text: String,
        extraction: ExtractedAnswer,
        error_detail: Option<String>,
    ) -> bool {
        let is_correct = extraction
            .token
            .as_deref()
            .is_some_and(|token| token.trim().eq_ignore_ascii_case(item.answer.trim()));

        let progress = match self.items.last_mut() {
            Some(last) if last.is_for(item) => last,
            _ => {
                self.items.push(ItemProgress {
                    question_id: item.question_id,
                    prompt: item.prompt.clone(),
                    expected: item.answer.clone(),
                    responses: Vec::new(),
                });
                self.items.last_mut().unwrap()
            }
        };

        progress.responses.push(ResponseRecord {
            raw_text,
            extracted_token: extraction.token,
            is_correct,
            error_detail,
        });

        is_correct
    }

    /// Assembles the final report. Pure computation over accumulated state,
    /// so calling it twice without further `record` calls yields identical
    /// reports.
    pub fn finalize(&self) -> RunReport {
        let per_item: Vec<ItemOutcome> = self
            .items
            .iter()
            .map(|item| ItemOutcome {
                question_id: item.question_id,
                prompt: item.prompt.clone(),
                expected: item.expected.clone(),
                majority_correct: majority_correct(&item.responses, &item.expected),
                responses: item.responses.clone(),
            })
            .collect();

        let total_responses: u32 = per_item.iter().map(|i| i.responses.len() as u32).sum();
        let correct_count: u32 = per_item
            .iter()
            .flat_map(|i| &i.responses)
            .filter(|r| r.is_correct)
            .count() as u32;
        let items_passed_majority = per_item.iter().filter(|i| i.majority_correct).count() as u32;

        let score_percentage = if total_responses == 0 {
            0.0
        } else {
            100.0 * f64::from(correct_count) / f64::from(total_responses)
        };

        RunReport {
            model_name: self.model_name.clone(),
            total_items: per_item.len() as u32,
            total_responses,
            correct_count,
            score_percentage,
            items_passed_majority,
            per_item,
        }
    }
}

/// An item passes the majority vote when the expected answer holds a strict
/// majority of the successfully parsed tokens. No parsed tokens means fail.
fn majority_correct(responses: &[ResponseRecord], expected: &str) -> bool {
    let parsed: Vec<&str> = responses
        .iter()
        .filter_map(|r| r.extracted_token.as_deref())
        .collect();

    if parsed.is_empty() {
        return false;
    }

    let matching = parsed
        .iter()
        .filter(|t| t.trim().eq_ignore_ascii_case(expected.trim()))
        .count();

    matching * 2 > parsed.len()
}
