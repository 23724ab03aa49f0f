use mcbench_core::{
    extract, BenchError, ExtractedAnswer, Result, RunConfig, RunReport, Scoreboard,
};
use tracing::{debug, info};

use crate::loader::load_question_set;
use crate::ollama::{GenerationOutcome, OllamaClient};

/// Drives one full benchmark run: validate, check the model is served, load
/// the question set, sample `num_responses` completions per question in
/// order, score each, and assemble the report. A single failed generation
/// is recorded as incorrect and the run continues; an unavailable model
/// aborts the run with no report.
pub async fn run_benchmark(config: &RunConfig) -> Result<RunReport> {
    config.validate()?;

    let client = OllamaClient::new(&config.ollama_host);

    let available = client.list_models().await?;
    if !model_is_available(&config.model_name, &available) {
        return Err(BenchError::ModelNotAvailable(config.model_name.clone()));
    }

    let items = load_question_set(&config.benchmark_path)?;
    info!(
        model = %config.model_name,
        questions = items.len(),
        num_responses = config.num_responses,
        "Starting benchmark"
    );

    let mut scoreboard = Scoreboard::new(&config.model_name);

    for item in &items {
        info!(question = item.question_id, "Testing question");
        debug!(question = item.question_id, prompt = %item.prompt);

        for response_index in 1..=config.num_responses {
            match client.generate(config, &item.prompt).await? {
                GenerationOutcome::Completed { text } => {
                    let extraction = extract(&text);
                    debug!(
                        question = item.question_id,
                        response = response_index,
                        "Response:\n{text}"
                    );
                    let correct = scoreboard.record(item, text, extraction, None);
                    info!(
                        question = item.question_id,
                        response = response_index,
                        expected = %item.answer,
                        correct,
                        "Scored response"
                    );
                }
                GenerationOutcome::Failed { error_detail } => {
                    info!(
                        question = item.question_id,
                        response = response_index,
                        error = %error_detail,
                        "Generation failed; scoring as incorrect"
                    );
                    scoreboard.record(
                        item,
                        String::new(),
                        ExtractedAnswer::none(),
                        Some(error_detail),
                    );
                }
            }
        }
    }

    let report = scoreboard.finalize();
    info!("Final Score: {:.1}%", report.score_percentage);
    Ok(report)
}

/// A requested model matches a served one exactly, or by base name when the
/// request omits the tag (`llama3.1` matches `llama3.1:latest`).
fn model_is_available(requested: &str, available: &[String]) -> bool {
    available.iter().any(|name| {
        name == requested
            || (!requested.contains(':') && name.split(':').next() == Some(requested))
    })
}
