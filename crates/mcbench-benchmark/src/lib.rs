pub mod loader;
pub mod ollama;
pub mod runner;

pub use loader::load_question_set;
pub use ollama::{GenerationOutcome, OllamaClient};
pub use runner::run_benchmark;
