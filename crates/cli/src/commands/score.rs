use std::path::Path;

use tradespend_core::config::EngineConfig;
use tradespend_core::domain::combination::CombinationInput;
use tradespend_core::scoring::SuccessScorer;

use crate::commands::{load_snapshot, CommandResult};

pub fn run(config: &EngineConfig, combinations_path: &Path) -> CommandResult {
    let inputs: Vec<CombinationInput> = match load_snapshot("score", combinations_path) {
        Ok(inputs) => inputs,
        Err(failure) => return failure,
    };

    let scorer = SuccessScorer::new(config.scoring);
    let results: Vec<_> = inputs.iter().map(|input| scorer.evaluate(input)).collect();

    tracing::info!(combinations = results.len(), "combinations scored and classified");
    CommandResult::success("score", "combinations scored and classified", results)
}
