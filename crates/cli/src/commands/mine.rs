use std::path::Path;

use serde::Serialize;
use tradespend_core::config::EngineConfig;
use tradespend_core::domain::combination::CombinationInput;
use tradespend_core::domain::pattern::PatternAnalysis;
use tradespend_core::mining::{summary, PatternMiner};
use tradespend_core::scoring::SuccessScorer;

use crate::commands::{load_snapshot, CommandResult};

#[derive(Debug, Serialize)]
struct MineReport {
    summary: summary::AnalysisSummary,
    patterns: PatternAnalysis,
}

pub fn run(config: &EngineConfig, combinations_path: &Path) -> CommandResult {
    let inputs: Vec<CombinationInput> = match load_snapshot("mine", combinations_path) {
        Ok(inputs) => inputs,
        Err(failure) => return failure,
    };

    let scorer = SuccessScorer::new(config.scoring);
    let results: Vec<_> = inputs.iter().map(|input| scorer.evaluate(input)).collect();

    let miner = PatternMiner::new(config.mining, SuccessScorer::new(config.scoring));
    let patterns = miner.mine(&results);

    tracing::info!(
        combinations = results.len(),
        successful_patterns = patterns.successful_patterns.len(),
        optimal_combinations = patterns.optimal_combinations.len(),
        "pattern mining completed"
    );

    let report = MineReport { summary: summary::summarize(&results), patterns };
    CommandResult::success("mine", "combinations scored and patterns mined", report)
}
