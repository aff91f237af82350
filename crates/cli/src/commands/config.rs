use tradespend_core::config::{EngineConfig, LogFormat};

/// Render the effective configuration, one line per key, with the override
/// precedence spelled out for operators.
pub fn run(config: &EngineConfig) -> String {
    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line("scoring.volume_lift", &config.scoring.volume_lift.to_string()));
    lines.push(render_line("scoring.roi", &config.scoring.roi.to_string()));
    lines.push(render_line("scoring.sustainability", &config.scoring.sustainability.to_string()));
    lines.push(render_line("scoring.efficiency", &config.scoring.efficiency.to_string()));

    lines.push(render_line("reserves.contingency_pct", &config.reserves.contingency_pct.to_string()));
    lines.push(render_line("reserves.opportunity_pct", &config.reserves.opportunity_pct.to_string()));
    lines.push(render_line("reserves.adjustment_pct", &config.reserves.adjustment_pct.to_string()));

    lines.push(render_line("mining.min_results", &config.mining.min_results.to_string()));
    lines.push(render_line(
        "mining.min_pattern_frequency",
        &config.mining.min_pattern_frequency.to_string(),
    ));

    lines.push(render_line("logging.level", &config.logging.level));
    let format = match config.logging.format {
        LogFormat::Compact => "compact",
        LogFormat::Pretty => "pretty",
        LogFormat::Json => "json",
    };
    lines.push(render_line("logging.format", format));

    lines.join("\n")
}

fn render_line(key: &str, value: &str) -> String {
    format!("  {key} = {value}")
}
