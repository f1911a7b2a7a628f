use snafu::ResultExt;

use crate::analysis::{self, SubmittedAnswer};
use crate::config;
use crate::error::forge_error::{GenerationSnafu, IoSnafu, JsonSnafu};
use crate::error::Result;
use crate::provider;

/// Run `skill-forge analyze`.
pub fn run(file: String, lang: String) -> Result<()> {
    let contents = std::fs::read_to_string(&file).context(IoSnafu)?;
    let answers: Vec<SubmittedAnswer> = serde_json::from_str(&contents).context(JsonSnafu)?;

    let config = config::load_config()?;
    let provider = provider::discover_provider(&config).context(GenerationSnafu)?;

    let report = analysis::analyze_answers(provider.as_ref(), &answers, &lang)?;

    for finding in &report.feedback {
        println!(
            "[{}] {}: {} gap",
            finding.priority, finding.title, finding.gap
        );
        println!("    {}", finding.ai_analysis);
    }
    Ok(())
}
