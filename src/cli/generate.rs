use snafu::ResultExt;

use crate::config;
use crate::details;
use crate::error::forge_error::GenerationSnafu;
use crate::error::Result;
use crate::provider;
use crate::store::{DataApiStore, DocumentId};

/// Run `skill-forge generate`.
pub fn run(job_id: String, prompt_id: Option<String>, level: u32) -> Result<()> {
    let config = config::load_config()?;
    let provider = provider::discover_provider(&config).context(GenerationSnafu)?;
    let store = DataApiStore::from_config(&config.store)?;

    let mut templates = config.templates.clone();
    if let Some(id) = prompt_id {
        templates.details = id;
    }

    tracing::info!(
        job = %job_id,
        level,
        provider = provider.name(),
        model = provider.model(),
        "starting generation pipeline"
    );

    let outcome = details::run_pipeline(
        &store,
        provider.as_ref(),
        &templates,
        &DocumentId(job_id),
        level,
    )?;

    println!("job details: {}", outcome.job_details_id);
    println!("assessment:  {}", outcome.assessment_id);
    Ok(())
}
