use schemars::schema_for;

use crate::error::Result;

/// Run the `skill-forge schema <name>` subcommand.
///
/// Prints the JSON Schema for the requested generation output type to
/// stdout. This makes the CLI self-documenting: the printed schema is
/// exactly what generation is constrained to.
pub fn run(name: &str) -> Result<()> {
    let schema = match name {
        "details" => schema_for!(crate::schema::GeneratedDetails),
        "quiz" => schema_for!(crate::schema::AssessmentQuiz),
        "scenario" => schema_for!(crate::schema::ScenarioDraft),
        "analysis" => schema_for!(crate::schema::AnalysisReport),
        _ => {
            return Err(crate::error::ForgeError::Validation {
                message: format!(
                    "Unknown schema name: '{name}'. Available: details, quiz, scenario, analysis"
                ),
                location: snafu::Location::default(),
            });
        }
    };

    let json = serde_json::to_string_pretty(&schema).map_err(|e| {
        crate::error::ForgeError::Json {
            source: e,
            location: snafu::Location::default(),
        }
    })?;
    println!("{json}");

    Ok(())
}
