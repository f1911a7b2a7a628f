pub mod analyze;
pub mod doctor;
pub mod generate;
pub mod schema;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "skill-forge",
    version,
    about = "AI-generated job-role training assessments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate learning content, a quiz, and the scenario tree for a job
    Generate {
        /// Job document id to generate for
        #[arg(long)]
        job_id: String,

        /// Prompt template id for the details stage (overrides config)
        #[arg(long)]
        prompt_id: Option<String>,

        /// Difficulty level of the assessment
        #[arg(long, default_value = "0")]
        level: u32,
    },

    /// Analyze submitted answers into a skill-gap report
    Analyze {
        /// JSON file with submitted answers
        #[arg(long)]
        file: String,

        /// Language for the generated feedback
        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Print the JSON Schema for a generation output type
    Schema {
        /// Schema name: details, quiz, scenario, analysis
        name: String,
    },

    /// Run diagnostic checks on the skill-forge setup
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
