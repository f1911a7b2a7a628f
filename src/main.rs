use clap::Parser;
use skillforge::cli::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            job_id,
            prompt_id,
            level,
        } => skillforge::cli::generate::run(job_id, prompt_id, level),
        Commands::Analyze { file, lang } => skillforge::cli::analyze::run(file, lang),
        Commands::Schema { name } => skillforge::cli::schema::run(&name),
        Commands::Doctor { json } => skillforge::cli::doctor::run(json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
