use crate::config;
use crate::doctor::{run_doctor, DoctorStatus};
use crate::error::Result;
use crate::store::{DataApiStore, DocumentStore};

/// Run `skill-forge doctor`.
pub fn run(json: bool) -> Result<()> {
    let config = config::load_config()?;

    // A misconfigured store is a finding, not a reason to bail out.
    let store = DataApiStore::from_config(&config.store).ok();
    let store_ref = store.as_ref().map(|s| s as &dyn DocumentStore);

    let report = run_doctor(&config, store_ref);

    if json {
        let output = serde_json::to_string_pretty(&report).map_err(|e| {
            crate::error::ForgeError::Json {
                source: e,
                location: snafu::Location::default(),
            }
        })?;
        println!("{output}");
    } else {
        println!("skill-forge doctor");
        for check in &report.checks {
            let icon = match check.status {
                DoctorStatus::Pass => "pass",
                DoctorStatus::Warn => "warn",
                DoctorStatus::Fail => "FAIL",
            };
            println!("  [{icon}] {}: {}", check.name, check.message);
            if let Some(ref hint) = check.fix_hint {
                println!("         {hint}");
            }
        }
        println!();
        let overall = match report.overall {
            DoctorStatus::Pass => "all checks passed",
            DoctorStatus::Warn => "some warnings",
            DoctorStatus::Fail => "some checks failed",
        };
        println!("Overall: {overall}");
    }

    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
