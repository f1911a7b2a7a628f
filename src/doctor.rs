use serde::{Deserialize, Serialize};

use crate::config::{ForgeConfig, ProviderType};
use crate::prompt;
use crate::store::{collection, DocumentStore};

/// Status of a single doctor check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoctorStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single doctor check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorCheck {
    pub name: String,
    pub status: DoctorStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<String>,
}

/// Full doctor report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorReport {
    pub version: String,
    pub checks: Vec<DoctorCheck>,
    pub overall: DoctorStatus,
}

impl DoctorReport {
    pub fn has_failures(&self) -> bool {
        self.overall == DoctorStatus::Fail
    }
}

/// Run all doctor checks and produce a report. `store` is absent when the
/// store endpoint itself could not be configured; the config checks still
/// run and explain why.
pub fn run_doctor(config: &ForgeConfig, store: Option<&dyn DocumentStore>) -> DoctorReport {
    let mut checks = Vec::new();

    checks.push(check_version());
    checks.push(check_credentials(config));
    checks.push(check_store_config(config));
    if let Some(store) = store {
        checks.push(check_store_reachable(store));
        checks.push(check_templates(config, store));
    }

    let overall = if checks.iter().any(|c| c.status == DoctorStatus::Fail) {
        DoctorStatus::Fail
    } else if checks.iter().any(|c| c.status == DoctorStatus::Warn) {
        DoctorStatus::Warn
    } else {
        DoctorStatus::Pass
    };

    DoctorReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
        overall,
    }
}

/// Check: report binary version (always passes).
fn check_version() -> DoctorCheck {
    DoctorCheck {
        name: "version".to_string(),
        status: DoctorStatus::Pass,
        message: format!("skill-forge {}", env!("CARGO_PKG_VERSION")),
        fix_hint: None,
    }
}

/// Check: provider API credentials available.
fn check_credentials(config: &ForgeConfig) -> DoctorCheck {
    let configured_env = match config.provider.provider_type {
        ProviderType::OpenAi => Some(
            config
                .provider
                .api_key_env
                .clone()
                .unwrap_or_else(|| "OPENAI_API_KEY".to_string()),
        ),
        ProviderType::Anthropic => Some(
            config
                .provider
                .api_key_env
                .clone()
                .unwrap_or_else(|| "ANTHROPIC_API_KEY".to_string()),
        ),
        ProviderType::None => None,
    };

    let candidates: Vec<String> = match configured_env {
        Some(env) => vec![env],
        None => vec!["OPENAI_API_KEY".to_string(), "ANTHROPIC_API_KEY".to_string()],
    };

    for env in &candidates {
        if std::env::var(env).map(|v| !v.is_empty()).unwrap_or(false) {
            return DoctorCheck {
                name: "credentials".to_string(),
                status: DoctorStatus::Pass,
                message: format!("{env} found"),
                fix_hint: None,
            };
        }
    }

    DoctorCheck {
        name: "credentials".to_string(),
        status: DoctorStatus::Fail,
        message: format!("none of {} set", candidates.join(", ")),
        fix_hint: Some("Set a provider API key environment variable.".to_string()),
    }
}

/// Check: store endpoint configured.
fn check_store_config(config: &ForgeConfig) -> DoctorCheck {
    if config.store.base_url.is_empty() {
        return DoctorCheck {
            name: "store_config".to_string(),
            status: DoctorStatus::Fail,
            message: "store.base_url is not configured".to_string(),
            fix_hint: Some(
                "Set store.base_url in ~/.skill-forge.toml or SKILLFORGE_STORE_URL.".to_string(),
            ),
        };
    }
    if config.store.api_key().is_none() {
        return DoctorCheck {
            name: "store_config".to_string(),
            status: DoctorStatus::Fail,
            message: "store API key not set".to_string(),
            fix_hint: Some("Set SKILLFORGE_STORE_KEY (or the configured env var).".to_string()),
        };
    }
    DoctorCheck {
        name: "store_config".to_string(),
        status: DoctorStatus::Pass,
        message: format!("{} / {}", config.store.base_url, config.store.database),
        fix_hint: None,
    }
}

/// Check: store answers a trivial query.
fn check_store_reachable(store: &dyn DocumentStore) -> DoctorCheck {
    match store.find_one(collection::PROMPT, &serde_json::json!({})) {
        Ok(_) => DoctorCheck {
            name: "store".to_string(),
            status: DoctorStatus::Pass,
            message: "store reachable".to_string(),
            fix_hint: None,
        },
        Err(e) => DoctorCheck {
            name: "store".to_string(),
            status: DoctorStatus::Fail,
            message: format!("store query failed: {e}"),
            fix_hint: Some("Check the store endpoint, credentials, and network.".to_string()),
        },
    }
}

/// Check: the four pipeline templates are configured and resolvable.
fn check_templates(config: &ForgeConfig, store: &dyn DocumentStore) -> DoctorCheck {
    let named = [
        ("details", &config.templates.details),
        ("assessment", &config.templates.assessment),
        ("scenario_base", &config.templates.scenario_base),
        ("follow_up", &config.templates.follow_up),
    ];

    let mut problems = Vec::new();
    for (name, id) in named {
        if id.is_empty() {
            problems.push(format!("{name}: not configured"));
            continue;
        }
        if let Err(e) = prompt::load_template(store, id) {
            problems.push(format!("{name}: {e}"));
        }
    }

    if problems.is_empty() {
        DoctorCheck {
            name: "templates".to_string(),
            status: DoctorStatus::Pass,
            message: "all four prompt templates resolve".to_string(),
            fix_hint: None,
        }
    } else {
        DoctorCheck {
            name: "templates".to_string(),
            status: DoctorStatus::Warn,
            message: problems.join("; "),
            fix_hint: Some(
                "Seed the prompt collection and set template ids in ~/.skill-forge.toml."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemplateIds;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn config_with_templates() -> ForgeConfig {
        ForgeConfig {
            templates: TemplateIds {
                details: "tpl-d".to_string(),
                assessment: "tpl-a".to_string(),
                scenario_base: "tpl-s".to_string(),
                follow_up: "tpl-f".to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_templates_check_passes_when_seeded() {
        let store = MemoryStore::new();
        for id in ["tpl-d", "tpl-a", "tpl-s", "tpl-f"] {
            store.seed(collection::PROMPT, json!({"_id": id, "system": "s"}));
        }
        let check = check_templates(&config_with_templates(), &store);
        assert_eq!(check.status, DoctorStatus::Pass);
    }

    #[test]
    fn test_templates_check_reports_missing() {
        let store = MemoryStore::new();
        store.seed(collection::PROMPT, json!({"_id": "tpl-d", "system": "s"}));
        let check = check_templates(&config_with_templates(), &store);
        assert_eq!(check.status, DoctorStatus::Warn);
        assert!(check.message.contains("scenario_base"));
    }

    #[test]
    fn test_store_config_check_requires_url() {
        let check = check_store_config(&ForgeConfig::default());
        assert_eq!(check.status, DoctorStatus::Fail);
    }

    #[test]
    fn test_overall_rolls_up_worst_status() {
        let store = MemoryStore::new();
        let report = run_doctor(&ForgeConfig::default(), Some(&store as &dyn DocumentStore));
        assert_eq!(report.overall, DoctorStatus::Fail);
        assert!(report.has_failures());
    }
}
