//! Providers command - prints the fallback chain with key availability

use crate::config::AppConfig;
use crate::domain::EnvSnapshot;
use crate::infrastructure::gateway::ProviderStatus;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (config, load_error) = AppConfig::load_or_default();
    if let Some(e) = load_error {
        eprintln!("warning: invalid configuration, falling back to defaults: {}", e);
    }

    let state = crate::create_app_state_with_config(&config, EnvSnapshot::from_process())?;

    let status = state.gateway.provider_status().await;
    print!("{}", render_table(&status));

    Ok(())
}

fn render_table(status: &[ProviderStatus]) -> String {
    let mut out = format!("{:<10} {:<12} {}\n", "PRIORITY", "PROVIDER", "API KEY");

    for entry in status {
        out.push_str(&format!(
            "{:<10} {:<12} {}\n",
            entry.priority,
            entry.provider.as_str(),
            if entry.has_key { "configured" } else { "missing" }
        ));
    }

    if status.iter().all(|s| !s.has_key) {
        out.push_str("\nNo provider has an API key; every AI request will fail.\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProviderId;

    #[test]
    fn test_render_table() {
        let table = render_table(&[
            ProviderStatus {
                provider: ProviderId::GoogleAi,
                priority: 1,
                has_key: false,
            },
            ProviderStatus {
                provider: ProviderId::Groq,
                priority: 2,
                has_key: true,
            },
        ]);

        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("PRIORITY"));
        assert!(lines[1].contains("google_ai") && lines[1].ends_with("missing"));
        assert!(lines[2].contains("groq") && lines[2].ends_with("configured"));
        assert!(!table.contains("No provider"));
    }

    #[test]
    fn test_render_table_warns_without_keys() {
        let table = render_table(&[ProviderStatus {
            provider: ProviderId::OpenAi,
            priority: 1,
            has_key: false,
        }]);

        assert!(table.contains("No provider has an API key"));
    }
}
