use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use dialoguer::Confirm;
use media_acquire_config::{default_template, Config, ConfigHandle, ManagerConfig, PathManager};
use owo_colors::OwoColorize;
use serde_json::json;

use super::jobs::jobs_table;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    match cmd {
        ConfigCommands::Show { full } => show_config(&paths, full, output),
        ConfigCommands::Path => {
            match output.format() {
                OutputFormat::Human => println!("{}", paths.config_file().display()),
                OutputFormat::Json | OutputFormat::JsonPretty => {
                    output.json(&json!({ "config_file": paths.config_file() }))
                }
            }
            Ok(())
        }
        ConfigCommands::Validate => validate_config(&paths, output),
        ConfigCommands::Init { force } => init_config(&paths, force, output),
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s.starts_with("YOUR_") {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Copy of the config with API keys and webhook URLs masked
fn masked(config: &Config) -> Config {
    let mut config = config.clone();
    config.catalog.client_id = config.catalog.client_id.as_deref().map(mask_string);
    config.enrichment.omdb_api_key = config.enrichment.omdb_api_key.as_deref().map(mask_string);
    if let Some(broker) = config.acquisition.broker.as_mut() {
        broker.api_key = mask_string(&broker.api_key);
    }
    for manager in [config.acquisition.radarr.as_mut(), config.acquisition.sonarr.as_mut()]
        .into_iter()
        .flatten()
    {
        manager.api_key = mask_string(&manager.api_key);
    }
    if let Some(discord) = config.notifications.discord.as_mut() {
        discord.webhook_url = mask_string(&discord.webhook_url);
    }
    config
}

fn load(paths: &PathManager, output: &Output) -> Result<Option<Config>> {
    let handle = ConfigHandle::new(paths.config_file());
    if !handle.exists() {
        output.warn(format!(
            "Configuration file not found at: {}",
            handle.path().display()
        ));
        output.info("Run 'marquee config init' to create one.");
        return Ok(None);
    }
    handle.load().map(Some).map_err(|e| eyre!("{:#}", e))
}

fn show_config(paths: &PathManager, full: bool, output: &Output) -> Result<()> {
    let Some(config) = load(paths, output)? else {
        return Ok(());
    };
    let shown = if full { config } else { masked(&config) };

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            println!("{}", "Configuration".bright_cyan().bold());

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Value"),
            ]);
            let not_set = || "<not set>".to_string();
            let manager_summary = |m: &ManagerConfig| {
                format!(
                    "{} (key {}, profile {}, {})",
                    m.base_url, m.api_key, m.quality_profile_id, m.root_folder_path
                )
            };
            let rows = vec![
                ("Config file", paths.config_file().display().to_string()),
                (
                    "Trakt client id",
                    shown.catalog.client_id.clone().unwrap_or_else(not_set),
                ),
                ("Fetch limit", shown.catalog.fetch_limit.to_string()),
                (
                    "OMDb API key",
                    shown.enrichment.omdb_api_key.clone().unwrap_or_else(not_set),
                ),
                ("Acquisition mode", shown.acquisition.mode.to_string()),
                (
                    "Ombi",
                    shown
                        .acquisition
                        .broker
                        .as_ref()
                        .map(|b| format!("{} (key {})", b.base_url, b.api_key))
                        .unwrap_or_else(not_set),
                ),
                (
                    "Radarr",
                    shown
                        .acquisition
                        .radarr
                        .as_ref()
                        .map(manager_summary)
                        .unwrap_or_else(not_set),
                ),
                (
                    "Sonarr",
                    shown
                        .acquisition
                        .sonarr
                        .as_ref()
                        .map(manager_summary)
                        .unwrap_or_else(not_set),
                ),
                (
                    "Discord",
                    shown
                        .notifications
                        .discord
                        .as_ref()
                        .map(|d| {
                            if d.enabled {
                                d.webhook_url.clone()
                            } else {
                                "disabled".to_string()
                            }
                        })
                        .unwrap_or_else(not_set),
                ),
                (
                    "History file",
                    shown.history_file(paths.data_dir()).display().to_string(),
                ),
                ("Run on startup", shown.scheduler.run_on_startup.to_string()),
            ];
            for (label, value) in rows {
                table.add_row(vec![Cell::new(label), Cell::new(value)]);
            }
            output.table(table);

            let specs = shown.job_specs();
            if !specs.is_empty() {
                output.table(jobs_table(&specs));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&shown)?);
        }
    }
    Ok(())
}

fn validate_config(paths: &PathManager, output: &Output) -> Result<()> {
    let Some(config) = load(paths, output)? else {
        return Err(eyre!("Nothing to validate"));
    };
    config
        .validate()
        .map_err(|e| eyre!("Invalid configuration: {:#}", e))?;
    output.success(format!(
        "Configuration is valid ({} job(s) configured)",
        config.job_specs().len()
    ));
    Ok(())
}

fn init_config(paths: &PathManager, force: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        let overwrite = Confirm::new()
            .with_prompt(format!("{} already exists. Overwrite?", config_file.display()))
            .default(false)
            .interact()
            .map_err(|e| eyre!("Failed to read input: {}", e))?;
        if !overwrite {
            output.info("Left the existing configuration untouched.");
            return Ok(());
        }
    }

    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;
    std::fs::write(&config_file, default_template())
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;
    output.success(format!("Wrote {}", config_file.display()));
    output.info("Fill in the API keys, then check it with 'marquee config validate'.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_acquire_config::{BrokerConfig, DiscordConfig};

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("YOUR_CLIENT_ID"), "<not set>");
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("abcdef123"), "ab***23");
    }

    #[test]
    fn test_masked_hides_secrets() {
        let mut config = Config::default();
        config.catalog.client_id = Some("client-123456".to_string());
        config.acquisition.broker = Some(BrokerConfig {
            base_url: "http://ombi:5000".to_string(),
            api_key: "supersecret".to_string(),
            user_id: None,
            language: None,
            movie_root_folder: None,
            movie_quality: None,
            show_root_folder: None,
            show_quality: None,
        });
        config.notifications.discord = Some(DiscordConfig {
            enabled: true,
            webhook_url: "https://discord.com/api/webhooks/1/abc".to_string(),
            username: None,
        });

        let shown = masked(&config);
        assert_eq!(shown.catalog.client_id.as_deref(), Some("cl***56"));
        let broker = shown.acquisition.broker.unwrap();
        assert_eq!(broker.api_key, "su***et");
        assert_eq!(broker.base_url, "http://ombi:5000");
        assert!(!shown.notifications.discord.unwrap().webhook_url.contains("webhooks"));
    }

    #[test]
    fn test_template_round_trips_through_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, default_template()).unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert!(!config.job_specs().is_empty());
        let shown = masked(&config);
        assert_eq!(shown.catalog.client_id.as_deref(), Some("<not set>"));
    }
}
