use crate::output::{detail_table, Output};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use medialist_config::{Config, CredentialStore, PathManager};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    match cmd {
        ConfigCommands::Show { full } => show_config(&path_manager, full, output),
        ConfigCommands::Init { force } => init_config(&path_manager, force, output),
        ConfigCommands::Tmdb { api_key } => configure_tmdb(&path_manager, api_key, output),
    }
}

fn show_config(path_manager: &PathManager, full: bool, output: &Output) -> Result<()> {
    let config_file = path_manager.config_file();
    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Defaults are in effect. Run 'medialist config init' to write them out.");
    }

    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let mut credentials = CredentialStore::new(path_manager.credentials_file());
    credentials
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {}", e))?;
    let api_key = credentials.get_tmdb_api_key().map(|key| {
        if full {
            key.clone()
        } else {
            mask_string(key)
        }
    });

    output.value(&json!({
        "config_file": config_file.display().to_string(),
        "store_file": path_manager.store_file().display().to_string(),
        "config": config,
        "tmdb_api_key": api_key,
        "tmdb_api_key_updated": credentials.get_tmdb_api_key_updated(),
    }));

    output.table(detail_table(
        "Paths",
        vec![
            ("Config file", config_file.display().to_string()),
            ("Credentials", path_manager.credentials_file().display().to_string()),
            ("Store", path_manager.store_file().display().to_string()),
            ("Logs", path_manager.log_file().display().to_string()),
        ],
    ));
    output.table(detail_table(
        "Metadata provider",
        vec![
            ("Enabled", enabled_mark(config.provider.enabled)),
            ("Base URL", config.provider.base_url.clone()),
            ("Language", config.provider.language.clone()),
            ("Timeout", format!("{} seconds", config.provider.timeout_secs)),
            ("API key", api_key.unwrap_or_else(|| "<not set>".to_string())),
        ],
    ));
    output.table(detail_table(
        "Lists",
        vec![
            ("Max source items", config.lists.max_source_items.to_string()),
            ("Default page size", config.lists.default_page_size.to_string()),
        ],
    ));
    Ok(())
}

fn init_config(path_manager: &PathManager, force: bool, output: &Output) -> Result<()> {
    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;

    let config_file = path_manager.config_file();
    if config_file.exists() && !force {
        output.warn(format!("{} already exists (use --force to overwrite)", config_file.display()));
        return Ok(());
    }

    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;
    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}

fn configure_tmdb(
    path_manager: &PathManager,
    api_key_arg: Option<String>,
    output: &Output,
) -> Result<()> {
    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;

    let api_key = match api_key_arg {
        Some(key) => key,
        None => rpassword::prompt_password("TMDB API key (v3): ")
            .map_err(|e| eyre!("Failed to read API key: {}", e))?,
    };
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(eyre!("API key is required"));
    }

    let credentials_file = path_manager.credentials_file();
    let mut credentials = CredentialStore::new(credentials_file.clone());
    credentials
        .load()
        .map_err(|e| {
            eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e)
        })?;
    credentials.set_tmdb_api_key(api_key);
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials to {}: {}", credentials_file.display(), e))?;

    output.success("TMDB API key saved");
    Ok(())
}

fn enabled_mark(enabled: bool) -> String {
    if enabled {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    match (s.get(..2), s.get(s.len() - 2..)) {
        (Some(head), Some(tail)) => format!("{}***{}", head, tail),
        _ => "*".repeat(s.chars().count()),
    }
}
