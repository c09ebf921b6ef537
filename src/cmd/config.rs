//! Configuration view and validation commands: `trackify config`.

use anyhow::Result;
use std::path::Path;

use trackify::config::{BackendKind, CONFIG_DIR, CONFIG_FILE, TrackifyToml};

use super::super::{Cli, ConfigCommands};
use super::load_config;

pub fn cmd_config(cli: &Cli, project_dir: &Path, command: Option<ConfigCommands>) -> Result<()> {
    let config_dir = project_dir.join(CONFIG_DIR);
    let config_path = config_dir.join(CONFIG_FILE);

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Trackify Configuration");
            println!("======================");
            println!();

            let toml = if config_path.exists() {
                println!("Config file: {}", config_path.display());
                TrackifyToml::load(&config_path)?
            } else {
                println!("No trackify.toml found at {}", config_path.display());
                println!("Using default configuration.");
                TrackifyToml::default()
            };
            println!();

            println!("[backend]");
            println!("  kind = \"{}\"", toml.backend.kind);
            println!("  api_url = \"{}\"", toml.backend.api_url);
            println!("  data_dir = \"{}\"", toml.backend.data_dir);
            println!();

            println!("Effective values (with env/CLI overrides):");
            let config = load_config(cli, project_dir)?;
            println!("  backend = \"{}\"", config.kind);
            match config.kind {
                BackendKind::Remote => println!("  api_url = \"{}\"", config.api_url),
                BackendKind::Local => println!("  data_dir = \"{}\"", config.data_dir.display()),
            }
            println!();

            if !config_path.exists() {
                println!("Run 'trackify config init' to create a trackify.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            let config = load_config(cli, project_dir)?;
            let mut warnings = config.toml.validate();
            for warning in config.validate() {
                if !warnings.contains(&warning) {
                    warnings.push(warning);
                }
            }

            if warnings.is_empty() {
                if config_path.exists() {
                    println!("Configuration is valid.");
                } else {
                    println!("No trackify.toml found. Using defaults (valid).");
                }
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("trackify.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if !config_dir.exists() {
                std::fs::create_dir_all(&config_dir)?;
            }

            let toml = TrackifyToml::default();
            toml.save(&config_path)?;

            println!("Created trackify.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [backend] kind (\"local\" or \"remote\")");
            println!("  - [backend] api_url for the remote tracker API");
            println!("  - [backend] data_dir for local storage");
            println!();
        }
    }

    Ok(())
}
