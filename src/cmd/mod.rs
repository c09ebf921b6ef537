//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module          | Commands handled                                   |
//! |-----------------|-----------------------------------------------------|
//! | `projects`      | `Projects`                                         |
//! | `issues`        | `Issues`                                           |
//! | `board`         | `Board`, `Move`                                    |
//! | `reset`         | `Reset`                                            |
//! | `config`        | `Config`                                           |

use anyhow::{Context, Result};
use std::path::Path;
use std::str::FromStr;

use trackify::config::{Overrides, TrackifyConfig};
use trackify::models::{Issue, ItemPriority, ItemStatus, Project};
use trackify::service::DataService;

use super::Cli;

pub mod board;
pub mod config;
pub mod issues;
pub mod projects;
pub mod reset;

pub use board::{cmd_board, cmd_move};
pub use config::cmd_config;
pub use issues::cmd_issues;
pub use projects::cmd_projects;
pub use reset::cmd_reset;

fn cli_overrides(cli: &Cli) -> Overrides {
    Overrides {
        backend: cli.backend.clone(),
        api_url: cli.api_url.clone(),
        data_dir: cli.data_dir.clone(),
    }
}

pub fn load_config(cli: &Cli, project_dir: &Path) -> Result<TrackifyConfig> {
    TrackifyConfig::load(project_dir, &cli_overrides(cli))
}

/// Resolve configuration and open the configured backend.
pub async fn connect(cli: &Cli, project_dir: &Path) -> Result<DataService> {
    let config = load_config(cli, project_dir)?;
    DataService::connect(&config.backend())
        .await
        .with_context(|| format!("Failed to open {} backend", config.kind))
}

/// Parse an optional CLI value with the model's `FromStr`.
pub fn parse_opt<T>(value: Option<&str>) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    value
        .map(|v| v.parse::<T>().map_err(anyhow::Error::msg))
        .transpose()
}

fn styled_status(status: ItemStatus) -> console::StyledObject<&'static str> {
    let s = console::style(status.as_str());
    match status {
        ItemStatus::New => s.cyan(),
        ItemStatus::Approved => s.blue(),
        ItemStatus::InProgress => s.yellow(),
        ItemStatus::Done => s.green(),
        ItemStatus::Closed => s.dim(),
    }
}

fn styled_priority(priority: Option<ItemPriority>) -> console::StyledObject<&'static str> {
    match priority {
        Some(p) if p.is_high() => console::style(p.as_str()).red().bold(),
        Some(p) => console::style(p.as_str()),
        None => console::style("-").dim(),
    }
}

pub fn print_project_row(project: &Project) {
    println!(
        "{:<6} {:<30} {:<12} {}",
        project.id,
        project.name,
        styled_status(project.status),
        styled_priority(project.priority)
    );
}

pub fn print_issue_row(issue: &Issue) {
    println!(
        "{:<6} {:<8} {:<36} {:<12} {}",
        issue.id,
        issue.project_id,
        issue.title,
        styled_status(issue.status),
        styled_priority(issue.priority)
    );
}

pub fn print_labels(labels: Option<&[String]>) {
    if let Some(labels) = labels.filter(|l| !l.is_empty()) {
        println!("Labels:      {}", labels.join(", "));
    }
}
