//! Issue commands: `trackify issues`.

use anyhow::Result;
use std::path::Path;

use trackify::board::{Board, IssueDraft};
use trackify::models::IssuePatch;
use trackify::util::parse_labels;

use super::super::{Cli, IssuesCommands};
use super::{connect, parse_opt, print_issue_row, print_labels};

pub async fn cmd_issues(cli: &Cli, project_dir: &Path, command: &IssuesCommands) -> Result<()> {
    let service = connect(cli, project_dir).await?;

    match command {
        IssuesCommands::List { project } => {
            let issues = match project {
                Some(project_id) => service.list_issues_of_project(project_id).await?,
                None => service.list_issues().await?,
            };

            if issues.is_empty() {
                println!("No issues found.");
                return Ok(());
            }
            println!(
                "{:<6} {:<8} {:<36} {:<12} Priority",
                "ID", "Project", "Title", "Status"
            );
            for issue in &issues {
                print_issue_row(issue);
            }
        }
        IssuesCommands::Create {
            project,
            title,
            description,
            list,
            issue_type,
            priority,
            labels,
        } => {
            let draft = IssueDraft {
                title: title.clone(),
                description: description.clone().unwrap_or_default(),
                labels: labels.clone().unwrap_or_default(),
                issue_type: parse_opt(issue_type.as_deref())?.unwrap_or_default(),
                priority: parse_opt(priority.as_deref())?,
            };
            let mut board = Board::new(service, project.clone());
            let issue = board.create_issue(draft, list).await?;
            println!(
                "{} issue {} ({}) in {}",
                console::style("Created").green().bold(),
                issue.title,
                issue.id,
                issue.status
            );
        }
        IssuesCommands::Show { id } => match service.get_issue(id).await? {
            Some(issue) => {
                println!("{}", console::style(&issue.title).bold().cyan());
                println!("ID:          {}", issue.id);
                println!("Project:     {}", issue.project_id);
                println!("Description: {}", issue.description_or_empty());
                println!("Type:        {}", issue.issue_type);
                println!("Status:      {}", issue.status);
                if let Some(priority) = issue.priority {
                    println!("Priority:    {}", priority);
                }
                if let Some(due) = &issue.date_due {
                    println!("Due:         {}", due);
                }
                print_labels(issue.labels.as_deref());
            }
            None => anyhow::bail!("Issue {} not found", id),
        },
        IssuesCommands::Update {
            id,
            title,
            description,
            issue_type,
            status,
            priority,
            due,
            labels,
        } => {
            let patch = IssuePatch {
                title: title.clone(),
                description: description.clone(),
                issue_type: parse_opt(issue_type.as_deref())?,
                status: parse_opt(status.as_deref())?,
                priority: parse_opt(priority.as_deref())?,
                date_due: due.clone(),
                labels: labels.as_deref().map(parse_labels),
                ..Default::default()
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to update. Pass at least one field flag.");
            }
            service.update_issue(id, &patch).await?;
            println!("{} issue {}", console::style("Updated").green().bold(), id);
        }
        IssuesCommands::Delete { id } => {
            service.delete_issue(id).await?;
            println!("{} issue {}", console::style("Deleted").green().bold(), id);
        }
    }

    Ok(())
}
