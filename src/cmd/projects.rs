//! Project commands: `trackify projects`.

use anyhow::Result;
use std::path::Path;

use trackify::models::ProjectPatch;
use trackify::project_list::ProjectList;
use trackify::util::parse_labels;

use super::super::{Cli, ProjectsCommands};
use super::{connect, parse_opt, print_labels, print_project_row};

pub async fn cmd_projects(cli: &Cli, project_dir: &Path, command: &ProjectsCommands) -> Result<()> {
    let service = connect(cli, project_dir).await?;

    match command {
        ProjectsCommands::List { query } => {
            let mut list = ProjectList::new(service);
            list.load().await?;
            let projects = list.filtered(query.as_deref().unwrap_or(""));

            if projects.is_empty() {
                println!("No projects found.");
                return Ok(());
            }
            println!("{:<6} {:<30} {:<12} Priority", "ID", "Name", "Status");
            for project in projects {
                print_project_row(project);
            }
        }
        ProjectsCommands::Create { name, description } => {
            let mut list = ProjectList::new(service);
            let project = list.create(name, description.clone()).await?;
            println!(
                "{} project {} ({})",
                console::style("Created").green().bold(),
                project.name,
                project.id
            );
        }
        ProjectsCommands::Show { id } => match service.get_project(id).await? {
            Some(project) => {
                let issues = service.list_issues_of_project(id).await?;
                let high = issues
                    .iter()
                    .filter(|i| i.priority.is_some_and(|p| p.is_high()))
                    .count();

                println!("{}", console::style(&project.name).bold().cyan());
                println!("ID:          {}", project.id);
                if let Some(description) = &project.description {
                    println!("Description: {}", description);
                }
                println!("Status:      {}", project.status);
                if let Some(priority) = project.priority {
                    println!("Priority:    {}", priority);
                }
                if let Some(created) = &project.date_created {
                    println!("Created:     {}", created);
                }
                print_labels(project.labels.as_deref());
                println!("Issues:      {} ({} high priority)", issues.len(), high);
            }
            None => anyhow::bail!("Project {} not found", id),
        },
        ProjectsCommands::Update {
            id,
            name,
            description,
            status,
            priority,
            labels,
        } => {
            let patch = ProjectPatch {
                name: name.clone(),
                description: description.clone(),
                status: parse_opt(status.as_deref())?,
                priority: parse_opt(priority.as_deref())?,
                labels: labels.as_deref().map(parse_labels),
                ..Default::default()
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to update. Pass at least one field flag.");
            }
            service.update_project(id, &patch).await?;
            println!("{} project {}", console::style("Updated").green().bold(), id);
        }
        ProjectsCommands::Delete { id } => {
            let mut list = ProjectList::new(service);
            list.delete(id).await?;
            println!("{} project {}", console::style("Deleted").green().bold(), id);
        }
    }

    Ok(())
}
