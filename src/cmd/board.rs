//! Kanban board commands: `trackify board` and `trackify move`.

use anyhow::{Context, Result};
use std::path::Path;

use trackify::board::{Board, Bucket, DropEvent, MoveOutcome, SortOrder};
use trackify::models::Issue;

use super::super::Cli;
use super::connect;

async fn open_board(cli: &Cli, project_dir: &Path, project_id: &str) -> Result<Board> {
    let service = connect(cli, project_dir).await?;
    let mut board = Board::new(service, project_id);
    board
        .load()
        .await
        .with_context(|| format!("Failed to load board for project {}", project_id))?;
    if board.project().is_none() {
        anyhow::bail!("Project {} not found", project_id);
    }
    Ok(board)
}

fn print_column(issues: &[Issue]) {
    if issues.is_empty() {
        println!("  {}", console::style("(empty)").dim());
    }
    for issue in issues {
        let marker = if issue.priority.is_some_and(|p| p.is_high()) {
            console::style("!").red().bold()
        } else {
            console::style(" ")
        };
        println!("  {} {:<6} {}", marker, issue.id, issue.title);
    }
}

fn print_board(board: &Board) {
    if let Some(project) = board.project() {
        println!();
        println!("{}", console::style(&project.name).bold().cyan());
        if !board.query().is_empty() {
            println!("Filter: \"{}\"", board.query());
        }
    }

    for bucket in Bucket::ALL {
        let visible = board.visible(bucket);
        println!();
        println!(
            "{} ({}) [{}]",
            console::style(bucket.title()).bold(),
            visible.len(),
            console::style(bucket.drop_zone()).dim()
        );
        print_column(visible);
    }

    println!();
    println!("High priority issues: {}", board.high_priority_count());
}

pub async fn cmd_board(
    cli: &Cli,
    project_dir: &Path,
    project_id: &str,
    query: Option<&str>,
    sort: Option<&str>,
) -> Result<()> {
    let mut board = open_board(cli, project_dir, project_id).await?;

    if let Some(sort) = sort {
        let order: SortOrder = sort.parse().map_err(anyhow::Error::msg)?;
        board.sort(order);
    }
    if let Some(query) = query {
        board.set_query(query);
    }

    print_board(&board);
    Ok(())
}

pub async fn cmd_move(
    cli: &Cli,
    project_dir: &Path,
    project_id: &str,
    issue_id: &str,
    from: &str,
    to: &str,
    index: usize,
) -> Result<()> {
    let mut board = open_board(cli, project_dir, project_id).await?;

    let event = DropEvent {
        issue_id: issue_id.to_string(),
        from_zone: from.to_string(),
        to_zone: to.to_string(),
        to_index: index,
    };

    match board.move_issue(&event).await? {
        MoveOutcome::Reordered { bucket } => {
            // Column order lives on the board only; nothing is written.
            println!(
                "{} issue {} within {} {}",
                console::style("Reordered").green().bold(),
                issue_id,
                bucket.title(),
                console::style("(display order only, not saved)").dim()
            );
            print_column(board.visible(bucket));
        }
        MoveOutcome::Transferred { from, to } => {
            println!(
                "{} issue {} from {} to {}",
                console::style("Moved").green().bold(),
                issue_id,
                from.title(),
                to.title()
            );
        }
    }

    Ok(())
}
