//! Data reset command: `trackify reset`.

use anyhow::Result;
use std::path::Path;

use super::super::Cli;
use super::connect;

pub async fn cmd_reset(cli: &Cli, project_dir: &Path, force: bool) -> Result<()> {
    use dialoguer::Confirm;

    if !force {
        let confirm = Confirm::new()
            .with_prompt("This will delete every project and issue. Are you sure?")
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirm {
            println!("Reset cancelled");
            return Ok(());
        }
    }

    let service = connect(cli, project_dir).await?;
    service.reset().await?;

    println!("Reset complete");
    Ok(())
}
