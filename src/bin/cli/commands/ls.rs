use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub async fn run(app: &mut App, path: &str, format: &OutputFormat) -> Result<()> {
    app.store
        .fetch_tree()
        .await
        .context("Failed to fetch the note tree")?;
    app.store
        .fetch_notes(path)
        .await
        .with_context(|| format!("Failed to list notes under '{}'", path))?;

    let node = app
        .store
        .tree()
        .find(path)
        .with_context(|| format!("No such directory: '{}'", path))?;
    let children = node.children().unwrap_or(&[]);

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = children
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "name": c.name,
                        "path": c.path,
                        "isDir": c.is_dir(),
                        "cached": c.cached,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if children.is_empty() {
                println!("No notes found.");
                return Ok(());
            }
            for child in children {
                if child.is_dir() {
                    println!("{}/", child.name);
                } else {
                    println!("{}", child.name);
                }
            }
        }
    }

    Ok(())
}
