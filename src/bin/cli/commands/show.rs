use anyhow::{Context, Result};

use crate::app::App;

pub async fn run(app: &mut App, path: &str) -> Result<()> {
    let note = app
        .store
        .fetch_note(path)
        .await
        .with_context(|| format!("Failed to fetch note '{}'", path))?;

    match &note.content {
        Some(content) => print!("{}", content),
        None => println!("(empty note)"),
    }

    Ok(())
}
