use anyhow::{Context, Result};

use crate::app::App;

pub async fn run(app: &mut App, path: &str) -> Result<()> {
    let note = app
        .store
        .fetch_note(path)
        .await
        .with_context(|| format!("No such note: '{}'", path))?
        .clone();

    app.store
        .delete(&note)
        .await
        .with_context(|| format!("Failed to delete note '{}'", path))?;

    println!("Deleted {}", note.path);
    Ok(())
}
