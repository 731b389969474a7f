use anyhow::{Context, Result};

use batnoter_lib::ApiError;

use crate::app::App;

pub async fn run(app: &mut App, path: &str, content: &str) -> Result<()> {
    // An existing note needs its current sha for the update to be accepted.
    let sha = match app.store.fetch_note(path).await {
        Ok(note) => Some(note.sha.clone()),
        Err(ApiError::NotFound(_)) => None,
        Err(e) => return Err(e).with_context(|| format!("Failed to look up '{}'", path)),
    };

    let saved = app
        .store
        .save(path, content, sha.as_deref())
        .await
        .with_context(|| format!("Failed to save note '{}'", path))?;

    println!("Saved {} ({})", saved.path, saved.sha);
    Ok(())
}
