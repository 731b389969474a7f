use anyhow::{Context, Result};

use batnoter_lib::SearchParams;

use crate::app::App;
use crate::OutputFormat;

pub async fn run(
    app: &mut App,
    query: &str,
    path: Option<&str>,
    page: u32,
    format: &OutputFormat,
) -> Result<()> {
    let params = SearchParams {
        page: Some(page),
        path: path.map(str::to_string),
        query: Some(query.to_string()),
    };
    app.store
        .search(&params)
        .await
        .context("Search failed")?;

    let result = app.store.page();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Plain => {
            if result.notes.is_empty() {
                println!("No matches.");
                return Ok(());
            }
            for note in &result.notes {
                println!("{}", note.path);
            }
            println!("\n{} total match(es), page {}", result.total, page);
        }
    }

    Ok(())
}
