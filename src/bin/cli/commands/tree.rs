use anyhow::{Context, Result};

use batnoter_lib::TreeNode;

use crate::app::App;

pub async fn run(app: &mut App) -> Result<()> {
    app.store
        .fetch_tree()
        .await
        .context("Failed to fetch the note tree")?;

    let root = app.store.tree();
    println!(".");

    let children = root.children().unwrap_or(&[]);
    let total = children.len();
    for (idx, child) in children.iter().enumerate() {
        print_node(child, "", idx + 1 == total);
    }

    Ok(())
}

fn print_node(node: &TreeNode, prefix: &str, is_last: bool) {
    let connector = if is_last { "\u{2514}\u{2500}\u{2500} " } else { "\u{251c}\u{2500}\u{2500} " };
    if node.is_dir() {
        println!("{}{}{}/", prefix, connector, node.name);
    } else {
        println!("{}{}{}", prefix, connector, node.name);
    }

    let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "\u{2502}   " });
    let children = node.children().unwrap_or(&[]);
    let total = children.len();
    for (idx, child) in children.iter().enumerate() {
        print_node(child, &child_prefix, idx + 1 == total);
    }
}
