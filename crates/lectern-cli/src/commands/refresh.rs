use anyhow::Result;

use lectern_core::article::ArticleStore;

pub async fn run(store: &ArticleStore) -> Result<()> {
    println!("Refreshing article summaries...");

    let summaries = store.list_summaries(true).await?;

    println!("Refresh complete. {} articles cached.", summaries.len());

    Ok(())
}
