use anyhow::Result;

use lectern_core::article::ArticleStore;

pub async fn run(store: &ArticleStore, refresh: bool) -> Result<()> {
    let summaries = store.list_summaries(refresh).await?;

    if summaries.is_empty() {
        println!("No articles.");
        return Ok(());
    }

    println!("Articles ({}):\n", summaries.len());

    for summary in &summaries {
        println!(
            "  {}  {}  ({})",
            summary.date.format("%Y-%m-%d"),
            summary.title,
            summary.id
        );
    }

    if let Some(at) = store.last_refreshed().await {
        println!("\nLast refreshed: {}", at.format("%Y-%m-%d %H:%M"));
    }

    Ok(())
}
