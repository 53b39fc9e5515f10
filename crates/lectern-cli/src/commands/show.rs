use anyhow::{bail, Result};

use lectern_core::article::ArticleStore;

pub async fn run(store: &ArticleStore, id: &str) -> Result<()> {
    let Some(article) = store.get_article(id).await? else {
        bail!("Article not found: {}", id);
    };

    println!("{}", article.title);
    println!(
        "{} · {} min read\n",
        article.date.format("%B %e, %Y"),
        article.read_time
    );
    println!("{}", article.content);

    Ok(())
}
