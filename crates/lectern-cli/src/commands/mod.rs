use std::sync::Arc;

use anyhow::Result;

use lectern_core::article::{ArticleStore, HttpArticleSource};
use lectern_core::storage::Database;
use lectern_core::AppConfig;

pub mod list;
pub mod refresh;
pub mod run;
pub mod show;
pub mod theme;

/// Build the cached article store the commands share
pub async fn open_store(config: &AppConfig, db: Arc<Database>) -> Result<ArticleStore> {
    let source = HttpArticleSource::new(config)?;
    Ok(ArticleStore::open(Box::new(source), db, config.staleness_window()).await)
}
