mod client;
mod models;
mod store;

pub use client::{ArticleSource, HttpArticleSource};
pub use models::{reading_time, Article, ArticleRecord, ArticleSummary, SummaryRecord};
pub use store::ArticleStore;
