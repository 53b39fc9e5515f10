use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Assumed reading speed for the derived read-time estimate
const WORDS_PER_MINUTE: usize = 220;

/// Lightweight listing record without body content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
}

/// A full article as served by the detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    /// Estimated minutes to read; derived from content at fetch time
    pub read_time: u32,
}

impl Article {
    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            date: self.date,
        }
    }
}

/// Wire shape of one entry in the list endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryRecord {
    pub id: String,
    pub title: String,
    pub date: String,
}

impl SummaryRecord {
    pub fn into_summary(self) -> Result<ArticleSummary> {
        let date = parse_wire_date(&self.date)?;
        Ok(ArticleSummary {
            id: self.id,
            title: self.title,
            date,
        })
    }
}

/// Wire shape of the detail endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: String,
}

impl ArticleRecord {
    pub fn into_article(self) -> Result<Article> {
        let date = parse_wire_date(&self.date)?;
        let read_time = reading_time(&self.content);
        Ok(Article {
            id: self.id,
            title: self.title,
            content: self.content,
            date,
            read_time,
        })
    }
}

/// Dates are ISO-8601 text on the wire
fn parse_wire_date(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Parse(format!("invalid date '{}': {}", text, e)))
}

/// Estimated minutes to read `content`, never less than one minute
pub fn reading_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    (words.div_ceil(WORDS_PER_MINUTE) as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_time_rounds_up() {
        let content = "word ".repeat(440);
        assert_eq!(reading_time(&content), 2);

        let content = "word ".repeat(441);
        assert_eq!(reading_time(&content), 3);

        let content = "word ".repeat(220);
        assert_eq!(reading_time(&content), 1);
    }

    #[test]
    fn test_reading_time_floors_at_one_minute() {
        assert_eq!(reading_time(""), 1);
        assert_eq!(reading_time("a few short words"), 1);
    }

    #[test]
    fn test_summary_record_date_conversion() {
        let record = SummaryRecord {
            id: "hello-world".to_string(),
            title: "Hello, World".to_string(),
            date: "2023-04-01T12:30:00Z".to_string(),
        };

        let summary = record.into_summary().unwrap();
        assert_eq!(summary.date.to_rfc3339(), "2023-04-01T12:30:00+00:00");
    }

    #[test]
    fn test_invalid_wire_date_is_a_parse_error() {
        let record = SummaryRecord {
            id: "x".to_string(),
            title: "x".to_string(),
            date: "next tuesday".to_string(),
        };

        assert!(matches!(record.into_summary(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_article_record_derives_read_time() {
        let record = ArticleRecord {
            id: "post".to_string(),
            title: "Post".to_string(),
            content: "word ".repeat(440),
            date: "2023-04-01T00:00:00+00:00".to_string(),
        };

        let article = record.into_article().unwrap();
        assert_eq!(article.read_time, 2);
    }
}
