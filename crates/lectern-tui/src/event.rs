use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use lectern_core::article::{Article, ArticleSummary};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Option<AppEvent>> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}

/// Result of an async summary-list fetch.
/// `seq` is the monotonic request token; stale results are discarded.
#[derive(Debug)]
pub enum ListFetchResult {
    Success {
        seq: u64,
        summaries: Vec<ArticleSummary>,
    },
    Failure {
        seq: u64,
        message: String,
    },
}

/// Result of an async article-detail fetch, tagged like [`ListFetchResult`]
#[derive(Debug)]
pub enum DetailFetchResult {
    Success { seq: u64, article: Box<Article> },
    NotFound { seq: u64, id: String },
    Failure { seq: u64, id: String, message: String },
}
