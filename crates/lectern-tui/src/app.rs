use std::cmp::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use lectern_core::article::{Article, ArticleSummary};
use lectern_core::{AppConfig, ThemeMode};

use crate::event::{DetailFetchResult, ListFetchResult};
use crate::markdown::{FocusableItem, MarkdownContent};
use crate::theme::Theme;
use crate::themes;

/// How long the "copied" acknowledgment stays visible
pub const COPY_FLASH_DURATION: Duration = Duration::from_millis(1500);

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Date,
}

impl SortKey {
    pub fn toggle(self) -> Self {
        match self {
            SortKey::Title => SortKey::Date,
            SortKey::Date => SortKey::Title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// A loaded article plus its parsed content and focus state
pub struct ArticleView {
    pub article: Article,
    pub content: MarkdownContent,
    pub items: Vec<FocusableItem>,
    pub focused_item: Option<usize>,
}

impl ArticleView {
    pub fn new(article: Article) -> Self {
        let content = MarkdownContent::from_markdown(&article.content);
        let items = content.focusable_items();
        Self {
            article,
            content,
            items,
            focused_item: None,
        }
    }

    /// Focus the next code block or link, wrapping around
    pub fn next_item(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.focused_item = Some(match self.focused_item {
            Some(idx) => (idx + 1) % self.items.len(),
            None => 0,
        });
    }

    /// Focus the previous code block or link, wrapping around
    pub fn prev_item(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.focused_item = Some(match self.focused_item {
            Some(0) | None => self.items.len() - 1,
            Some(idx) => idx - 1,
        });
    }

    pub fn focused(&self) -> Option<&FocusableItem> {
        self.items.get(self.focused_item?)
    }
}

/// State of the detail screen
pub enum DetailState {
    /// Nothing selected yet
    Idle,
    /// Fetch in flight; render a placeholder
    Loading { id: String },
    Loaded(Box<ArticleView>),
    /// The source reported the id does not exist
    NotFound { id: String },
    /// The fetch failed; distinct from NotFound
    Failed { id: String, message: String },
}

/// Application state
pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub theme_mode: ThemeMode,
    /// Current summary list, kept sorted by `sort_key`/`sort_order`
    pub summaries: Vec<ArticleSummary>,
    /// Selected index into `summaries`
    pub selected: usize,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub view: View,
    pub detail: DetailState,
    /// Scroll offset for the detail screen
    pub detail_scroll: u16,
    /// True while the first list fetch is in flight
    pub list_loading: bool,
    /// Status message shown in the status bar
    pub status_message: Option<String>,
    /// When the clipboard acknowledgment was triggered; expired by tick()
    pub copy_flash: Option<Instant>,
    /// When the summary list was last refreshed
    pub last_refreshed: Option<DateTime<Utc>>,
    /// Pending key for multi-key sequences (e.g., 'gg')
    pub pending_key: Option<char>,
    /// Whether the app should quit
    pub should_quit: bool,
    list_seq: u64,
    detail_seq: u64,
}

impl App {
    pub fn new(config: Arc<AppConfig>, theme_mode: ThemeMode) -> Self {
        Self {
            config,
            theme: themes::resolve(theme_mode),
            theme_mode,
            summaries: Vec::new(),
            selected: 0,
            sort_key: SortKey::Date,
            sort_order: SortOrder::Desc,
            view: View::List,
            detail: DetailState::Idle,
            detail_scroll: 0,
            list_loading: false,
            status_message: None,
            copy_flash: None,
            last_refreshed: None,
            pending_key: None,
            should_quit: false,
            list_seq: 0,
            detail_seq: 0,
        }
    }

    // --- theme ---

    /// Apply a theme mode to the running UI
    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.theme_mode = mode;
        self.theme = themes::resolve(mode);
    }

    /// Flip the theme and return the new mode for persistence
    pub fn toggle_theme(&mut self) -> ThemeMode {
        let mode = self.theme_mode.toggle();
        self.set_theme_mode(mode);
        mode
    }

    // --- request tokens ---

    pub fn next_list_seq(&mut self) -> u64 {
        self.list_seq += 1;
        self.list_seq
    }

    pub fn next_detail_seq(&mut self) -> u64 {
        self.detail_seq += 1;
        self.detail_seq
    }

    // --- list ---

    /// Install a new summary list, re-sorting and keeping the selection on
    /// the same article where possible
    pub fn set_summaries(&mut self, summaries: Vec<ArticleSummary>) {
        let selected_id = self
            .summaries
            .get(self.selected)
            .map(|s| s.id.clone());

        self.summaries = summaries;
        self.sort_summaries();

        self.selected = selected_id
            .and_then(|id| self.summaries.iter().position(|s| s.id == id))
            .unwrap_or(0);
    }

    pub fn toggle_sort_key(&mut self) {
        self.sort_key = self.sort_key.toggle();
        self.resort_keeping_selection();
    }

    pub fn toggle_sort_order(&mut self) {
        self.sort_order = self.sort_order.toggle();
        self.resort_keeping_selection();
    }

    fn resort_keeping_selection(&mut self) {
        let selected_id = self
            .summaries
            .get(self.selected)
            .map(|s| s.id.clone());

        self.sort_summaries();

        if let Some(id) = selected_id {
            if let Some(idx) = self.summaries.iter().position(|s| s.id == id) {
                self.selected = idx;
            }
        }
    }

    fn sort_summaries(&mut self) {
        let key = self.sort_key;
        let order = self.sort_order;
        self.summaries.sort_by(|a, b| {
            let ordering = compare_summaries(a, b, key);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    pub fn selected_summary(&self) -> Option<&ArticleSummary> {
        self.summaries.get(self.selected)
    }

    /// Handle a completed list fetch; results from superseded requests are
    /// dropped so a slow response cannot overwrite a newer one
    pub fn apply_list_result(&mut self, result: ListFetchResult) {
        match result {
            ListFetchResult::Success { seq, summaries } => {
                if seq != self.list_seq {
                    tracing::debug!("Dropping stale list response (seq {})", seq);
                    return;
                }
                self.list_loading = false;
                self.last_refreshed = Some(Utc::now());
                self.set_summaries(summaries);
                self.clear_status();
            }
            ListFetchResult::Failure { seq, message } => {
                if seq != self.list_seq {
                    return;
                }
                self.list_loading = false;
                self.set_status(format!("Refresh failed: {}", message));
            }
        }
    }

    // --- detail ---

    /// Switch to the detail screen and mark a fetch as in flight
    pub fn open_detail(&mut self, id: String) {
        self.view = View::Detail;
        self.detail = DetailState::Loading { id };
        self.detail_scroll = 0;
    }

    pub fn back_to_list(&mut self) {
        self.view = View::List;
        self.detail = DetailState::Idle;
        self.detail_scroll = 0;
    }

    /// Handle a completed detail fetch, dropping superseded responses
    pub fn apply_detail_result(&mut self, result: DetailFetchResult) {
        let seq = match &result {
            DetailFetchResult::Success { seq, .. }
            | DetailFetchResult::NotFound { seq, .. }
            | DetailFetchResult::Failure { seq, .. } => *seq,
        };
        if seq != self.detail_seq {
            tracing::debug!("Dropping stale detail response (seq {})", seq);
            return;
        }
        // A response for a screen we already left is also stale
        if self.view != View::Detail {
            return;
        }

        self.detail = match result {
            DetailFetchResult::Success { article, .. } => {
                DetailState::Loaded(Box::new(ArticleView::new(*article)))
            }
            DetailFetchResult::NotFound { id, .. } => DetailState::NotFound { id },
            DetailFetchResult::Failure { id, message, .. } => {
                DetailState::Failed { id, message }
            }
        };
    }

    pub fn article_view_mut(&mut self) -> Option<&mut ArticleView> {
        match self.detail {
            DetailState::Loaded(ref mut view) => Some(view),
            _ => None,
        }
    }

    pub fn article_view(&self) -> Option<&ArticleView> {
        match self.detail {
            DetailState::Loaded(ref view) => Some(view),
            _ => None,
        }
    }

    // --- navigation ---

    pub fn move_down(&mut self) {
        match self.view {
            View::List => {
                if !self.summaries.is_empty() && self.selected < self.summaries.len() - 1 {
                    self.selected += 1;
                }
            }
            View::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
        }
    }

    pub fn move_up(&mut self) {
        match self.view {
            View::List => {
                self.selected = self.selected.saturating_sub(1);
            }
            View::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
        }
    }

    pub fn scroll_half_page_down(&mut self) {
        match self.view {
            View::List => {
                let jump = (self.summaries.len() / 2).max(1);
                self.selected =
                    (self.selected + jump).min(self.summaries.len().saturating_sub(1));
            }
            View::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_add(10);
            }
        }
    }

    pub fn scroll_half_page_up(&mut self) {
        match self.view {
            View::List => {
                let jump = (self.summaries.len() / 2).max(1);
                self.selected = self.selected.saturating_sub(jump);
            }
            View::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_sub(10);
            }
        }
    }

    pub fn jump_to_top(&mut self) {
        match self.view {
            View::List => self.selected = 0,
            View::Detail => self.detail_scroll = 0,
        }
    }

    pub fn jump_to_bottom(&mut self) {
        match self.view {
            View::List => {
                self.selected = self.summaries.len().saturating_sub(1);
            }
            View::Detail => {
                self.detail_scroll = u16::MAX; // Clamped during rendering
            }
        }
    }

    // --- clipboard acknowledgment ---

    /// The code of the focused code block, if one is focused
    pub fn focused_code(&self) -> Option<String> {
        match self.article_view()?.focused()? {
            FocusableItem::CodeBlock { code } => Some(code.clone()),
            FocusableItem::Link { .. } => None,
        }
    }

    /// The URL of the focused link, if one is focused
    pub fn focused_link(&self) -> Option<String> {
        match self.article_view()?.focused()? {
            FocusableItem::Link { url } => Some(url.clone()),
            FocusableItem::CodeBlock { .. } => None,
        }
    }

    pub fn flash_copied(&mut self, now: Instant) {
        self.copy_flash = Some(now);
    }

    pub fn copy_flash_active(&self) -> bool {
        self.copy_flash.is_some()
    }

    /// Advance time-based state; called on every tick so transient state
    /// cannot outlive the UI loop
    pub fn tick(&mut self, now: Instant) {
        if let Some(at) = self.copy_flash {
            if now.duration_since(at) >= COPY_FLASH_DURATION {
                self.copy_flash = None;
            }
        }
    }

    // --- status ---

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }
}

fn compare_summaries(a: &ArticleSummary, b: &ArticleSummary, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => {
            // Case-insensitive, with the raw title as a deterministic tiebreak
            let left = a.title.to_lowercase();
            let right = b.title.to_lowercase();
            left.cmp(&right).then_with(|| a.title.cmp(&b.title))
        }
        SortKey::Date => a.date.cmp(&b.date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn summary(id: &str, title: &str, day: u32) -> ArticleSummary {
        ArticleSummary {
            id: id.to_string(),
            title: title.to_string(),
            date: Utc.with_ymd_and_hms(2023, 1, day, 0, 0, 0).unwrap(),
        }
    }

    fn app() -> App {
        App::new(Arc::new(AppConfig::default()), ThemeMode::Dark)
    }

    fn titles(app: &App) -> Vec<&str> {
        app.summaries.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_title_sort_is_case_insensitive() {
        let mut app = app();
        app.sort_key = SortKey::Title;
        app.sort_order = SortOrder::Asc;
        app.set_summaries(vec![
            summary("b", "Banana", 1),
            summary("a", "apple", 2),
            summary("c", "Cherry", 3),
        ]);

        assert_eq!(titles(&app), vec!["apple", "Banana", "Cherry"]);

        app.toggle_sort_order();
        assert_eq!(titles(&app), vec!["Cherry", "Banana", "apple"]);
    }

    #[test]
    fn test_date_sort_defaults_to_newest_first() {
        let mut app = app();
        app.set_summaries(vec![
            summary("old", "Old", 1),
            summary("new", "New", 20),
            summary("mid", "Mid", 10),
        ]);

        assert_eq!(titles(&app), vec!["New", "Mid", "Old"]);
    }

    #[test]
    fn test_sort_toggles_preserve_selection() {
        let mut app = app();
        app.set_summaries(vec![
            summary("a", "Alpha", 1),
            summary("b", "Beta", 2),
            summary("c", "Gamma", 3),
        ]);

        // Date desc: Gamma, Beta, Alpha. Select Beta.
        app.selected = 1;
        app.toggle_sort_key();

        assert_eq!(app.selected_summary().unwrap().id, "b");
    }

    #[test]
    fn test_stale_list_response_is_dropped() {
        let mut app = app();
        let first = app.next_list_seq();
        let second = app.next_list_seq();

        app.apply_list_result(ListFetchResult::Success {
            seq: second,
            summaries: vec![summary("fresh", "Fresh", 2)],
        });
        app.apply_list_result(ListFetchResult::Success {
            seq: first,
            summaries: vec![summary("stale", "Stale", 1)],
        });

        assert_eq!(titles(&app), vec!["Fresh"]);
    }

    #[test]
    fn test_stale_detail_response_is_dropped() {
        let mut app = app();
        app.open_detail("first".to_string());
        let first = app.next_detail_seq();
        app.open_detail("second".to_string());
        let second = app.next_detail_seq();

        app.apply_detail_result(DetailFetchResult::NotFound {
            seq: first,
            id: "first".to_string(),
        });
        assert!(matches!(app.detail, DetailState::Loading { .. }));

        app.apply_detail_result(DetailFetchResult::NotFound {
            seq: second,
            id: "second".to_string(),
        });
        assert!(matches!(app.detail, DetailState::NotFound { .. }));
    }

    #[test]
    fn test_detail_response_after_leaving_the_screen_is_dropped() {
        let mut app = app();
        app.open_detail("post".to_string());
        let seq = app.next_detail_seq();
        app.back_to_list();

        app.apply_detail_result(DetailFetchResult::NotFound {
            seq,
            id: "post".to_string(),
        });
        assert!(matches!(app.detail, DetailState::Idle));
    }

    #[test]
    fn test_list_failure_keeps_existing_summaries() {
        let mut app = app();
        let seq = app.next_list_seq();
        app.apply_list_result(ListFetchResult::Success {
            seq,
            summaries: vec![summary("a", "Alpha", 1)],
        });

        let seq = app.next_list_seq();
        app.apply_list_result(ListFetchResult::Failure {
            seq,
            message: "HTTP 500".to_string(),
        });

        assert_eq!(titles(&app), vec!["Alpha"]);
        assert!(app.status_message.as_deref().unwrap().contains("HTTP 500"));
    }

    #[test]
    fn test_copy_flash_expires_after_delay() {
        let mut app = app();
        let start = Instant::now();

        app.flash_copied(start);
        app.tick(start + Duration::from_millis(1000));
        assert!(app.copy_flash_active());

        app.tick(start + Duration::from_millis(1600));
        assert!(!app.copy_flash_active());
    }

    #[test]
    fn test_theme_toggle_twice_restores_mode_and_palette() {
        let mut app = app();
        let original_bg = app.theme.bg0;

        app.toggle_theme();
        assert_eq!(app.theme_mode, ThemeMode::Light);
        assert_ne!(app.theme.bg0, original_bg);

        app.toggle_theme();
        assert_eq!(app.theme_mode, ThemeMode::Dark);
        assert_eq!(app.theme.bg0, original_bg);
    }

    #[test]
    fn test_item_focus_wraps() {
        let article = Article {
            id: "post".to_string(),
            title: "Post".to_string(),
            content: "[a](https://a.example)\n\n```rust\nlet x = 1;\n```".to_string(),
            date: Utc::now(),
            read_time: 1,
        };
        let mut view = ArticleView::new(article);
        assert_eq!(view.items.len(), 2);

        view.next_item();
        assert!(matches!(view.focused(), Some(FocusableItem::Link { .. })));
        view.next_item();
        assert!(matches!(
            view.focused(),
            Some(FocusableItem::CodeBlock { .. })
        ));
        view.next_item();
        assert!(matches!(view.focused(), Some(FocusableItem::Link { .. })));

        view.prev_item();
        assert!(matches!(
            view.focused(),
            Some(FocusableItem::CodeBlock { .. })
        ));
    }
}
