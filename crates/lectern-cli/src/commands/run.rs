use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::{mpsc, watch};

use lectern_core::article::ArticleStore;
use lectern_core::refresh::{RefreshEvent, RefreshService};
use lectern_core::storage::{Database, PreferencesRepository};
use lectern_core::{AppConfig, ThemeMode};
use lectern_tui::{
    app::{App, DetailState, View},
    clipboard,
    event::{AppEvent, DetailFetchResult, EventHandler, ListFetchResult},
    input::{handle_key_event, Action},
    themes,
    widgets::{ArticleDetailWidget, ArticleListWidget, NotFoundWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>, db: Arc<Database>) -> Result<()> {
    let store = Arc::new(super::open_store(&config, db.clone()).await?);

    // Theme resolution: persisted value, then terminal background, then dark.
    // A storage read failure falls back the same way as an unset value.
    let theme_mode = match PreferencesRepository::new(&db).theme().await {
        Ok(Some(mode)) => mode,
        Ok(None) => themes::detect_terminal_mode().unwrap_or(ThemeMode::Dark),
        Err(e) => {
            tracing::warn!("Failed to read theme preference: {}", e);
            themes::detect_terminal_mode().unwrap_or(ThemeMode::Dark)
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("Lectern"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.clone(), theme_mode);

    // Warm start from the persisted cache; the initial fetch below is served
    // from it without a network call when it is still fresh
    if let Some(cached) = store.cached_summaries().await {
        app.set_summaries(cached);
        app.last_refreshed = store.last_refreshed().await;
    } else {
        app.list_loading = true;
    }

    let result = event_loop(&mut terminal, &mut app, store, db).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: Arc<ArticleStore>,
    db: Arc<Database>,
) -> Result<()> {
    // Channels for async fetch results
    let (list_tx, mut list_rx) = mpsc::unbounded_channel::<ListFetchResult>();
    let (detail_tx, mut detail_rx) = mpsc::unbounded_channel::<DetailFetchResult>();
    let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel::<RefreshEvent>();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Background refresh; the timer lives inside the service and dies with it
    let refresh_service = RefreshService::new(
        store.clone(),
        std::time::Duration::from_secs(app.config.cache.refresh_interval_secs),
    )
    .with_event_sender(refresh_tx);
    let refresh_task = tokio::spawn(refresh_service.run(shutdown_rx));

    // Initial list load (served from cache when fresh)
    let seq = app.next_list_seq();
    spawn_list_fetch(store.clone(), list_tx.clone(), seq, false);

    let event_handler = EventHandler::new(app.config.ui.tick_rate_ms);

    loop {
        // Apply completed async work (non-blocking)
        while let Ok(result) = list_rx.try_recv() {
            app.apply_list_result(result);
        }
        while let Ok(result) = detail_rx.try_recv() {
            app.apply_detail_result(result);
        }
        while let Ok(event) = refresh_rx.try_recv() {
            match event {
                RefreshEvent::SummariesRefreshed { .. } => {
                    if let Some(summaries) = store.cached_summaries().await {
                        app.set_summaries(summaries);
                    }
                    app.last_refreshed = store.last_refreshed().await;
                }
                RefreshEvent::RefreshFailed { message } => {
                    app.set_status(format!("Background refresh failed: {}", message));
                }
            }
        }

        terminal.draw(|frame| draw(frame, app))?;

        match event_handler.next()? {
            Some(AppEvent::Key(key)) => {
                let action = handle_key_event(key, app);

                if action != Action::PendingG {
                    app.clear_pending_key();
                }

                match action {
                    Action::Quit => app.should_quit = true,
                    Action::MoveUp => app.move_up(),
                    Action::MoveDown => app.move_down(),
                    Action::ScrollHalfPageDown => app.scroll_half_page_down(),
                    Action::ScrollHalfPageUp => app.scroll_half_page_up(),
                    Action::JumpToTop => app.jump_to_top(),
                    Action::JumpToBottom => app.jump_to_bottom(),
                    Action::PendingG => app.pending_key = Some('g'),
                    Action::Select => {
                        if let Some(summary) = app.selected_summary() {
                            let id = summary.id.clone();
                            app.open_detail(id.clone());
                            let seq = app.next_detail_seq();
                            spawn_detail_fetch(store.clone(), detail_tx.clone(), seq, id);
                        }
                    }
                    Action::Back => app.back_to_list(),
                    Action::Refresh => {
                        app.set_status("Refreshing...");
                        let seq = app.next_list_seq();
                        spawn_list_fetch(store.clone(), list_tx.clone(), seq, true);
                    }
                    Action::ToggleTheme => {
                        let mode = app.toggle_theme();
                        persist_theme(db.clone(), mode);
                    }
                    Action::ToggleSortKey => app.toggle_sort_key(),
                    Action::ToggleSortOrder => app.toggle_sort_order(),
                    Action::NextItem => {
                        if let Some(view) = app.article_view_mut() {
                            view.next_item();
                        }
                    }
                    Action::PrevItem => {
                        if let Some(view) = app.article_view_mut() {
                            view.prev_item();
                        }
                    }
                    Action::CopyItem => {
                        if let Some(code) = app.focused_code() {
                            match clipboard::copy_to_clipboard(&code) {
                                Ok(()) => app.flash_copied(Instant::now()),
                                Err(e) => app.set_status(format!("Copy failed: {}", e)),
                            }
                        }
                    }
                    Action::OpenItem => {
                        if let Some(url) = app.focused_link() {
                            if let Err(e) = open::that(&url) {
                                app.set_status(format!("Failed to open link: {}", e));
                            }
                        }
                    }
                    Action::None => {}
                }
            }
            Some(AppEvent::Tick) => app.tick(Instant::now()),
            Some(AppEvent::Resize(_, _)) => {}
            None => {}
        }

        if app.should_quit {
            break;
        }
    }

    // Stop the background refresh before tearing the terminal down
    let _ = shutdown_tx.send(true);
    let _ = refresh_task.await;

    Ok(())
}

fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    match app.view {
        View::List => ArticleListWidget::render(frame, chunks[0], app),
        View::Detail => {
            if matches!(app.detail, DetailState::NotFound { .. }) {
                NotFoundWidget::render(frame, chunks[0], app);
            } else {
                ArticleDetailWidget::render(frame, chunks[0], app);
            }
        }
    }

    StatusBarWidget::render(frame, chunks[1], app);
}

fn spawn_list_fetch(
    store: Arc<ArticleStore>,
    tx: mpsc::UnboundedSender<ListFetchResult>,
    seq: u64,
    force: bool,
) {
    tokio::spawn(async move {
        let result = match store.list_summaries(force).await {
            Ok(summaries) => ListFetchResult::Success { seq, summaries },
            Err(e) => ListFetchResult::Failure {
                seq,
                message: e.to_string(),
            },
        };
        let _ = tx.send(result);
    });
}

fn spawn_detail_fetch(
    store: Arc<ArticleStore>,
    tx: mpsc::UnboundedSender<DetailFetchResult>,
    seq: u64,
    id: String,
) {
    tokio::spawn(async move {
        let result = match store.get_article(&id).await {
            Ok(Some(article)) => DetailFetchResult::Success {
                seq,
                article: Box::new(article),
            },
            Ok(None) => DetailFetchResult::NotFound { seq, id },
            Err(e) => DetailFetchResult::Failure {
                seq,
                id,
                message: e.to_string(),
            },
        };
        let _ = tx.send(result);
    });
}

fn persist_theme(db: Arc<Database>, mode: ThemeMode) {
    tokio::spawn(async move {
        if let Err(e) = PreferencesRepository::new(&db).set_theme(mode).await {
            tracing::warn!("Failed to persist theme preference: {}", e);
        }
    });
}
