use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, SortKey, SortOrder};

pub struct ArticleListWidget;

impl ArticleListWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let key_label = match app.sort_key {
            SortKey::Title => "Title",
            SortKey::Date => "Date",
        };
        let order_arrow = match app.sort_order {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        };
        let title = format!(" Articles [{} {}] ", key_label, order_arrow);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg0));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if app.list_loading && app.summaries.is_empty() {
            Self::render_placeholder(frame, inner, app);
            return;
        }

        if app.summaries.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No articles.",
                Style::default().fg(theme.grey1),
            )));
            frame.render_widget(empty, inner);
            return;
        }

        let items: Vec<ListItem> = app
            .summaries
            .iter()
            .enumerate()
            .map(|(i, summary)| {
                let selected = i == app.selected;

                let title_style = if selected {
                    Style::default()
                        .fg(theme.fg1)
                        .bg(theme.selection)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.fg0)
                };

                let spans = vec![
                    Span::styled(summary.title.clone(), title_style),
                    Span::raw("  "),
                    Span::styled(
                        summary.date.format("%Y-%m-%d").to_string(),
                        Style::default().fg(theme.grey1),
                    ),
                ];

                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().bg(theme.selection));

        let mut state = ListState::default();
        state.select(Some(app.selected));

        frame.render_stateful_widget(list, inner, &mut state);
    }

    /// Placeholder rows while the first fetch is in flight
    fn render_placeholder(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let bar_style = Style::default().fg(theme.bg2);

        let mut lines = Vec::new();
        for i in 0..8u16 {
            if area.height <= i * 2 {
                break;
            }
            // Alternate widths so the placeholder reads as rows, not a wall
            let width = if i % 2 == 0 {
                area.width.saturating_sub(6)
            } else {
                area.width.saturating_sub(14)
            };
            lines.push(Line::from(Span::styled(
                "▒".repeat(width as usize),
                bar_style,
            )));
            lines.push(Line::from(""));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }
}
