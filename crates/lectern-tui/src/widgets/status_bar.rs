use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, View};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            let view_str = match app.view {
                View::List => "Articles",
                View::Detail => "Reading",
            };
            let refreshed = match app.last_refreshed {
                Some(at) => format!("refreshed {}", at.format("%H:%M")),
                None => "never refreshed".to_string(),
            };
            format!(
                " {} | {} articles | {} | {} theme",
                view_str,
                app.summaries.len(),
                refreshed,
                app.theme_mode
            )
        };

        let help_hint = match app.view {
            View::List => " q:quit j/k:move enter:open s/S:sort r:refresh t:theme ",
            View::Detail => " q:quit esc:back j/k:scroll tab:items y:copy o:open ",
        };

        let padding_len = area
            .width
            .saturating_sub(status_text.width() as u16 + help_hint.width() as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(
                status_text,
                Style::default().fg(theme.fg1).bg(theme.bg2),
            ),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(
                help_hint,
                Style::default().fg(theme.grey1).bg(theme.bg2),
            ),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
