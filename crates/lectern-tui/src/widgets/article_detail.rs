use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, ArticleView, DetailState};
use crate::highlight;
use crate::markdown::{ContentElement, Inline};
use crate::theme::Theme;

pub struct ArticleDetailWidget;

impl ArticleDetailWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = app.theme.clone();

        let block = Block::default()
            .title(" Article ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg0));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let copy_flash = app.copy_flash_active();
        let show_read_time = app.config.ui.show_read_time;

        let lines: Vec<Line> = match &app.detail {
            DetailState::Idle => vec![Line::from(Span::styled(
                "No article selected",
                Style::default().fg(theme.grey1),
            ))],
            DetailState::Loading { .. } => Self::loading_lines(inner, &theme),
            DetailState::Failed { id, message } => vec![
                Line::from(Span::styled(
                    format!("Failed to load '{}'", id),
                    Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(theme.fg0),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press Esc to go back",
                    Style::default().fg(theme.grey1),
                )),
            ],
            // The run loop routes NotFound to its own widget
            DetailState::NotFound { id } => vec![Line::from(Span::styled(
                format!("Article not found: {}", id),
                Style::default().fg(theme.grey1),
            ))],
            DetailState::Loaded(view) => {
                Self::article_lines(view, &theme, inner, copy_flash, show_read_time)
            }
        };

        // Keep jump-to-bottom from scrolling past the content
        let max_scroll = (lines.len() as u16).saturating_sub(inner.height.max(1));
        if app.detail_scroll > max_scroll {
            app.detail_scroll = max_scroll;
        }

        let paragraph = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .scroll((app.detail_scroll, 0));

        frame.render_widget(paragraph, inner);
    }

    /// Placeholder rows while the fetch is in flight
    fn loading_lines(area: Rect, theme: &Theme) -> Vec<Line<'static>> {
        let bar_style = Style::default().fg(theme.bg2);
        let mut lines = vec![
            Line::from(Span::styled(
                "▒".repeat((area.width as usize).saturating_sub(20).max(8)),
                bar_style,
            )),
            Line::from(""),
        ];
        for i in 0..10u16 {
            let width = if i % 3 == 2 {
                area.width.saturating_sub(16)
            } else {
                area.width.saturating_sub(4)
            };
            lines.push(Line::from(Span::styled(
                "▒".repeat(width as usize),
                bar_style,
            )));
        }
        lines
    }

    fn article_lines(
        view: &ArticleView,
        theme: &Theme,
        area: Rect,
        copy_flash: bool,
        show_read_time: bool,
    ) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();
        let article = &view.article;

        // Header
        lines.push(Line::from(Span::styled(
            article.title.clone(),
            Style::default()
                .fg(theme.heading)
                .add_modifier(Modifier::BOLD),
        )));

        let mut meta = vec![Span::styled(
            article.date.format("%B %e, %Y").to_string(),
            Style::default().fg(theme.grey1),
        )];
        if show_read_time {
            meta.push(Span::styled(
                format!("  •  {} min read", article.read_time),
                Style::default().fg(theme.grey1),
            ));
        }
        lines.push(Line::from(meta));
        lines.push(Line::from(""));

        // Body; `item_index` walks focusable items in the same order as
        // MarkdownContent::focusable_items
        let mut item_index = 0usize;
        let focused = view.focused_item;

        for element in &view.content.elements {
            match element {
                ContentElement::Heading(level, text) => {
                    let mut style = Style::default()
                        .fg(theme.heading)
                        .add_modifier(Modifier::BOLD);
                    if *level == 1 {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    lines.push(Line::from(Span::styled(text.clone(), style)));
                }
                ContentElement::Paragraph(inlines) => {
                    lines.push(Self::inline_line(
                        inlines,
                        theme,
                        None,
                        &mut item_index,
                        focused,
                    ));
                }
                ContentElement::Quote(inlines) => {
                    lines.push(Self::inline_line(
                        inlines,
                        theme,
                        Some(Span::styled(
                            "│ ".to_string(),
                            Style::default().fg(theme.quote),
                        )),
                        &mut item_index,
                        focused,
                    ));
                }
                ContentElement::ListItem(inlines) => {
                    lines.push(Self::inline_line(
                        inlines,
                        theme,
                        Some(Span::styled(
                            "• ".to_string(),
                            Style::default().fg(theme.accent),
                        )),
                        &mut item_index,
                        focused,
                    ));
                }
                ContentElement::CodeBlock { language, code } => {
                    let is_focused = focused == Some(item_index);
                    item_index += 1;
                    Self::push_code_block(
                        &mut lines,
                        language.as_deref(),
                        code,
                        theme,
                        is_focused,
                        copy_flash,
                    );
                }
                ContentElement::Separator => {
                    lines.push(Line::from(Span::styled(
                        "─".repeat(area.width as usize),
                        Style::default().fg(theme.grey0),
                    )));
                }
                ContentElement::EmptyLine => {
                    lines.push(Line::from(""));
                }
            }
        }

        lines
    }

    /// Render one text line's inlines, advancing the focus counter past the
    /// links it contains
    fn inline_line(
        inlines: &[Inline],
        theme: &Theme,
        prefix: Option<Span<'static>>,
        item_index: &mut usize,
        focused: Option<usize>,
    ) -> Line<'static> {
        let mut spans: Vec<Span<'static>> = Vec::new();
        if let Some(prefix) = prefix {
            spans.push(prefix);
        }

        for inline in inlines {
            match inline {
                Inline::Text(text) => {
                    spans.push(Span::styled(
                        text.clone(),
                        Style::default().fg(theme.fg0),
                    ));
                }
                Inline::Code(code) => {
                    spans.push(Span::styled(
                        code.clone(),
                        Style::default().fg(theme.code_fg).bg(theme.code_bg),
                    ));
                }
                Inline::Link { text, .. } => {
                    let is_focused = focused == Some(*item_index);
                    *item_index += 1;

                    let mut style = Style::default()
                        .fg(theme.link)
                        .add_modifier(Modifier::UNDERLINED);
                    if is_focused {
                        style = style.bg(theme.selection).add_modifier(Modifier::BOLD);
                    }
                    spans.push(Span::styled(text.clone(), style));
                }
            }
        }

        Line::from(spans)
    }

    fn push_code_block(
        lines: &mut Vec<Line<'static>>,
        language: Option<&str>,
        code: &str,
        theme: &Theme,
        is_focused: bool,
        copy_flash: bool,
    ) {
        let label = language.unwrap_or("code");
        let mut header = vec![Span::styled(
            format!("▌ {}", label),
            Style::default().fg(if is_focused {
                theme.accent
            } else {
                theme.grey1
            }),
        )];
        if is_focused {
            if copy_flash {
                header.push(Span::styled(
                    "  copied!",
                    Style::default()
                        .fg(theme.success)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                header.push(Span::styled(
                    "  [y: copy]",
                    Style::default().fg(theme.grey1),
                ));
            }
        }
        lines.push(Line::from(header));

        let highlighted = language.map(highlight::is_recognized).unwrap_or(false);
        let code_bg = Style::default().bg(theme.code_bg);

        for code_line in code.lines() {
            let line = if highlighted {
                highlight::highlight_line(code_line, language.unwrap_or(""), theme)
            } else {
                Line::from(Span::styled(
                    code_line.to_string(),
                    Style::default().fg(theme.code_fg),
                ))
            };
            lines.push(line.style(code_bg));
        }
        if code.is_empty() {
            lines.push(Line::from("").style(code_bg));
        }
    }
}
