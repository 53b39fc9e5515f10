//! Markdown to render-tree conversion.
//!
//! Pure line-based parser producing [`ContentElement`]s the detail widget can
//! style. Only the constructs the blog actually uses are understood: headings,
//! fenced code blocks, block quotes, list items, separators, inline code, and
//! links. Everything else passes through as text.

/// Inline fragment inside a paragraph, quote, or list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    /// Inline code without a language tag; rendered as plain code
    Code(String),
    Link {
        text: String,
        url: String,
    },
}

/// Block-level element of the rendered article
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentElement {
    /// Heading with level (1-6) and text
    Heading(u8, String),
    Paragraph(Vec<Inline>),
    Quote(Vec<Inline>),
    ListItem(Vec<Inline>),
    /// Fenced code block; `language` is the fence tag, if any
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    /// Horizontal rule
    Separator,
    EmptyLine,
}

/// An element the reader can focus and act on (copy or open)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusableItem {
    /// A fenced code block, copyable to the clipboard
    CodeBlock { code: String },
    /// A link, openable in the system browser
    Link { url: String },
}

/// Parsed article body ready for rendering
#[derive(Debug, Clone, Default)]
pub struct MarkdownContent {
    pub elements: Vec<ContentElement>,
    /// Link URLs in document order
    pub links: Vec<String>,
}

impl MarkdownContent {
    /// Parse markdown text into content elements
    pub fn from_markdown(text: &str) -> Self {
        let mut elements = Vec::new();
        let mut links = Vec::new();

        let mut fence: Option<(Option<String>, Vec<String>)> = None;

        for line in text.lines() {
            if let Some(rest) = line.trim_start().strip_prefix("```") {
                match fence.take() {
                    Some((language, lines)) => {
                        elements.push(ContentElement::CodeBlock {
                            language,
                            code: lines.join("\n"),
                        });
                    }
                    None => {
                        let tag = rest.trim();
                        let language = if tag.is_empty() {
                            None
                        } else {
                            Some(tag.to_string())
                        };
                        fence = Some((language, Vec::new()));
                    }
                }
                continue;
            }

            if let Some((_, ref mut lines)) = fence {
                lines.push(line.to_string());
                continue;
            }

            elements.push(parse_block_line(line, &mut links));
        }

        // Unterminated fence: keep what was captured as a code block
        if let Some((language, lines)) = fence {
            elements.push(ContentElement::CodeBlock {
                language,
                code: lines.join("\n"),
            });
        }

        let elements = collapse_empty_lines(elements);

        Self { elements, links }
    }

    /// Focusable items (code blocks and links) in document order
    pub fn focusable_items(&self) -> Vec<FocusableItem> {
        let mut items = Vec::new();

        for element in &self.elements {
            match element {
                ContentElement::CodeBlock { code, .. } => {
                    items.push(FocusableItem::CodeBlock { code: code.clone() });
                }
                ContentElement::Paragraph(inlines)
                | ContentElement::Quote(inlines)
                | ContentElement::ListItem(inlines) => {
                    for inline in inlines {
                        if let Inline::Link { url, .. } = inline {
                            items.push(FocusableItem::Link { url: url.clone() });
                        }
                    }
                }
                _ => {}
            }
        }

        items
    }
}

fn parse_block_line(line: &str, links: &mut Vec<String>) -> ContentElement {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return ContentElement::EmptyLine;
    }

    if is_separator(trimmed) {
        return ContentElement::Separator;
    }

    // Headings: one to six '#' followed by a space
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if (1..=6).contains(&hashes) {
        if let Some(text) = trimmed[hashes..].strip_prefix(' ') {
            return ContentElement::Heading(hashes as u8, text.trim().to_string());
        }
    }

    if let Some(rest) = trimmed.strip_prefix('>') {
        return ContentElement::Quote(parse_inline(rest.trim_start(), links));
    }

    if let Some(rest) = strip_list_marker(trimmed) {
        return ContentElement::ListItem(parse_inline(rest, links));
    }

    ContentElement::Paragraph(parse_inline(trimmed, links))
}

fn is_separator(trimmed: &str) -> bool {
    trimmed.len() >= 3
        && (trimmed.chars().all(|c| c == '-')
            || trimmed.chars().all(|c| c == '*')
            || trimmed.chars().all(|c| c == '_'))
}

fn strip_list_marker(trimmed: &str) -> Option<&str> {
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return Some(rest);
        }
    }

    // Ordered list: digits followed by ". "
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = trimmed[digits..].strip_prefix(". ") {
            return Some(rest);
        }
    }

    None
}

/// Split a text line into plain text, inline code, and link fragments
fn parse_inline(text: &str, links: &mut Vec<String>) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut plain = String::new();
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        match ch {
            '`' => {
                let rest = &text[idx + 1..];
                if let Some(end) = rest.find('`') {
                    flush_plain(&mut plain, &mut inlines);
                    inlines.push(Inline::Code(rest[..end].to_string()));
                    skip_past(&mut chars, idx + 1 + end + 1);
                } else {
                    plain.push(ch);
                }
            }
            '[' => {
                if let Some((link_text, url, end)) = parse_link(&text[idx..]) {
                    flush_plain(&mut plain, &mut inlines);
                    links.push(url.clone());
                    inlines.push(Inline::Link {
                        text: link_text,
                        url,
                    });
                    skip_past(&mut chars, idx + end);
                } else {
                    plain.push(ch);
                }
            }
            _ => plain.push(ch),
        }
    }

    flush_plain(&mut plain, &mut inlines);
    inlines
}

fn flush_plain(plain: &mut String, inlines: &mut Vec<Inline>) {
    if !plain.is_empty() {
        inlines.push(Inline::Text(std::mem::take(plain)));
    }
}

fn skip_past(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>, end: usize) {
    while let Some(&(idx, _)) = chars.peek() {
        if idx < end {
            chars.next();
        } else {
            break;
        }
    }
}

/// Parse `[text](url)` at the start of `s`, returning (text, url, byte length)
fn parse_link(s: &str) -> Option<(String, String, usize)> {
    let close = s.find(']')?;
    let rest = &s[close + 1..];
    if !rest.starts_with('(') {
        return None;
    }
    let url_end = rest.find(')')?;

    let text = s[1..close].to_string();
    let url = rest[1..url_end].to_string();
    if url.is_empty() {
        return None;
    }

    Some((text, url, close + 1 + url_end + 1))
}

/// Collapse runs of empty lines into a single one
fn collapse_empty_lines(elements: Vec<ContentElement>) -> Vec<ContentElement> {
    let mut result: Vec<ContentElement> = Vec::with_capacity(elements.len());

    for element in elements {
        if matches!(element, ContentElement::EmptyLine)
            && matches!(result.last(), Some(ContentElement::EmptyLine))
        {
            continue;
        }
        result.push(element);
    }

    result
}
