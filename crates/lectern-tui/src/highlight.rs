//! Lightweight syntax highlighting for fenced code blocks.
//!
//! Recognizes a handful of languages and colors keywords, strings, comments,
//! and numbers. Unrecognized fence tags render as plain code; that decision
//! is made by the caller via [`is_recognized`].

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::theme::Theme;

struct LanguageSpec {
    keywords: &'static [&'static str],
    line_comment: &'static str,
}

const RUST: LanguageSpec = LanguageSpec {
    keywords: &[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
        "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
        "true", "type", "unsafe", "use", "where", "while",
    ],
    line_comment: "//",
};

const JAVASCRIPT: LanguageSpec = LanguageSpec {
    keywords: &[
        "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
        "delete", "do", "else", "export", "extends", "false", "finally", "for", "function", "if",
        "import", "in", "instanceof", "interface", "let", "new", "null", "of", "return", "static",
        "switch", "this", "throw", "true", "try", "type", "typeof", "undefined", "var", "void",
        "while", "yield",
    ],
    line_comment: "//",
};

const PYTHON: LanguageSpec = LanguageSpec {
    keywords: &[
        "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
        "elif", "else", "except", "False", "finally", "for", "from", "global", "if", "import",
        "in", "is", "lambda", "None", "nonlocal", "not", "or", "pass", "raise", "return", "True",
        "try", "while", "with", "yield",
    ],
    line_comment: "#",
};

const GO: LanguageSpec = LanguageSpec {
    keywords: &[
        "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
        "false", "for", "func", "go", "goto", "if", "import", "interface", "map", "nil",
        "package", "range", "return", "select", "struct", "switch", "true", "type", "var",
    ],
    line_comment: "//",
};

const SHELL: LanguageSpec = LanguageSpec {
    keywords: &[
        "case", "do", "done", "elif", "else", "esac", "exit", "export", "fi", "for", "function",
        "if", "in", "local", "return", "then", "while",
    ],
    line_comment: "#",
};

fn language_spec(tag: &str) -> Option<&'static LanguageSpec> {
    match tag.to_lowercase().as_str() {
        "rust" | "rs" => Some(&RUST),
        "javascript" | "js" | "jsx" | "typescript" | "ts" | "tsx" => Some(&JAVASCRIPT),
        "python" | "py" => Some(&PYTHON),
        "go" | "golang" => Some(&GO),
        "sh" | "bash" | "shell" | "zsh" => Some(&SHELL),
        _ => None,
    }
}

/// Whether a fence tag gets highlighting rather than plain code styling
pub fn is_recognized(tag: &str) -> bool {
    language_spec(tag).is_some()
}

/// Highlight one line of code for a recognized language.
/// Callers should check [`is_recognized`] first; an unknown tag falls back to
/// a single plain span.
pub fn highlight_line(line: &str, tag: &str, theme: &Theme) -> Line<'static> {
    let plain = Style::default().fg(theme.code_fg);

    let Some(spec) = language_spec(tag) else {
        return Line::from(Span::styled(line.to_string(), plain));
    };

    let keyword = Style::default().fg(theme.code_keyword);
    let string = Style::default().fg(theme.code_string);
    let comment = Style::default().fg(theme.code_comment);
    let number = Style::default().fg(theme.code_number);

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut buffer = String::new();
    let mut i = 0;

    let mut flush = |buffer: &mut String, spans: &mut Vec<Span<'static>>| {
        if !buffer.is_empty() {
            spans.push(Span::styled(std::mem::take(buffer), plain));
        }
    };

    while i < line.len() {
        let rest = &line[i..];

        if rest.starts_with(spec.line_comment) {
            flush(&mut buffer, &mut spans);
            spans.push(Span::styled(rest.to_string(), comment));
            break;
        }

        let ch = rest.chars().next().unwrap();

        if ch == '"' || ch == '\'' {
            let len = string_literal_len(rest, ch);
            flush(&mut buffer, &mut spans);
            spans.push(Span::styled(rest[..len].to_string(), string));
            i += len;
            continue;
        }

        if ch.is_alphanumeric() || ch == '_' {
            let len = rest
                .char_indices()
                .find(|(_, c)| !c.is_alphanumeric() && *c != '_')
                .map(|(idx, _)| idx)
                .unwrap_or(rest.len());
            let word = &rest[..len];

            if word.chars().next().unwrap().is_ascii_digit() {
                flush(&mut buffer, &mut spans);
                spans.push(Span::styled(word.to_string(), number));
            } else if spec.keywords.contains(&word) {
                flush(&mut buffer, &mut spans);
                spans.push(Span::styled(word.to_string(), keyword));
            } else {
                buffer.push_str(word);
            }

            i += len;
            continue;
        }

        buffer.push(ch);
        i += ch.len_utf8();
    }

    flush(&mut buffer, &mut spans);

    if spans.is_empty() {
        spans.push(Span::styled(String::new(), plain));
    }

    Line::from(spans)
}

/// Length in bytes of a quoted literal starting at `rest`, including quotes.
/// An unterminated literal runs to the end of the line.
fn string_literal_len(rest: &str, quote: char) -> usize {
    let mut escaped = false;
    for (idx, c) in rest.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            c if c == quote => return idx + c.len_utf8(),
            _ => {}
        }
    }
    rest.len()
}
