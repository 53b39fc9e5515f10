//! Copy-to-clipboard via the OSC 52 escape sequence.
//!
//! Works in iTerm2, kitty, WezTerm, Ghostty, and most modern terminals
//! without talking to a display server.

use std::io::Write;

use base64::Engine;

/// Build the OSC 52 sequence that places `text` on the system clipboard
fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x07", encoded)
}

/// Copy text to the system clipboard.
/// Writes directly to stdout, bypassing the terminal backend buffer.
pub fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(osc52_sequence(text).as_bytes())?;
    stdout.flush()
}
