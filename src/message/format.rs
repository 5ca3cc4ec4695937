//! Message text formatting.
//!
//! # Design Decisions
//! - Pure function: no I/O, same inputs always give the same output
//! - Body is decoded lossily; invalid UTF-8 becomes replacement characters
//! - Sender prefix markup follows the resolved render mode

use crate::message::types::RenderMode;

/// Build the outbound text and the render mode it must be sent with.
pub fn format_message(
    sender: &str,
    body: &[u8],
    requested_mode: &str,
    default_mode: RenderMode,
) -> (String, RenderMode) {
    let mode = RenderMode::resolve(requested_mode, default_mode);
    let body = String::from_utf8_lossy(body);

    if sender.is_empty() {
        return (body.into_owned(), mode);
    }

    let text = match mode {
        RenderMode::Html => format!("<b>{}:</b> {}", sender, body),
        RenderMode::Markdown => format!("*{}:* {}", sender, body),
        RenderMode::Plain => format!("{}: {}", sender, body),
    };
    (text, mode)
}
