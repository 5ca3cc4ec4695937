//! Message types shared by the handler, the queue and the dispatcher.

use std::fmt;
use std::str::FromStr;

/// How the messaging API should interpret the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    #[default]
    Plain,
    Html,
    Markdown,
}

impl RenderMode {
    /// Parse a mode literal. Only the exact strings `html` and `markdown` are modes.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "html" => Some(RenderMode::Html),
            "markdown" => Some(RenderMode::Markdown),
            _ => None,
        }
    }

    /// Resolve a per-request override against the configured default.
    ///
    /// An unrecognised (or empty) request value falls back to `default`.
    pub fn resolve(requested: &str, default: RenderMode) -> Self {
        Self::parse(requested.trim()).unwrap_or(default)
    }

    /// Wire tag understood by the messaging API, `None` for plain text.
    pub fn as_parse_mode(&self) -> Option<&'static str> {
        match self {
            RenderMode::Plain => None,
            RenderMode::Html => Some("html"),
            RenderMode::Markdown => Some("markdown"),
        }
    }
}

impl FromStr for RenderMode {
    type Err = std::convert::Infallible;

    /// Configuration values: anything other than `html` or `markdown` is plain.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s.trim()).unwrap_or(RenderMode::Plain))
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_parse_mode().unwrap_or("text"))
    }
}

/// One unit of work for the dispatcher: a formatted text bound for one recipient.
///
/// Immutable once built; the queue hands it to the dispatcher by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    destination_id: i64,
    text: String,
    render_mode: RenderMode,
    silent: bool,
}

impl OutboundMessage {
    pub fn new(destination_id: i64, text: impl Into<String>, render_mode: RenderMode, silent: bool) -> Self {
        Self {
            destination_id,
            text: text.into(),
            render_mode,
            silent,
        }
    }

    pub fn destination_id(&self) -> i64 {
        self.destination_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Link previews are always disabled for relayed messages.
    pub fn suppress_link_preview(&self) -> bool {
        true
    }

    pub fn silent(&self) -> bool {
        self.silent
    }
}
