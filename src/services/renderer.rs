// src/services/renderer.rs
use std::{
    io::{self, Write},
    str::FromStr,
    sync::Mutex,
};

use tracing::warn;

use crate::error::ConfigError;
use crate::message::Citation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// UI language for the fixed strings the client adds around server text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Arabic,
    English,
}

impl Locale {
    pub fn citations_label(self) -> &'static str {
        match self {
            Locale::Arabic => "المراجع: ",
            Locale::English => "References: ",
        }
    }

    pub fn citations_separator(self) -> &'static str {
        match self {
            Locale::Arabic => " ، ",
            Locale::English => ", ",
        }
    }

    pub fn error_prefix(self) -> &'static str {
        match self {
            Locale::Arabic => "حدث خطأ غير متوقع: ",
            Locale::English => "An unexpected error occurred: ",
        }
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ar" | "arabic" => Ok(Locale::Arabic),
            "en" | "english" => Ok(Locale::English),
            other => Err(ConfigError::Invalid {
                key: "HR_CHAT_LANG",
                reason: format!("unsupported language '{other}'"),
            }),
        }
    }
}

/// `label title#chunk<sep>title#chunk...`, or `None` when there is nothing to cite.
pub fn format_citations(citations: &[Citation], locale: Locale) -> Option<String> {
    if citations.is_empty() {
        return None;
    }
    let refs = citations
        .iter()
        .map(Citation::to_string)
        .collect::<Vec<_>>()
        .join(locale.citations_separator());
    Some(format!("{}{}", locale.citations_label(), refs))
}

/// Where chat bubbles end up. Implementations must treat `text` as plain text.
pub trait RenderSink: Send + Sync {
    fn append_user_message(&self, text: &str);
    fn append_bot_message(&self, text: &str, citations: &[Citation]);
    fn clear_input(&self);
}

/// Route one bubble to the sink by sender. User bubbles never carry citations.
pub fn render_bubble<S: RenderSink + ?Sized>(sink: &S, text: &str, sender: Sender, citations: &[Citation]) {
    match sender {
        Sender::User => sink.append_user_message(text),
        Sender::Bot => sink.append_bot_message(text, citations),
    }
}

/// Drop control characters so server text cannot drive the terminal.
pub fn plain_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Line-oriented terminal binding: `you>` and `bot>` bubbles, citations indented below.
pub struct TerminalSink<W: Write + Send> {
    out: Mutex<W>,
    locale: Locale,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout(locale: Locale) -> Self {
        Self::new(io::stdout(), locale)
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W, locale: Locale) -> Self {
        Self { out: Mutex::new(out), locale }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_bubble(&self, tag: &str, text: &str, citation_line: Option<String>) {
        let Ok(mut out) = self.out.lock() else {
            warn!("terminal writer poisoned; dropping bubble");
            return;
        };
        let mut lines = plain_text(text);
        if lines.is_empty() {
            lines.push(' ');
        }
        let mut result = Ok(());
        for (i, line) in lines.lines().enumerate() {
            let lead = if i == 0 { tag } else { "     " };
            result = result.and_then(|_| writeln!(out, "{lead} {line}"));
        }
        if let Some(refs) = citation_line {
            result = result.and_then(|_| writeln!(out, "      {}", plain_text(&refs)));
        }
        // flushing is the terminal's "scroll into view"
        if let Err(e) = result.and_then(|_| out.flush()) {
            warn!(error = %e, "failed to write bubble");
        }
    }
}

impl<W: Write + Send> RenderSink for TerminalSink<W> {
    fn append_user_message(&self, text: &str) {
        self.write_bubble("you>", text, None);
    }

    fn append_bot_message(&self, text: &str, citations: &[Citation]) {
        self.write_bubble("bot>", text, format_citations(citations, self.locale));
    }

    fn clear_input(&self) {
        // stdin already consumed the line; nothing else holds input
    }
}
