//! Terminal rendering of the transcript.
//!
//! [`TerminalView`] keeps a [`Transcript`] as the record and prints each
//! change as it happens. Output is flushed once per coalesced scroll request.

use std::io::Write;
use std::sync::LazyLock;

use baak_core::markup::render_markdown;
use baak_core::time_format::{format_time, TimeFormat};
use baak_core::transcript::html::{BOT_AVATAR, BOT_LABEL, TYPING_TEXT, USER_LABEL};
use baak_core::{MessageMeta, Transcript, TranscriptSink, TypingToken};
use regex::Regex;

const DEFAULT_WIDTH: usize = 72;
const CLEAR_LINE: &str = "\r\x1b[2K";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

static BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</p>|</h[1-6]>").unwrap());
static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<li[^>]*>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Flatten rendered HTML to terminal text.
pub fn to_plain_text(html: &str) -> String {
    let text = BREAK_RE.replace_all(html, "\n");
    let text = LIST_ITEM_RE.replace_all(&text, "• ");
    let text = TAG_RE.replace_all(&text, "");
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    BLANK_LINES_RE.replace_all(&text, "\n\n").trim().to_string()
}

pub struct TerminalView<W: Write> {
    transcript: Transcript,
    out: W,
    time_format: TimeFormat,
    width: usize,
    /// Typing placeholders currently drawn.
    typing: Vec<TypingToken>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, time_format: TimeFormat) -> Self {
        Self {
            transcript: Transcript::new(),
            out,
            time_format,
            width: DEFAULT_WIDTH,
            typing: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print a line outside the transcript (help, notices).
    pub fn notice(&mut self, text: &str) {
        self.emit(&format!("{text}\n"));
        self.flush();
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            log::warn!("Failed to write to terminal: {}", e);
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.out.flush() {
            log::warn!("Failed to flush terminal: {}", e);
        }
    }

    fn scroll(&mut self) {
        if self.transcript.take_scroll_request() {
            self.flush();
        }
    }

    fn stamp(&self) -> String {
        self.transcript
            .messages()
            .last()
            .map(|message| format_time(&message.timestamp, self.time_format))
            .unwrap_or_default()
    }

    fn right_align(&self, line: &str) -> String {
        let pad = self.width.saturating_sub(line.chars().count());
        format!("{}{}", " ".repeat(pad), line)
    }
}

impl<W: Write> TranscriptSink for TerminalView<W> {
    fn append_user(&mut self, text: &str) {
        self.transcript.append_user(text);
        let mut block = self.right_align(&format!("{USER_LABEL} · {}", self.stamp()));
        block.push('\n');
        for line in text.lines() {
            block.push_str(&self.right_align(line));
            block.push('\n');
        }
        block.push('\n');
        self.emit(&block);
        self.scroll();
    }

    fn append_bot(&mut self, answer: &str, meta: &MessageMeta) {
        self.transcript.append_bot(answer, meta);
        let mut block = format!("[{BOT_AVATAR}] {BOT_LABEL} · {}\n", self.stamp());
        for line in to_plain_text(&render_markdown(answer)).lines() {
            block.push_str("     ");
            block.push_str(line);
            block.push('\n');
        }
        let badges = meta.badges();
        if !badges.is_empty() {
            let row: Vec<String> = badges.iter().map(|badge| format!("[{badge}]")).collect();
            block.push_str("     ");
            block.push_str(&row.join(" "));
            block.push('\n');
        }
        block.push('\n');
        self.emit(&block);
        self.scroll();
    }

    fn show_typing(&mut self) -> TypingToken {
        let token = self.transcript.show_typing();
        self.typing.push(token);
        self.emit(&format!("[{BOT_AVATAR}] ••• {TYPING_TEXT}"));
        self.scroll();
        token
    }

    fn hide_typing(&mut self, token: TypingToken) {
        self.transcript.hide_typing(token);
        let before = self.typing.len();
        self.typing.retain(|t| *t != token);
        if self.typing.len() != before {
            self.emit(CLEAR_LINE);
        }
        self.scroll();
    }

    fn clear(&mut self) {
        self.transcript.clear();
        self.typing.clear();
        self.emit(CLEAR_SCREEN);
        self.scroll();
    }
}
