//! HTML bubble markup, derived from a [`Transcript`].
//!
//! Produces the same structure and classes the browser widget uses, so the
//! output can be dropped into its `#chat-log` container or written out as a
//! standalone page.

use super::{Entry, Message, Role, Transcript, TypingToken};
use crate::markup::{escape_html, render_markdown};
use crate::session::SessionIndicator;
use crate::time_format::{format_time, TimeFormat};

pub const USER_LABEL: &str = "Anda";
pub const BOT_LABEL: &str = "BAAK Bot";
pub const BOT_AVATAR: &str = "BA";
pub const TYPING_TEXT: &str = "menulis…";

/// DOM id of the placeholder for one request.
pub fn typing_element_id(token: TypingToken) -> String {
    format!("typing-{}", token.0)
}

/// Render one entry.
pub fn render_entry(entry: &Entry, format: TimeFormat) -> String {
    match entry {
        Entry::Message(message) => match message.role {
            Role::User => render_user(message, format),
            Role::Bot => render_bot(message, format),
        },
        Entry::Typing { token, since } => {
            render_typing(*token, &format_time(since, format))
        }
    }
}

/// Render every entry, oldest first, as the contents of `#chat-log`.
pub fn render_transcript(transcript: &Transcript, format: TimeFormat) -> String {
    transcript
        .entries()
        .iter()
        .map(|entry| render_entry(entry, format))
        .collect()
}

/// Render a standalone page with the session pill and the chat log.
pub fn render_page(
    transcript: &Transcript,
    format: TimeFormat,
    indicator: &SessionIndicator,
) -> String {
    let pill_class = if indicator.visible {
        "session-pill"
    } else {
        "session-pill hidden"
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="utf-8">
<title>{BOT_LABEL}</title>
<style>
  body {{ font-family: sans-serif; background: #f3f4f6; margin: 0; }}
  .hidden {{ display: none; }}
  .session-pill {{ font-size: 12px; padding: 2px 8px; border-radius: 9999px; background: #e0e7ff; }}
  #chat-log {{ display: flex; flex-direction: column; gap: 12px; padding: 16px; }}
  .flex {{ display: flex; gap: 12px; }}
  .justify-end {{ justify-content: flex-end; }}
  .bubble {{ border-radius: 16px; padding: 12px; max-width: 80%; }}
  .bg-indigo-600 {{ background: #4f46e5; color: #fff; }}
  .bg-white {{ background: #fff; }}
  .meta-row {{ display: flex; gap: 6px; font-size: 11px; color: #6b7280; margin-top: 6px; }}
  .badge {{ border: 1px solid #d1d5db; border-radius: 6px; padding: 0 4px; }}
</style>
</head>
<body>
<header><span id="session-pill" class="{pill_class}">{pill_text}</span></header>
<main id="chat-log">
{log}</main>
</body>
</html>
"#,
        pill_text = escape_html(&indicator.text),
        log = render_transcript(transcript, format),
    )
}

fn render_user(message: &Message, format: TimeFormat) -> String {
    format!(
        r#"<div class="flex items-start gap-3 justify-end fade-in">
  <div class="bubble bg-indigo-600 text-white p-3 md:p-4 max-w-[80%] shadow-soft">
    <div class="text-[13px] text-indigo-100 mb-1 text-right">{USER_LABEL}</div>
    <div class="prose prose-sm prose-invert">{body}</div>
    <div class="meta-row">
      <span class="msg-time">{time}</span>
    </div>
  </div>
</div>
"#,
        body = render_markdown(&escape_html(&message.text)),
        time = format_time(&message.timestamp, format),
    )
}

fn render_bot(message: &Message, format: TimeFormat) -> String {
    let badges: String = message
        .meta
        .badges()
        .iter()
        .map(|badge| format!(r#"<span class="badge">{}</span>"#, escape_html(badge)))
        .collect();
    format!(
        r#"<div class="flex items-start gap-3 fade-in">
  <div class="h-8 w-8 grid place-content-center rounded-full bg-indigo-600 text-white text-sm">{BOT_AVATAR}</div>
  <div class="bubble bg-white p-3 md:p-4 shadow-soft max-w-[80%]">
    <div class="text-[13px] text-gray-500 mb-1">{BOT_LABEL}</div>
    <div class="prose prose-sm text-gray-800">{body}</div>
    <div class="meta-row">
      {badges}<span class="msg-time">{time}</span>
    </div>
  </div>
</div>
"#,
        body = render_markdown(&message.text),
        time = format_time(&message.timestamp, format),
    )
}

fn render_typing(token: TypingToken, time: &str) -> String {
    format!(
        r#"<div class="flex items-start gap-3 fade-in" id="{id}">
  <div class="h-8 w-8 grid place-content-center rounded-full bg-indigo-600 text-white text-sm">{BOT_AVATAR}</div>
  <div class="bubble bg-white p-3 md:p-4 shadow-soft max-w-[80%]">
    <div class="text-[13px] text-gray-500 mb-1">{BOT_LABEL}</div>
    <div class="flex items-center gap-2 text-gray-500"><span class="animate-pulse">•••</span> {TYPING_TEXT}</div>
    <div class="meta-row">
      <span class="msg-time">{time}</span>
    </div>
  </div>
</div>
"#,
        id = typing_element_id(token),
    )
}
