//! Interactive chat loop.
//!
//! Lines are fed to the controller key by key. A line ending in `\` keeps
//! composing (Shift+Enter); anything else ends with Enter and is sent.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use baak_core::controller::NewChatOutcome;
use baak_core::transcript::html::render_page;
use baak_core::{ChatBackend, ChatController, Key, TimeFormat};

use crate::terminal::TerminalView;

const CONTINUATION: char = '\\';

/// Slash commands understood by the chat loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    Health,
    /// Send suggestion number `n`, counted from 1.
    Ask(usize),
    Help,
    Quit,
    Unknown(String),
}

/// Parse `line` as a slash command. Returns `None` for ordinary text.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let rest = line.strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or("");

    let command = match name {
        "new" => Command::New,
        "health" => Command::Health,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "ask" => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n > 0 => Command::Ask(n),
            _ => Command::Unknown(line.to_string()),
        },
        _ => Command::Unknown(line.to_string()),
    };
    Some(command)
}

/// Writes the transcript page after every change when `--html-out` is set.
pub struct HtmlExport {
    path: Option<PathBuf>,
    time_format: TimeFormat,
}

impl HtmlExport {
    pub fn new(path: Option<&Path>, time_format: TimeFormat) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
            time_format,
        }
    }

    pub fn write<B: ChatBackend, W: Write>(
        &self,
        controller: &ChatController<B, TerminalView<W>>,
    ) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let page = render_page(
            controller.sink().transcript(),
            self.time_format,
            controller.session().indicator(),
        );
        fs::write(path, page)
            .with_context(|| format!("Failed to write transcript to {}", path.display()))
    }
}

pub fn help_text(suggestions: &[String]) -> String {
    let mut help = String::from(
        "Perintah:\n  \
         /new        mulai percakapan baru\n  \
         /health     cek status backend\n  \
         /ask <n>    kirim contoh pertanyaan nomor n\n  \
         /help       tampilkan bantuan ini\n  \
         /quit       keluar\n\
         Akhiri baris dengan \\ untuk menulis baris berikutnya.\n",
    );
    if !suggestions.is_empty() {
        help.push_str("\nContoh pertanyaan:\n");
        for (i, suggestion) in suggestions.iter().enumerate() {
            help.push_str(&format!("  {}. {}\n", i + 1, suggestion));
        }
    }
    help
}

/// Run the loop until `/quit` or end of input.
pub fn run<B, W, R>(
    controller: &mut ChatController<B, TerminalView<W>>,
    suggestions: &[String],
    export: &HtmlExport,
    input: R,
) -> Result<()>
where
    B: ChatBackend,
    W: Write,
    R: BufRead,
{
    controller
        .sink_mut()
        .notice("BAAK Bot siap. Ketik /help untuk bantuan.\n");

    for line in input.lines() {
        let line = line.context("Failed to read input")?;

        let composing = !controller.composer().text().trim().is_empty();
        if !composing {
            if let Some(command) = parse_command(&line) {
                if !dispatch(controller, suggestions, command) {
                    break;
                }
                export.write(controller)?;
                continue;
            }
        }

        if feed_line(controller, &line) {
            export.write(controller)?;
        }
    }
    Ok(())
}

/// Type `line` into the composer. Returns whether a submit happened.
fn feed_line<B: ChatBackend, W: Write>(
    controller: &mut ChatController<B, TerminalView<W>>,
    line: &str,
) -> bool {
    let (body, continues) = match line.strip_suffix(CONTINUATION) {
        Some(body) => (body, true),
        None => (line, false),
    };
    for c in body.chars() {
        controller.handle_key(Key::Char(c));
    }
    controller
        .handle_key(Key::Enter { shift: continues })
        .is_some()
}

/// Run one slash command. Returns `false` to stop the loop.
fn dispatch<B: ChatBackend, W: Write>(
    controller: &mut ChatController<B, TerminalView<W>>,
    suggestions: &[String],
    command: Command,
) -> bool {
    match command {
        Command::New => {
            if controller.new_chat() == NewChatOutcome::ClearedAndReloaded {
                log::debug!("Previous session cleared");
            }
        }
        Command::Health => {
            controller.health_check();
        }
        Command::Ask(n) => match suggestions.get(n - 1) {
            Some(question) => {
                controller.quick_ask(question);
            }
            None => controller
                .sink_mut()
                .notice(&format!("Tidak ada contoh pertanyaan nomor {n}.")),
        },
        Command::Help => {
            let help = help_text(suggestions);
            controller.sink_mut().notice(&help);
        }
        Command::Quit => return false,
        Command::Unknown(text) => controller
            .sink_mut()
            .notice(&format!("Perintah tidak dikenal: {text}. Ketik /help.")),
    }
    true
}
