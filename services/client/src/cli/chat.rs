//! services/client/src/cli/chat.rs
//!
//! A line-oriented front end for the chat widget. Plain lines are questions;
//! `/select <text>` stands in for highlighting text on a page.

use crate::error::AppError;
use coursebook_core::{ChatMessage, ChatRole, ChatWidget};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, PartialEq, Eq)]
enum ReplInput<'a> {
    Question(&'a str),
    Select(&'a str),
    Clear,
    Quit,
}

fn parse_line(line: &str) -> ReplInput<'_> {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some(("/select", rest)) => ReplInput::Select(rest.trim()),
        _ => match line {
            "/select" => ReplInput::Select(""),
            "/clear" => ReplInput::Clear,
            "/quit" | "/exit" => ReplInput::Quit,
            _ => ReplInput::Question(line),
        },
    }
}

/// Runs until `/quit` or end of input.
pub async fn run_repl<R, W>(widget: &mut ChatWidget, input: R, out: &mut W) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    widget.open();
    for line in widget.welcome_lines() {
        writeln!(out, "{}", line)?;
    }
    writeln!(out, "Commands: /select <text>, /clear, /quit")?;

    let mut lines = input.lines();
    while widget.is_open() {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            ReplInput::Quit => widget.close(),
            ReplInput::Clear => {
                widget.clear_selection();
                writeln!(out, "Selection cleared.")?;
            }
            ReplInput::Select(text) => {
                if widget.on_selection(text) {
                    if let Some(preview) = widget.selection_preview() {
                        writeln!(out, "Asking about: \"{}\"", preview)?;
                    }
                } else {
                    writeln!(out, "Select a longer passage to ask about it.")?;
                }
            }
            ReplInput::Question(query) => {
                if let Some(reply) = widget.send(query).await {
                    render_reply(reply, out)?;
                }
            }
        }
    }
    Ok(())
}

fn render_reply(reply: &ChatMessage, out: &mut impl Write) -> Result<(), AppError> {
    match reply.role {
        ChatRole::Error => writeln!(out, "! {}", reply.content)?,
        _ => writeln!(out, "{}", reply.content)?,
    }
    if !reply.sources.is_empty() {
        writeln!(out, "Sources:")?;
        for source in &reply.sources {
            writeln!(out, "  - {} ({}% match)", source.title(), source.match_percent())?;
        }
    }
    Ok(())
}
