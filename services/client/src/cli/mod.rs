//! services/client/src/cli/mod.rs
//!
//! The terminal surfaces. Each subcommand reads or mutates the shared
//! `SessionStore` and prints what a page would have rendered.

pub mod account;
pub mod chat;
pub mod learning;

use crate::error::AppError;
use clap::{Parser, Subcommand};
use coursebook_core::{ChatBackend, SessionStore};
use std::io::Write;

pub use learning::QuestionnaireArgs;

#[derive(Parser, Debug)]
#[command(name = "coursebook")]
#[command(version)]
#[command(about = "Terminal client for the Physical AI & Humanoid Robotics coursebook")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print backend payloads as JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        email: String,

        #[arg(long)]
        full_name: String,

        /// Prompted for on the terminal when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign in to an existing account
    Signin {
        #[arg(long)]
        email: String,

        /// Prompted for on the terminal when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the current session
    Signout,

    /// Show who is signed in
    Whoami,

    /// Submit the one-time background questionnaire
    Questionnaire(QuestionnaireArgs),

    /// Show the personalized dashboard
    Dashboard,

    /// Rewrite a chapter for your background
    Personalize {
        chapter_id: String,
    },

    /// Translate a chapter
    Translate {
        chapter_id: String,

        /// Language code or English name, e.g. `urdu` or `Spanish`
        language: String,
    },

    /// List the languages chapters can be translated into
    Languages,

    /// Ask the coursebook assistant questions interactively
    Chat,
}

impl Command {
    /// Whether the stored session has to be restored before the command runs.
    pub fn needs_session(&self) -> bool {
        !matches!(self, Command::Languages | Command::Chat)
    }
}

/// What a command runs against.
pub struct Context {
    pub session: SessionStore,
    pub chat_backend: ChatBackend,
    pub json: bool,
}

pub async fn run(command: Command, ctx: &Context, out: &mut impl Write) -> Result<(), AppError> {
    match command {
        Command::Signup {
            email,
            full_name,
            password,
        } => {
            let password = account::resolve_password(password).await?;
            account::signup(ctx, email, full_name, password, out).await
        }
        Command::Signin { email, password } => {
            let password = account::resolve_password(password).await?;
            account::signin(ctx, email, password, out).await
        }
        Command::Signout => account::signout(ctx, out),
        Command::Whoami => account::whoami(ctx, out),
        Command::Questionnaire(args) => learning::questionnaire(ctx, args, out).await,
        Command::Dashboard => learning::dashboard(ctx, out).await,
        Command::Personalize { chapter_id } => learning::personalize(ctx, &chapter_id, out).await,
        Command::Translate {
            chapter_id,
            language,
        } => learning::translate(ctx, &chapter_id, &language, out).await,
        Command::Languages => learning::languages(out),
        Command::Chat => {
            let mut widget = coursebook_core::ChatWidget::new(ctx.chat_backend.clone());
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            chat::run_repl(&mut widget, stdin, out).await
        }
    }
}

/// Prints `value` as pretty JSON when `--json` was given. Returns whether it did.
pub(crate) fn print_json<T: serde::Serialize>(
    ctx: &Context,
    value: &T,
    out: &mut impl Write,
) -> Result<bool, AppError> {
    if !ctx.json {
        return Ok(false);
    }
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(true)
}
