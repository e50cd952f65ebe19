//! Chat commands: `info`, `go`, `history [window]`, `help`.

mod handler;

pub use handler::CommandHandler;

use qmark_stats::DEFAULT_WINDOW;

pub const INFO_TEXT: &str = "Question mark stats bot\n\
Created by ed588\n\
The source code for this bot is available at https://github.com/ed588/question-mark-stats.\n\
The source code is AGPL3 licensed. Contributions are welcome.";

pub const GROUP_ONLY_TEXT: &str = "This command cannot be used in private messages.";

pub const PIE_COMING_TEXT: &str = "Pie chart coming up...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Info,
    Go,
    /// Raw window argument; parsed leniently by [`qmark_stats::Window::parse`].
    History(String),
    Help,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Info => "info",
            Command::Go => "go",
            Command::History(_) => "history",
            Command::Help => "help",
        }
    }

    /// Report commands crawl the whole channel; they are group-only and rate limited.
    pub fn is_report(&self) -> bool {
        matches!(self, Command::Go | Command::History(_))
    }
}

/// Parses `<prefix><name>[@bot] [args]`. Returns None for anything that isn't one of our commands.
pub fn parse_command(text: &str, prefix: &str) -> Option<Command> {
    let rest = text.trim_start().strip_prefix(prefix)?;
    let (word, args) = match rest.split_once(char::is_whitespace) {
        Some((word, args)) => (word, args.trim()),
        None => (rest, ""),
    };
    let name = word.split('@').next().unwrap_or(word);

    match name {
        "info" => Some(Command::Info),
        "go" => Some(Command::Go),
        "history" if args.is_empty() => Some(Command::History(DEFAULT_WINDOW.to_string())),
        "history" => Some(Command::History(args.to_string())),
        "help" => Some(Command::Help),
        _ => None,
    }
}

/// `help` reply, listing commands with the configured prefix.
pub fn help_text(prefix: &str) -> String {
    [
        format!("{}info - information about the bot", prefix),
        format!("{}go - count every question mark and draw a pie chart", prefix),
        format!(
            "{}history [days|all] - activity over time (default {} days)",
            prefix, DEFAULT_WINDOW
        ),
    ]
    .join("\n")
}

/// Count announcement sent before the pie chart.
pub fn found_text(total: u64) -> String {
    format!("I found {} messages that are question marks...", total)
}
