//! # qmark-bot
//!
//! Telegram host for the question-mark stats pipeline. Records the monitored chat into the message log,
//! answers `info` / `go` / `history`, and wires config, storage and the handler chain to a teloxide dispatcher.

pub mod chart;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod cooldown;
pub mod handlers;
pub mod runner;
pub mod source;
pub mod telegram;

pub use cli::{load_config, Cli, Commands};
pub use commands::{parse_command, Command, CommandHandler};
pub use components::{build_bot_components, build_handler_chain, build_report_context, BotComponents};
pub use config::{BaseConfig, BotConfig, ChannelConfig};
pub use cooldown::Cooldown;
pub use handlers::PersistenceHandler;
pub use runner::run_bot;
pub use source::StoredMessageSource;
pub use telegram::{route_message, run_dispatcher, TelegramBotAdapter, TelegramMessageWrapper};
