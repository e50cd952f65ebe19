//! Telegram layer: adapters, Bot implementation, dispatcher runner.

mod adapters;
mod bot_adapter;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::{map_request_error, pin_outcome_for, TelegramBotAdapter};
pub use runner::{route_message, run_dispatcher};
