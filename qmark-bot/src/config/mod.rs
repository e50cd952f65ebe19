//! Bot configuration: BaseConfig (Telegram + log + DB) + ChannelConfig (which chats, anchor, command knobs).

mod base;
mod bot_config;
mod channels;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use channels::ChannelConfig;
