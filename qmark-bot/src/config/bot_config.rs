//! BotConfig: BaseConfig + ChannelConfig. Use load() for env-based loading.

use anyhow::Result;
use std::time::Duration;

use super::{BaseConfig, ChannelConfig};

/// Bot config. Use BotConfig::load() for env-based loading, then validate() before init.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub channels: ChannelConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let channels = ChannelConfig::from_env()?;
        Ok(Self { base, channels })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.channels.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn channels(&self) -> &ChannelConfig {
        &self.channels
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }

    pub fn monitor_chat_id(&self) -> i64 {
        self.channels.monitor_chat_id
    }
    pub fn report_chat_id(&self) -> i64 {
        self.channels.report_chat_id
    }
    pub fn anchor_message_id(&self) -> i32 {
        self.channels.anchor_message_id
    }
    pub fn command_prefix(&self) -> &str {
        &self.channels.command_prefix
    }
    pub fn report_cooldown(&self) -> Duration {
        Duration::from_secs(self.channels.report_cooldown_secs)
    }
    pub fn crawl_page_size(&self) -> usize {
        self.channels.crawl_page_size
    }
}
