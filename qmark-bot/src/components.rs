//! Component factory: builds BotComponents and the handler chain from config. Isolates assembly from runner.

use anyhow::Result;
use handler_chain::HandlerChain;
use qmark_core::Bot as CoreBot;
use qmark_stats::ReportContext;
use std::sync::Arc;
use storage::MessageRepository;
use teloxide::prelude::*;
use tracing::{error, instrument};

use crate::commands::CommandHandler;
use crate::config::BotConfig;
use crate::handlers::PersistenceHandler;
use crate::source::StoredMessageSource;
use crate::telegram::TelegramBotAdapter;

/// Core dependencies for run_bot; produced by the component factory.
pub struct BotComponents {
    pub repo: MessageRepository,
    pub teloxide_bot: Bot,
    pub bot: Arc<dyn CoreBot>,
}

#[instrument(skip(config))]
pub async fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let repo = MessageRepository::new(config.database_url())
        .await
        .map_err(|e| {
            error!(
                error = %e,
                database_url = %config.database_url(),
                "Failed to initialize message log"
            );
            anyhow::anyhow!("Failed to initialize message log: {}", e)
        })?;

    let teloxide_bot = {
        let bot = Bot::new(config.bot_token());
        if let Some(url_str) = config.telegram_api_url() {
            match reqwest::Url::parse(url_str) {
                Ok(url) => bot.set_api_url(url),
                Err(e) => {
                    error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                    bot
                }
            }
        } else {
            bot
        }
    };

    let bot: Arc<dyn CoreBot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));

    Ok(BotComponents {
        repo,
        teloxide_bot,
        bot,
    })
}

/// Everything a report run needs, reading the monitored chat out of `repo`.
pub fn build_report_context(
    config: &BotConfig,
    repo: MessageRepository,
    bot: Arc<dyn CoreBot>,
) -> ReportContext {
    ReportContext::new(
        Arc::new(StoredMessageSource::new(repo)),
        bot,
        config.monitor_chat_id(),
        config.report_chat_id(),
        config.anchor_message_id(),
    )
    .with_page_size(config.crawl_page_size())
}

/// Builds the handler chain (persistence → commands).
pub fn build_handler_chain(
    config: &BotConfig,
    repo: MessageRepository,
    bot: Arc<dyn CoreBot>,
) -> HandlerChain {
    let persistence = Arc::new(PersistenceHandler::new(repo.clone(), config.monitor_chat_id()));
    let commands = Arc::new(CommandHandler::new(
        bot.clone(),
        build_report_context(config, repo, bot),
        config.command_prefix(),
        config.report_cooldown(),
    ));
    HandlerChain::new()
        .add_handler(persistence)
        .add_handler(commands)
}
