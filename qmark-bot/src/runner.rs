use anyhow::Result;
use qmark_core::init_tracing;
use tracing::{info, instrument, warn};

use crate::components::{build_bot_components, build_handler_chain};
use crate::config::BotConfig;
use crate::telegram::run_dispatcher;

/// Main entry: validate config, init logging, build components and the handler chain, then dispatch.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        database_url = %config.database_url(),
        monitor_chat_id = config.monitor_chat_id(),
        report_chat_id = config.report_chat_id(),
        anchor_message_id = config.anchor_message_id(),
        "Initializing bot"
    );

    let components = build_bot_components(&config).await?;

    match components.repo.count_messages(config.monitor_chat_id()).await {
        Ok(count) => info!(recorded = count, "Message log opened"),
        Err(e) => warn!(error = %e, "Could not count recorded messages"),
    }
    match components
        .repo
        .get_message(config.monitor_chat_id(), config.anchor_message_id())
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => warn!(
            anchor_message_id = config.anchor_message_id(),
            "Anchor message is not in the log yet; reports fail until it is recorded"
        ),
        Err(e) => warn!(error = %e, "Could not look up anchor message"),
    }

    let handler_chain =
        build_handler_chain(&config, components.repo.clone(), components.bot.clone());

    info!("Bot started successfully");

    run_dispatcher(components.teloxide_bot, handler_chain).await
}
