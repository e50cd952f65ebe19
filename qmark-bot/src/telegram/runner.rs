//! Dispatcher runner: converts teloxide messages (new and edited) to core messages and passes them to the
//! HandlerChain.

use anyhow::Result;
use handler_chain::HandlerChain;
use qmark_core::{Message, ToCoreMessage};
use teloxide::prelude::*;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use super::adapters::TelegramMessageWrapper;

/// Runs the dispatcher until ctrl-c. Edited messages take the same path as new ones so the message log
/// sees edits. All updates share one distribution key, so they reach [`route_message`] one at a time in
/// arrival order.
#[instrument(skip(bot, handler_chain))]
pub async fn run_dispatcher(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        info!(username = ?me.user.username, "Bot identity resolved");
    }

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_edited_message().endpoint(on_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![handler_chain])
        .distribution_function(|_| Some(()))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn on_message(msg: teloxide::types::Message, chain: HandlerChain) -> ResponseResult<()> {
    let core_msg = TelegramMessageWrapper(&msg).to_core();

    info!(
        author_id = core_msg.author.id,
        chat_id = core_msg.chat.id,
        message_id = core_msg.id,
        kind = %core_msg.kind,
        edited = core_msg.is_edit(),
        "Received message"
    );

    route_message(&chain, core_msg).await;
    Ok(())
}

/// Runs the before phase (recording the monitored chat) inline, then the handle phase on its own task.
/// A report requested right after a message therefore sees that message in the log.
pub async fn route_message(chain: &HandlerChain, message: Message) -> Option<JoinHandle<()>> {
    match chain.run_before(&message).await {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            error!(error = %e, chat_id = message.chat.id, "Handler chain before phase failed");
            return None;
        }
    }

    // Reports crawl for a while; don't hold up the update stream.
    let chain = chain.clone();
    Some(tokio::spawn(async move {
        if let Err(e) = chain.run_handle(&message).await {
            error!(error = %e, chat_id = message.chat.id, "Handler chain failed");
        }
    }))
}
