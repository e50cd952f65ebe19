//! Executes parsed commands against the report pipeline.

use async_trait::async_trait;
use chrono::Utc;
use qmark_core::{Bot, Handler, HandlerResponse, ImageArtifact, Message, Result};
use qmark_stats::{history_report, pie_report, retry_rate_limited, ReportContext, Window};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use super::{found_text, help_text, parse_command, Command, GROUP_ONLY_TEXT, INFO_TEXT, PIE_COMING_TEXT};
use crate::chart::{render_pie, render_time_series};
use crate::cooldown::{cooldown_message, Cooldown};

/// Answers commands. Report commands are group-only, share nothing between runs, and each has its own
/// global cooldown. Rate-limited sends are retried with the context's policy. A failing command is logged
/// and its error text is sent back to the requester.
pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    context: ReportContext,
    prefix: String,
    go_cooldown: Cooldown,
    history_cooldown: Cooldown,
}

impl CommandHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        context: ReportContext,
        prefix: impl Into<String>,
        cooldown: Duration,
    ) -> Self {
        Self {
            bot,
            context,
            prefix: prefix.into(),
            go_cooldown: Cooldown::new(cooldown),
            history_cooldown: Cooldown::new(cooldown),
        }
    }

    fn cooldown_for(&self, command: &Command) -> Option<&Cooldown> {
        match command {
            Command::Go => Some(&self.go_cooldown),
            Command::History(_) => Some(&self.history_cooldown),
            Command::Info | Command::Help => None,
        }
    }

    #[instrument(skip(self, message, command), fields(command = command.name(), chat_id = message.chat.id))]
    async fn execute(&self, message: &Message, command: &Command) -> Result<()> {
        let requester = message.chat.id;

        if command.is_report() && !message.chat.chat_type.is_group() {
            return self.send_text(requester, GROUP_ONLY_TEXT).await;
        }
        if let Some(cooldown) = self.cooldown_for(command) {
            if let Err(remaining) = cooldown.try_acquire() {
                info!(remaining_secs = remaining.as_secs(), "step: command on cooldown");
                return self.send_text(requester, &cooldown_message(remaining)).await;
            }
        }

        match command {
            Command::Info => self.send_text(requester, INFO_TEXT).await,
            Command::Help => self.send_text(requester, &help_text(&self.prefix)).await,
            Command::Go => self.go().await,
            Command::History(arg) => self.history(arg).await,
        }
    }

    async fn go(&self) -> Result<()> {
        let report_chat = self.context.report_chat_id;
        self.typing(report_chat).await;

        let (snapshot, pie) = pie_report(&self.context).await?;
        info!(total = snapshot.total, slices = pie.slices.len(), "step: pie report composed");

        self.send_text(report_chat, &found_text(snapshot.total)).await?;
        self.send_text(report_chat, PIE_COMING_TEXT).await?;
        self.send_chart(report_chat, render_pie(&pie)).await
    }

    async fn history(&self, arg: &str) -> Result<()> {
        let report_chat = self.context.report_chat_id;
        self.typing(report_chat).await;

        let window = Window::parse(arg);
        let today = Utc::now().date_naive();
        let series = history_report(&self.context, window, today).await?;
        info!(?window, points = series.len(), total = series.total(), "step: history report composed");

        self.send_chart(report_chat, render_time_series(&series)).await
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        let bot = &self.bot;
        retry_rate_limited(&self.context.retry, "send command reply", move || {
            bot.send_message(chat_id, text)
        })
        .await
    }

    async fn send_chart(&self, chat_id: i64, chart: ImageArtifact) -> Result<()> {
        let bot = &self.bot;
        let chart = &chart;
        retry_rate_limited(&self.context.retry, "send chart", move || {
            bot.send_image(chat_id, chart.clone())
        })
        .await
    }

    async fn typing(&self, chat_id: i64) {
        if let Err(e) = self.bot.send_typing(chat_id).await {
            warn!(error = %e, chat_id, "Failed to send typing action");
        }
    }
}

#[async_trait]
impl Handler for CommandHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.is_edit() {
            return Ok(HandlerResponse::Ignore);
        }
        let Some(command) = parse_command(&message.content, &self.prefix) else {
            return Ok(HandlerResponse::Continue);
        };

        info!(
            command = command.name(),
            chat_id = message.chat.id,
            author_id = message.author.id,
            "step: command received"
        );

        if let Err(e) = self.execute(message, &command).await {
            error!(error = %e, command = command.name(), "Command failed");
            if let Err(send_err) = self.send_text(message.chat.id, &e.to_string()).await {
                error!(error = %send_err, "Failed to report command error");
            }
        }
        Ok(HandlerResponse::Stop)
    }
}
