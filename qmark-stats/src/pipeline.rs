//! Report pipeline: crawl → classify → (anomalies to notifier, valid to aggregator) → compose.
//!
//! Everything a run needs is carried by [`ReportContext`]; nothing is shared between runs.
//! If the crawl fails partway the error is returned and no series is produced.

use crate::aggregate::{AggregationSnapshot, Aggregator};
use crate::classify::{Classification, Classified};
use crate::crawler::{ChannelCrawler, CrawlRequest, MessageSource, DEFAULT_PAGE_SIZE};
use crate::notifier::AnomalyNotifier;
use crate::report::{compose_pie, compose_time_series, PieSeries, TimeSeries, Window};
use crate::retry::RetryPolicy;
use chrono::{DateTime, NaiveDate, Utc};
use qmark_core::{Bot, Result};
use std::sync::Arc;
use tracing::{error, info, instrument};

#[derive(Clone)]
pub struct ReportContext {
    pub source: Arc<dyn MessageSource>,
    pub bot: Arc<dyn Bot>,
    pub monitor_chat_id: i64,
    pub report_chat_id: i64,
    pub anchor_message_id: i32,
    pub page_size: usize,
    pub retry: RetryPolicy,
}

impl ReportContext {
    pub fn new(
        source: Arc<dyn MessageSource>,
        bot: Arc<dyn Bot>,
        monitor_chat_id: i64,
        report_chat_id: i64,
        anchor_message_id: i32,
    ) -> Self {
        Self {
            source,
            bot,
            monitor_chat_id,
            report_chat_id,
            anchor_message_id,
            page_size: DEFAULT_PAGE_SIZE,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Snapshot plus what happened to the anomalies found along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    pub snapshot: AggregationSnapshot,
    pub anomalies_notified: u64,
    pub notify_failures: u64,
}

/// Crawls everything after the anchor, announcing anomalies inline in discovery order.
pub async fn check_and_collect(ctx: &ReportContext) -> Result<CrawlOutcome> {
    check_and_collect_since(ctx, None).await
}

#[instrument(skip(ctx), fields(chat_id = ctx.monitor_chat_id, anchor = ctx.anchor_message_id))]
pub async fn check_and_collect_since(
    ctx: &ReportContext,
    since: Option<DateTime<Utc>>,
) -> Result<CrawlOutcome> {
    let request = CrawlRequest::new(ctx.monitor_chat_id, ctx.anchor_message_id)
        .with_since(since)
        .with_page_size(ctx.page_size);
    let mut crawler =
        ChannelCrawler::new(ctx.source.clone(), request).with_retry_policy(ctx.retry.clone());
    let notifier = AnomalyNotifier::new(ctx.bot.clone(), ctx.report_chat_id)
        .with_retry_policy(ctx.retry.clone());

    let mut aggregator = Aggregator::new();
    let mut anomalies_notified = 0;
    let mut notify_failures = 0;

    while let Some(message) = crawler.next().await? {
        let classified = Classified::new(message);
        if classified.classification == Classification::Anomalous {
            match notifier.notify(&classified.message).await {
                Ok(_) => anomalies_notified += 1,
                Err(e) => {
                    notify_failures += 1;
                    error!(
                        error = %e,
                        message_id = classified.message.id,
                        "Failed to report anomalous message"
                    );
                }
            }
        }
        aggregator.push(&classified);
    }

    let snapshot = aggregator.finish();
    info!(
        fetched = snapshot.fetched,
        valid = snapshot.total,
        anomalous = snapshot.anomalous,
        notify_failures = notify_failures,
        "step: crawl finished"
    );

    Ok(CrawlOutcome {
        snapshot,
        anomalies_notified,
        notify_failures,
    })
}

/// Full crawl, then the per-author pie series.
pub async fn pie_report(ctx: &ReportContext) -> Result<(AggregationSnapshot, PieSeries)> {
    let outcome = check_and_collect(ctx).await?;
    let pie = compose_pie(&outcome.snapshot);
    Ok((outcome.snapshot, pie))
}

/// Full crawl, then the daily series over `window` ending at `today` (UTC).
pub async fn history_report(
    ctx: &ReportContext,
    window: Window,
    today: NaiveDate,
) -> Result<TimeSeries> {
    let outcome = check_and_collect(ctx).await?;
    Ok(compose_time_series(&outcome.snapshot, window, today))
}
